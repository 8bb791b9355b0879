pub mod aligner;
pub mod encoder;

pub use aligner::{align, AlignmentMode};
pub use encoder::{EncodedMatrix, EncodedRow, FeatureColumnList, FeatureEncoder};
