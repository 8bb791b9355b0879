use anyhow::Context;
use tracing::info;

use rainfall::config::AppConfig;
use rainfall::data_handling::rainfall_csv::RainfallCsv;
use rainfall::data_handling::DataSource;
use rainfall::features::FeatureEncoder;
use rainfall::helper_functions::{init_logging, project_root};
use rainfall::model::{train, ArtifactPaths, TrainOptions};

/// Offline training: load the dataset, report the hold-out R², fit on every
/// row and write the model plus its feature columns to the configured paths.
fn main() -> anyhow::Result<()> {
    init_logging();
    info!("Starting rainfall model training");

    let root = project_root();
    let config = AppConfig::load(&root).context("loading configuration")?;

    let dataset = RainfallCsv::new(&config.data_path)
        .load()
        .context("loading the rainfall dataset")?;
    info!(
        "{} records across {} subdivisions",
        dataset.len(),
        dataset.subdivisions().len()
    );

    let options = TrainOptions {
        test_size: config.test_size,
        seed: config.split_seed,
    };
    let report = train(&dataset, &FeatureEncoder::default(), options).context("training the model")?;
    match report.r2 {
        Some(r2) => println!("R2 Score: {r2}"),
        None => println!("R2 Score: n/a (dataset too small to hold out a test split)"),
    }

    let paths = ArtifactPaths {
        model: config.model_path.clone(),
        columns: config.columns_path.clone(),
    };
    paths
        .save(&report.model, &report.columns)
        .context("saving model artifacts")?;

    println!("Model and feature columns saved successfully");
    Ok(())
}
