use std::io;

use anyhow::Context;
use tracing::info;

use rainfall::config::AppConfig;
use rainfall::dashboard::Dashboard;
use rainfall::data_handling::rainfall_csv::RainfallCsv;
use rainfall::data_handling::DataSource;
use rainfall::features::AlignmentMode;
use rainfall::helper_functions::{init_logging, project_root};
use rainfall::model::ArtifactPaths;
use rainfall::prediction::PredictionService;

fn main() -> anyhow::Result<()> {
    init_logging();

    let root = project_root();
    let config = AppConfig::load(&root).context("loading configuration")?;

    // One-time initialisation; both values are read-only afterwards
    let dataset = RainfallCsv::new(&config.data_path)
        .load()
        .context("loading the rainfall dataset")?;
    let mode = if config.strict_alignment {
        AlignmentMode::Strict
    } else {
        AlignmentMode::Lenient
    };
    let paths = ArtifactPaths {
        model: config.model_path.clone(),
        columns: config.columns_path.clone(),
    };
    let service = PredictionService::from_artifacts(&paths, mode)
        .context("loading model artifacts; run the `rainfall` training binary first")?;
    info!("Alignment mode: {:?}", mode);

    let stdin = io::stdin();
    let mut dashboard = Dashboard::new(
        &dataset,
        &service,
        config.default_month_value,
        &config.chart_dir,
        stdin.lock(),
        io::stdout(),
    );
    dashboard.run()?;
    Ok(())
}
