//! Command implementations.

use anyhow::{Context, Result};
use comfy_table::Table;

use dqi_cli::pipeline::{RunResult, run_study};
use dqi_score::{Dimension, ScoringConfig};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

pub fn run_run(args: &RunArgs) -> Result<RunResult> {
    let config = match &args.config {
        Some(path) => ScoringConfig::from_json_file(path)
            .with_context(|| format!("load scoring config {}", path.display()))?,
        None => ScoringConfig::default(),
    };
    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| args.study_dir.join("dqi.db"));
    run_study(&args.study_dir, config, &db_path)
}

pub fn run_dimensions() -> Result<()> {
    let config = ScoringConfig::default();
    let mut table = Table::new();
    table.set_header(vec!["Dimension", "Default Threshold", "Default Weight"]);
    apply_table_style(&mut table);
    for dimension in Dimension::ALL {
        table.add_row(vec![
            dimension.as_str().to_string(),
            format!("{}", config.thresholds.get(dimension)),
            format!("{:.2}", config.weights.get(dimension)),
        ]);
    }
    println!("{table}");
    Ok(())
}
