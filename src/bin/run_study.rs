//! Demo binary: run both pipelines and the comparison, emit JSON tables.
//!
//! Uses the synthetic provider by default; pass `--data-dir <path>` to
//! read local DATASUS parquet extracts instead, and `--out <file>` to
//! write the tables somewhere other than stdout.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::info;

use datasus_dm::{ProviderConfig, StudyConfig, run_full};

struct Args {
    data_dir: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        data_dir: None,
        out: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = iter.next().context("--data-dir requires a path")?;
                args.data_dir = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = iter.next().context("--out requires a path")?;
                args.out = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let mut config = StudyConfig::default();
    if let Some(root) = args.data_dir {
        config.provider = ProviderConfig::Parquet { root };
    }
    info!("{config}");

    let study = run_full(&config).context("study run failed")?;

    info!(
        "mortality: {} raw records, {} cases, {} rejected",
        study.mortality.filter_report.input,
        study.mortality.filter_report.accepted,
        study.mortality.filter_report.rejected
    );
    info!(
        "morbidity: {} raw records, {} cases, {} rejected",
        study.morbidity.filter_report.input,
        study.morbidity.filter_report.accepted,
        study.morbidity.filter_report.rejected
    );

    let document = serde_json::json!({
        "mortality": study.mortality.tables,
        "morbidity": study.morbidity.tables,
        "comparison": study.comparison.table,
    });
    let rendered = serde_json::to_string_pretty(&document)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("tables written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}
