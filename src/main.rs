use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cuentapublica::history::load_last_run;
use cuentapublica::{pipeline, PipelineConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Normalize the Cuenta Pública workbooks and compile the detailed and totals tables"
)]
struct Args {
    /// YAML file with pipeline settings; flags below override it.
    #[arg(short, long, env = "CUENTA_PUBLICA_CONFIG")]
    config: Option<PathBuf>,
    /// Directory holding `<year>.xls`.
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Directory for the per-year CSVs and the run manifest.
    #[arg(long)]
    intermediate_dir: Option<PathBuf>,
    /// Output path of the detailed table.
    #[arg(long)]
    detailed: Option<PathBuf>,
    /// Output path of the totals table.
    #[arg(long)]
    totals: Option<PathBuf>,
    #[arg(long)]
    first_year: Option<u16>,
    #[arg(long)]
    last_year: Option<u16>,
    /// Convert one year at a time.
    #[arg(long)]
    sequential: bool,
    /// Compile from existing intermediate CSVs without reading workbooks.
    #[arg(long)]
    skip_convert: bool,
}

impl Args {
    fn into_config(self) -> Result<(PipelineConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = self.input_dir {
            config.input_dir = dir;
        }
        if let Some(dir) = self.intermediate_dir {
            config.intermediate_dir = dir;
        }
        if let Some(path) = self.detailed {
            config.detailed_output = path;
        }
        if let Some(path) = self.totals {
            config.totals_output = path;
        }
        if let Some(year) = self.first_year {
            config.first_year = year;
        }
        if let Some(year) = self.last_year {
            config.last_year = year;
        }
        if self.sequential {
            config.parallel = false;
        }
        config.validate()?;
        Ok((config, self.skip_convert))
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) resolve configuration ────────────────────────────────────
    let (config, skip_convert) = Args::parse().into_config()?;
    info!(
        input = %config.input_dir.display(),
        intermediate = %config.intermediate_dir.display(),
        first_year = config.first_year,
        last_year = config.last_year,
        parallel = config.parallel,
        "startup"
    );
    match load_last_run(&config.intermediate_dir) {
        Ok(Some(last)) => info!(
            completed_at = %last.completed_at,
            years = last.years.len(),
            detailed = last.detailed_rows,
            totals = last.totals_rows,
            "previous run"
        ),
        Ok(None) => info!("no previous run recorded"),
        Err(e) => warn!("ignoring unreadable run manifest: {}", e),
    }

    // ─── 3) convert every year, then compile ─────────────────────────
    match pipeline::run(&config, skip_convert) {
        Ok(manifest) => {
            info!(
                years = manifest.years.len(),
                detailed = manifest.detailed_rows,
                totals = manifest.totals_rows,
                "all done"
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            match e.year() {
                Some(year) => Err(e).with_context(|| format!("pipeline stopped at year {}", year)),
                None => Err(e.into()),
            }
        }
    }
}
