use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dvd_discid::config::{Identify, OutputFormat};
use dvd_discid::{compute_identifier, DiscReport, DiscLayout, LayoutReport, LocalFs};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dvd-discid", version, about = "Compute the disc id of a DVD-Video volume")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the disc id of each volume
    Id {
        /// Volume roots (the folders holding VIDEO_TS)
        paths: Vec<String>,

        /// Output format [default: dashed]; overrides the config file's format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// JSON file with extra volume paths and a format, e.g.
        /// {"paths": ["/mnt/dvd"], "format": "both"}
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the entries and samples hashed for a volume
    Inspect {
        path: String,

        /// Emit JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().cmd {
        Commands::Id { paths, format, config } => {
            let cfg = match config {
                Some(file) => {
                    let mut cfg = load_config(&file)?;
                    cfg.paths.extend(paths);
                    cfg.format = format.or(cfg.format);
                    cfg
                }
                None => Identify { paths, format },
            };
            identify(&cfg)
        }
        Commands::Inspect { path, json } => inspect(&path, json),
    }
}

fn load_config(file: &Path) -> Result<Identify> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read config {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", file.display()))
}

fn identify(cfg: &Identify) -> Result<()> {
    if cfg.paths.is_empty() {
        bail!("no volume path given");
    }
    let mut failed = 0usize;
    for path in &cfg.paths {
        tracing::info!("analysing volume: {path}");
        match compute_identifier(path) {
            Ok(id) => match cfg.format() {
                OutputFormat::Dashed => println!("{id}"),
                OutputFormat::Compact => println!("{id:x}"),
                OutputFormat::Both => {
                    println!("{id}");
                    println!("{id:x}");
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string(&DiscReport::new(path, id))?);
                }
            },
            Err(err) => {
                tracing::error!("{path}: {err}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} volumes could not be identified", cfg.paths.len());
    }
    Ok(())
}

fn inspect(path: &str, json: bool) -> Result<()> {
    tracing::info!("analysing volume: {path}");
    let layout = DiscLayout::capture(&LocalFs, Path::new(path))
        .with_context(|| format!("failed to read volume {path}"))?;
    let report = LayoutReport::new(path, &layout);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for e in &report.entries {
        println!("{:<16} {:>10} {:>20} {}", e.name, e.size, e.filetime, e.modified);
    }
    let [ifo, vts] = report.sample_sizes;
    println!("samples: VIDEO_TS.IFO {ifo} bytes, VTS_01_0.IFO {vts} bytes");
    println!("{}", report.disc_id.dashed);
    Ok(())
}
