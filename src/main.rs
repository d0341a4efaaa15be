//! fscan - configuration checker
//!
//! # Commands
//!
//! - `fscan check <FILE>`: load every config domain from a file (YAML, TOML or
//!   JSON), optionally overlaid with `<PREFIX>_*` environment variables, and
//!   print the validated result as YAML
//! - `fscan keys`: list every external property key, grouped by domain

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fscan::keys::ConfigKey;
use fscan::models::{AnalysisKey, ApplicationKey, ReportKey, ScanKey, SerializationKey};
use fscan::{APP_NAME, ConfigLoader, VERSION};

#[derive(Debug, Parser)]
#[command(name = "fscan", version, about = "Validate fscan configuration files")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, env = "FSCAN_DEBUG")]
    debug: bool,

    /// Also write rotating log files to this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate every configuration domain
    Check {
        /// Configuration file
        file: Utf8PathBuf,

        /// Overlay environment variables with this prefix (e.g. FSCAN)
        #[arg(long, value_name = "PREFIX")]
        env_prefix: Option<String>,
    },
    /// List the external property keys
    Keys,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = fscan::logging::init_logging(cli.debug, cli.log_dir.as_deref())?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    match cli.command {
        Command::Check { file, env_prefix } => check(&file, env_prefix.as_deref()),
        Command::Keys => {
            print_keys::<ApplicationKey>();
            print_keys::<ScanKey>();
            print_keys::<AnalysisKey>();
            print_keys::<ReportKey>();
            print_keys::<SerializationKey>();
            Ok(())
        }
    }
}

fn check(file: &camino::Utf8Path, env_prefix: Option<&str>) -> Result<()> {
    let loader = match env_prefix {
        Some(prefix) => ConfigLoader::from_file_with_env(file, prefix),
        None => ConfigLoader::from_file(file),
    }
    .with_context(|| format!("Failed to load configuration: {}", file))?;

    let loaded = loader
        .load_all()
        .with_context(|| format!("Invalid configuration: {}", file))?;

    let yaml = serde_yaml_ng::to_string(&loaded).context("Failed to render configuration")?;
    print!("{yaml}");

    tracing::info!("Configuration {} is valid", file);
    Ok(())
}

fn print_keys<K: ConfigKey>() {
    println!("[{}]", K::DOMAIN);
    for key in K::all() {
        println!("  {}", key.as_str());
    }
}
