use clap::{Parser, Subcommand};
use iconsmith::config::{self, GenerationConfig};
use iconsmith::{generate, output, paths};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iconsmith")]
#[command(version)]
#[command(about = "Asset pipeline for icon libraries")]
#[command(long_about = "\
Asset pipeline for icon libraries

Your filesystem is the data source. Brand directories hold raw SVG files
whose names encode identity, and a single generate run turns the tree into
typed component modules, an export index, and a metadata catalog.

Source structure:

  assets/
  ├── gitlab/
  │   ├── logo.svg                 # category \"logos\", default color/mode
  │   ├── arrow-mono.svg           # monochrome variant
  │   └── arrow-mono-dark.svg      # monochrome, dark-mode variant
  └── vercel/
      └── icon-light.svg           # light-mode variant

Filename grammar: category[-mono][-dark|-light].svg

Output (the output root is cleared and rebuilt on every run):

  .assets/
  ├── gitlab/logo.ts               # generated component module
  ├── gitlab/logo.json             # structural tree data
  ├── index.ts                     # one export per asset
  └── metadata.ndjson              # one catalog record per asset

Run 'iconsmith gen-config' to print a documented iconsmith.toml.")]
struct Cli {
    /// Source directory of raw SVG assets
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory for generated artifacts
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(long, default_value = "iconsmith.toml", global = true)]
    config: PathBuf,

    /// Maximum number of assets processed in parallel
    #[arg(long, global = true)]
    max_concurrency: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the discovered asset inventory, grouped by brand
    Scan,
    /// Generate components, the export index, and the metadata catalog
    Generate,
    /// Validate asset filenames and paths without generating
    Check,
    /// Print a stock iconsmith.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = std::error::Error::source(err.as_ref());
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = GenerationConfig::load_or_default(&cli.config)?;
    if let Some(source) = cli.source {
        config.source_dir = source;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(max_concurrency) = cli.max_concurrency {
        config.max_concurrency = max_concurrency;
    }

    match cli.command {
        Command::Scan => {
            config.validate()?;
            let (assets, problems) = plan_inventory(&config)?;
            output::print_scan_output(&assets, &problems);
        }
        Command::Generate => {
            let summary = generate::generate(&config).await?;
            output::print_generate_output(&summary);
        }
        Command::Check => {
            config.validate()?;
            let (assets, problems) = plan_inventory(&config)?;
            let checked = assets.len() + problems.len();
            output::print_check_output(checked, &problems);
            if !problems.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Plan every discovered asset, splitting the inventory into valid plans
/// and (source, error message) pairs for files that fail the grammar or
/// the path safety rules.
fn plan_inventory(
    config: &GenerationConfig,
) -> Result<(Vec<paths::AssetPaths>, Vec<(String, String)>), generate::GenerateError> {
    let mut assets = Vec::new();
    let mut problems = Vec::new();
    for entry in generate::discover_assets(&config.source_dir)? {
        let source = entry.parent_dir.join(&entry.file_name);
        match paths::AssetPaths::plan(
            &config.source_dir,
            &config.output_dir,
            &entry.parent_dir,
            &entry.file_name,
        ) {
            Ok(planned) => assets.push(planned),
            Err(err) => problems.push((source.display().to_string(), err.to_string())),
        }
    }
    Ok((assets, problems))
}
