use clap::{Parser, Subcommand};
use konfetka::{config, output, shell, simulate, site};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "konfetka")]
#[command(about = "Photo album generator with filters, layouts and a lightbox")]
#[command(long_about = "\
Photo album generator with filters, layouts and a lightbox

The catalog is a TOML file. Every combination of category filter and layout
becomes a page, and every photo in it gets a lightbox page.

Content structure:

  content/
  ├── photos.toml      # [[photos]] records, optional [[categories]] labels
  ├── config.toml      # Site config (optional, overrides stock defaults)
  ├── shell.html       # Custom page layout with <!-- mount:NAME --> markers
  ├── intro.md         # Markdown shown under the title
  └── images/          # Photo files, copied to the output

Set RUST_LOG=konfetka=debug for per-page and per-event logging.

Run 'konfetka gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every gallery state to static HTML
    Build,
    /// Validate content directory without building
    Check,
    /// Replay an event script and print what each event did
    Simulate {
        /// Event script, one event per line
        script: PathBuf,
        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "konfetka=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = site::build(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", report.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let content = site::load_content(&cli.source)?;
            let custom_shell = cli.source.join(shell::SHELL_FILE).exists();
            output::print_check_output(&content, custom_shell);
            println!("==> Content is valid");
        }
        Command::Simulate { script, json } => {
            let transcript = simulate::simulate(&cli.source, &script)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                output::print_transcript(&transcript);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
