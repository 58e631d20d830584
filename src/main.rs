use clap::{Parser, Subcommand};
use postcheck::scan::{self, Outcome};
use postcheck::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "postcheck")]
#[command(version, about = "Front-matter checker for Jekyll-style post collections")]
#[command(long_about = "\
Front-matter checker for Jekyll-style post collections

Every Markdown file may start with a metadata block fenced by `---` lines.
postcheck parses that block, checks it against the layout rules in
postcheck.toml, and reports problems per file. Files are never modified.

Source structure:

  blog/
  ├── postcheck.toml                  # Checker config (optional)
  ├── about.md                        # Page
  ├── _posts/
  │   └── 2021-03-14-test-doubles.md  # Post: YYYY-MM-DD-slug
  └── _site/                          # Build output (skipped)

Set RUST_LOG=debug to see which files are skipped and why.

Run 'postcheck gen-config' to print a documented postcheck.toml.")]
struct Cli {
    /// Source directory (its postcheck.toml is used for every command)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate every document under the source directory
    Check {
        /// Exit non-zero on validation findings, not only on parse failures
        #[arg(long)]
        strict: bool,
        /// Only list documents that failed or have findings
        #[arg(long)]
        problems_only: bool,
        /// Print the full manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the parsed front matter, identity, outline and findings of one file
    Show {
        file: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock postcheck.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check {
            strict,
            problems_only,
            json,
        } => {
            let check_config = config::load_config(&cli.source)?;
            init_thread_pool(&check_config.processing);
            let manifest = scan::scan_with_config(&cli.source, check_config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                output::print_check_report(&manifest, problems_only);
            }

            if manifest.summary().exit_failure(strict) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Show { file, json } => {
            let check_config = config::load_config(&cli.source)?;
            match scan::check_path(&file, &check_config.layouts) {
                Outcome::Checked(checked) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&checked)?);
                    } else {
                        output::print_document(&checked);
                    }
                }
                Outcome::Failed { error } => {
                    eprintln!("{}: {}", file.display(), error);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Size the global rayon pool from `[processing]`. Never above the core count.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    log::debug!("using {} worker threads", threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
