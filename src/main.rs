use anyhow::Result;
use clap::{Parser, Subcommand};
use devenv::{
    compose::{select_probes, Composer},
    config::Config,
    diff::diff,
    generate::{output_path, write_artifact, GeneratorKind},
    model::{ProbeKind, Snapshot},
    output::{format_json, format_snapshot, render_differences, render_validation, OutputFormat},
    probe::ScanContext,
    validate::validate,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit codes for scripting
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VALIDATION_FAILED: u8 = 1;
}

#[derive(Parser)]
#[command(name = "devenv")]
#[command(
    author,
    version,
    about = "Scan and recreate your developer environment"
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the current system for developer tools and configuration
    Scan {
        /// Write output to file
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (summary, json, yaml, script)
        #[arg(short, long)]
        format: Option<String>,

        /// Only run these probes (system always runs)
        #[arg(short, long, num_args = 1.., value_delimiter = ',')]
        include: Vec<String>,

        /// Skip these probes
        #[arg(short, long, num_args = 1.., value_delimiter = ',')]
        exclude: Vec<String>,

        /// Disable concurrent scanning (run probes sequentially)
        #[arg(long)]
        no_parallel: bool,
    },

    /// Generate setup scripts from a previous scan
    Generate {
        /// Path to the JSON scan file
        input: String,

        /// Output file name
        #[arg(short, long)]
        output: Option<String>,

        /// Script type (bash, docker, ansible)
        #[arg(short = 't', long = "type", default_value = "bash")]
        kind: String,
    },

    /// Compare two environment scans
    Compare {
        /// Baseline scan file
        file1: String,

        /// Current scan file
        file2: String,
    },

    /// Validate that the current environment matches a scan
    Validate {
        /// Scan file to validate against
        file: String,
    },

    /// List available probes
    ListProbes,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Initialize the tracing subscriber on stderr.
///
/// `--verbose` forces debug output for this crate; otherwise `RUST_LOG` is
/// honoured, falling back to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("devenv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devenv=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("{}, using defaults", e);
        Config::default()
    });

    match cli.command {
        Commands::Scan {
            output,
            format,
            include,
            exclude,
            no_parallel,
        } => {
            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            let mut exclude = exclude;
            exclude.extend(config.exclude.iter().cloned());

            run_scan(
                &config,
                &format_str,
                &include,
                &exclude,
                output,
                !no_parallel && config.parallel,
            )
            .await
        }
        Commands::Generate {
            input,
            output,
            kind,
        } => run_generate(&input, output.as_deref(), &kind),
        Commands::Compare { file1, file2 } => {
            let baseline = Snapshot::load(&file1)?;
            let current = Snapshot::load(&file2)?;
            let differences = diff(&baseline, &current);

            print!(
                "{}",
                render_differences(
                    (file1.as_str(), file2.as_str()),
                    &baseline,
                    &current,
                    &differences,
                    std::io::stdout().is_terminal(),
                )
            );
            Ok(exit_codes::SUCCESS)
        }
        Commands::Validate { file } => run_validate(&config, &file).await,
        Commands::ListProbes => {
            list_probes();
            Ok(exit_codes::SUCCESS)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn scan_context(config: &Config) -> ScanContext {
    ScanContext::from_host(config.command_timeout())
        .with_concurrency(config.max_concurrent_commands)
}

fn scan_progress(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Scanning environment...");
    pb
}

async fn run_scan(
    config: &Config,
    format: &str,
    include: &[String],
    exclude: &[String],
    output_file: Option<String>,
    parallel: bool,
) -> Result<u8> {
    let format = OutputFormat::from_str(format)?;
    let kinds = select_probes(include, exclude)?;
    let is_interactive = format == OutputFormat::Summary && std::io::stderr().is_terminal();

    tracing::debug!(?kinds, parallel, "starting scan");

    let ctx = scan_context(config);
    let composer = Composer::for_kinds(&kinds).parallel(parallel);

    let progress = is_interactive.then(|| scan_progress(kinds.len()));
    let snapshot = composer.compose_with_progress(&ctx, progress.as_ref()).await;
    if let Some(pb) = progress {
        pb.finish_with_message(format!(
            "Found {} package managers, {} runtimes, {} tools",
            snapshot.package_managers.len(),
            snapshot.runtimes.len(),
            snapshot.tools.len()
        ));
    }

    match (format, output_file) {
        (OutputFormat::Script, Some(path)) => {
            let base = path.strip_suffix(".sh").unwrap_or(&path);
            for kind in [GeneratorKind::Bash, GeneratorKind::Docker] {
                let generator = kind.generator()?;
                let target = output_path(Some(base), generator.as_ref());
                write_artifact(
                    &target,
                    &generator.generate(&snapshot),
                    kind == GeneratorKind::Bash,
                )?;
                println!("Saved {} to {}", kind, target.display());
            }
        }
        (OutputFormat::Summary, Some(path)) => {
            // A summary is for the terminal; the file gets the snapshot itself.
            print!("{}", format_snapshot(&snapshot, OutputFormat::Summary)?);
            write_artifact(Path::new(&path), &format_json(&snapshot)?, false)?;
            println!("Environment data saved to {}", path);
        }
        (format, Some(path)) => {
            write_artifact(Path::new(&path), &format_snapshot(&snapshot, format)?, false)?;
            println!("Environment data saved to {}", path);
        }
        (format, None) => {
            let rendered = format_snapshot(&snapshot, format)?;
            if rendered.ends_with('\n') {
                print!("{}", rendered);
            } else {
                println!("{}", rendered);
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn run_generate(input: &str, output: Option<&str>, kind: &str) -> Result<u8> {
    let kind = GeneratorKind::from_str(kind)?;
    tracing::debug!(input, "reading scan file");
    let snapshot = Snapshot::load(input)?;

    let generator = kind.generator()?;
    let target = output_path(output, generator.as_ref());
    write_artifact(
        &target,
        &generator.generate(&snapshot),
        kind == GeneratorKind::Bash,
    )?;

    println!("Generated {} script: {}", kind, target.display());
    Ok(exit_codes::SUCCESS)
}

async fn run_validate(config: &Config, file: &str) -> Result<u8> {
    let expected = Snapshot::load(file)?;
    let ctx = scan_context(config);
    let composer = Composer::new().parallel(config.parallel);

    let progress = std::io::stderr().is_terminal().then(ProgressBar::new_spinner);
    if let Some(pb) = &progress {
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning current environment...");
    }

    let validation = validate(&expected, &composer, &ctx).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print!(
        "{}",
        render_validation(file, &expected, &validation, std::io::stdout().is_terminal())
    );

    if validation.passed() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::VALIDATION_FAILED)
    }
}

fn list_probes() {
    println!("Available probes:");
    println!();

    for kind in ProbeKind::ALL {
        let source = match kind {
            ProbeKind::System => "Process environment",
            ProbeKind::PackageManagers => "npm, yarn, pnpm, bun, brew, apt, cargo, pip, ...",
            ProbeKind::Runtimes => "node, python3, go, rustc, java, ...",
            ProbeKind::Tools => "git, docker, kubectl, terraform, jq, ...",
            ProbeKind::Git => "git config --global",
            ProbeKind::Shell => "SHELL, rc files, aliases, PATH",
            ProbeKind::Editor => "code --list-extensions, settings.json",
        };

        println!("  {:<18} {}", kind.as_str(), kind.display_name());
        println!("  {:<18} Source: {}", "", source);
        println!();
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'devenv config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
