//! # nestia-transform
//!
//! CLI tool for rewriting typed route decorators from type snapshots.
//!
//! ## Usage
//!
//! ```bash
//! # Transform every snapshot under the current directory
//! nestia-transform transform
//!
//! # Write printed decorators instead of rewritten snapshots
//! nestia-transform transform --format typescript --output ./generated
//!
//! # Generate validate-mode artifacts
//! nestia-transform transform --stringify validate
//!
//! # Watch mode for development
//! nestia-transform transform --watch
//!
//! # Dry run to preview changes
//! nestia-transform transform --dry-run
//!
//! # Initialize configuration
//! nestia-transform init
//!
//! # Fail if any snapshot is not transformed yet
//! nestia-transform check --input ./transformed
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use nestia_transform::StringifyMode;

use nestia_transform_cli::{
    config::{CliArgs, Config, ConfigManager, OutputFormat},
    error::CliError,
    loader::SnapshotLoader,
    logging::init_logging,
    runner::{RunOutput, TransformRunner},
    scanner::SnapshotScanner,
    watcher::FileWatcher,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "nestia-transform")]
#[command(author, version, about = "Append generated validators and serializers to typed route decorators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform type snapshots and write the results
    Transform {
        /// Input directory containing *.nestia.json snapshots
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Closure carried by generated artifacts
        #[arg(long)]
        stringify: Option<StringifyMode>,

        /// What to write per snapshot
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Root of the local decorator sources
        #[arg(long)]
        package_root: Option<PathBuf>,

        /// Filter snapshots by relative path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Watch for snapshot changes and transform again
        #[arg(short, long)]
        watch: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that every snapshot is already in transformed form
    Check {
        /// Input directory containing *.nestia.json snapshots
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Root of the local decorator sources
        #[arg(long)]
        package_root: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "nestia-transform.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            stringify,
            format,
            package_root,
            filter,
            dry_run,
            watch,
            config,
        } => {
            let args = CliArgs {
                input,
                filter,
                output,
                format,
                stringify,
                package_root,
            };
            cmd_transform(config, &args, watch, dry_run)
        }

        Commands::Check {
            input,
            package_root,
            config,
        } => {
            let args = CliArgs {
                input,
                package_root,
                ..Default::default()
            };
            cmd_check(config, &args)
        }

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

/// Load the config file, apply flags and set up logging.
fn load_config(config_path: Option<PathBuf>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, args);
    init_logging(&config.log.level);
    Ok(config)
}

/// Transform command implementation.
fn cmd_transform(
    config_path: Option<PathBuf>,
    args: &CliArgs,
    watch: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path, args)?;

    if watch {
        run_watch_mode(&config, dry_run)
    } else {
        run_transform(&config, dry_run)
    }
}

/// Scan, load and transform once.
///
/// `check` is strict: it fails on the first unloadable snapshot and scans
/// the output directory like any other.
fn transform_snapshots(config: &Config, strict: bool) -> Result<Option<RunOutput>, CliError> {
    println!("{}", "Scanning for type snapshots...".cyan());

    let mut scanner = SnapshotScanner::new(&config.input.dir);
    if !strict {
        scanner = scanner.excluding(&config.output.dir);
    }
    if let Some(pattern) = &config.input.filter {
        scanner = scanner.with_filter(pattern)?;
    }

    let files = scanner.scan_allow_empty()?;
    if files.is_empty() {
        println!("{}", "No snapshot files found.".yellow());
        return Ok(None);
    }

    println!("  Found {} snapshot(s)", files.len().to_string().green());

    let (snapshots, errors) = SnapshotLoader::new().load_files(&files);

    if !errors.is_empty() {
        if strict {
            if let Some(error) = errors.into_iter().next() {
                return Err(error.into());
            }
        } else {
            println!("{} {} snapshot(s) failed to load:", "Warning:".yellow(), errors.len());
            for error in &errors {
                println!("  {}", error);
            }
        }
    }

    println!(
        "{}",
        format!("Transforming ({} mode)...", config.transform.stringify).cyan()
    );

    let output = TransformRunner::new(config).run(&snapshots);

    println!(
        "  Augmented {} decorator(s), left {} unchanged",
        output.augmented().to_string().green(),
        output.skipped().to_string().dimmed()
    );

    Ok(Some(output))
}

/// Run the transform once and write the results.
fn run_transform(config: &Config, dry_run: bool) -> Result<(), CliError> {
    let Some(output) = transform_snapshots(config, false)? else {
        return Ok(());
    };

    let writer = FileWriter::new(dry_run);
    let format = config.output.format;

    for snapshot in &output.snapshots {
        let path = snapshot.output_path(&config.output.dir, format);
        match writer.write(&path, &snapshot.render(format))? {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Unchanged { path } => {
                println!("{} Unchanged {}", "·".dimmed(), path.display());
            }
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", config.input.dir.display());
    println!("  Press Ctrl+C to stop\n");

    run_transform(config, dry_run)?;

    let watcher = FileWatcher::new(&config.input.dir).ignoring(&config.output.dir);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if let Some(message) = event.error_message() {
            println!("{} {}", "Watch error:".red(), message);
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Snapshot changed:".cyan(), path.display());
        }

        if let Err(e) = run_transform(config, dry_run) {
            println!("{} {}", "Transform error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(config_path: Option<PathBuf>, args: &CliArgs) -> Result<(), CliError> {
    let config = load_config(config_path, args)?;

    let Some(output) = transform_snapshots(&config, true)? else {
        return Ok(());
    };

    let changed: Vec<_> = output.changed().collect();
    if changed.is_empty() {
        println!("{} All snapshots are transformed", "✓".green());
        return Ok(());
    }

    println!(
        "{} {} snapshot(s) would change:",
        "✗".red(),
        changed.len()
    );
    for snapshot in &changed {
        println!(
            "  {} ({} decorator(s))",
            snapshot.relative_path.display(),
            snapshot.report.augmented()
        );
    }
    println!("  Run 'nestia-transform transform' to update");

    Err(CliError::Validation(format!(
        "{} snapshot(s) are not transformed",
        changed.len()
    )))
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
