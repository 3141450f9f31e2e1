//! highlite - paint a file with its highlighting rules

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use highlite::config::{ConfigSource, TomlConfig};
use highlite::error::{HighlightError, Result};
use highlite::syntax::builtin;
use highlite::terminal::{self, Terminal};
use highlite::HighlightEditor;

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    dump: bool,
    verbose: u8,
    file: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let Some(args) = parse_args(env::args().skip(1))? else {
        return Ok(());
    };
    init_logging(args.verbose);

    let Some(file) = args.file else {
        print_usage();
        process::exit(2);
    };

    let config = load_config(args.config.as_deref(), &file)?;
    let mut editor = HighlightEditor::new(config, Terminal::stdout());
    let report = editor.open_file(&file)?;
    info!(
        accepted = report.accepted,
        dropped = report.diagnostics.len(),
        "declarations loaded"
    );

    if args.dump {
        terminal::write_dump(&mut io::stdout().lock(), editor.highlighter())?;
    } else {
        let (buffer, highlighter, display) = editor.parts_mut();
        display.render(buffer, highlighter)?;
    }
    Ok(())
}

/// Returns `None` when the arguments asked for help or version only
fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--config" | "-c" => {
                let path = argv
                    .next()
                    .ok_or_else(|| HighlightError::config("-c needs a folder or file"))?;
                args.config = Some(PathBuf::from(path));
            }
            "--dump" => args.dump = true,
            flag if flag.starts_with("-v") && flag[1..].bytes().all(|b| b == b'v') => {
                args.verbose = args.verbose.saturating_add((flag.len() - 1) as u8);
            }
            flag if flag.starts_with('-') => {
                return Err(HighlightError::config(format!("unknown option {flag}")));
            }
            _ => args.file = Some(PathBuf::from(arg)),
        }
    }
    Ok(Some(args))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

/// Pick the declaration source: explicit path, config folder, built-in set
fn load_config(explicit: Option<&Path>, file: &Path) -> Result<Box<dyn ConfigSource>> {
    if let Some(path) = explicit {
        let config = if path.is_dir() {
            TomlConfig::load_dir(path)?
        } else {
            TomlConfig::from_file(path)?
        };
        debug!(path = %path.display(), "using explicit config");
        return Ok(Box::new(config));
    }

    if let Some(dir) = TomlConfig::default_dir().filter(|dir| dir.is_dir()) {
        debug!(dir = %dir.display(), "using config folder");
        return Ok(Box::new(TomlConfig::load_dir(&dir)?));
    }

    let config = match builtin::for_path(file) {
        Some(config) => config?,
        None => builtin::c_config()?,
    };
    debug!("using built-in rules");
    Ok(Box::new(config))
}

fn print_usage() {
    println!("highlite {} - incremental syntax highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: highlite [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -c, --config PATH  Config folder or file (default ~/.highlite)");
    println!("      --dump         Print the style table and style buffer");
    println!("  -v                 More logging, repeat for more");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!();
    println!("Built-in rule sets: {}", builtin::names().join(", "));
}

fn print_version() {
    println!("highlite {}", env!("CARGO_PKG_VERSION"));
}
