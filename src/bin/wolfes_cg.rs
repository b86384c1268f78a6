//! WOLfes code generator CLI
//!
//! Compiles a configuration document into validated IR. Source emission is
//! handled by generator back ends that are not part of this tool yet.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use wolfes_cg::{Compiler, Diagnostics, ErrorCode, Severity, ToolConfig};

#[derive(Parser)]
#[command(name = "wolfes-cg")]
#[command(version)]
#[command(about = "Compile a WOLfes app configuration into generator IR")]
struct Cli {
    /// Log level: DEBUG=10, INFO=20, WARN=30, ERROR=40, CRITICAL=50
    #[arg(long)]
    loglevel: Option<u8>,

    /// Input config file path
    #[arg(short, long)]
    input: Option<String>,

    /// Directory for generated files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tool configuration file (TOML)
    #[arg(long)]
    config: Option<String>,

    /// Print the validated IR as JSON
    #[arg(long)]
    dump_ir: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(ErrorCode::InvalidArgument.as_i32());
        }
    };

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ErrorCode::Failure
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: Cli) -> anyhow::Result<ErrorCode> {
    let config = ToolConfig::load_from(cli.config.as_deref()).context("loading tool configuration")?;

    let level = match cli.loglevel {
        None => config.logging.level.clone(),
        Some(n) => match level_directive(n) {
            Some(level) => level.to_string(),
            None => {
                eprintln!("invalid loglevel: {}", n);
                return Ok(ErrorCode::InvalidArgument);
            }
        },
    };
    init_logging(&level, config.log_file().as_deref())?;

    let Some(input) = cli.input else {
        Cli::command().print_help()?;
        tracing::error!("command line missing --input");
        return Ok(ErrorCode::InvalidArgument);
    };
    let Some(output) = cli.output.or_else(|| config.output.dir.clone()) else {
        Cli::command().print_help()?;
        tracing::error!("command line missing --output");
        return Ok(ErrorCode::InvalidArgument);
    };
    tracing::info!("input: {}, output: {}", input, output.display());

    let mut diagnostics = Diagnostics::new();
    let result = Compiler::new().compile_file(&input, &mut diagnostics);
    render(&diagnostics);

    let ir = match result {
        Ok(ir) => ir,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(e.code());
        }
    };
    tracing::info!("compiled {}: {}", input, ir.summary());

    if cli.dump_ir {
        println!("{}", config.output.format.to_json(&ir)?);
    }

    fs::create_dir_all(&output)
        .with_context(|| format!("creating output directory {}", output.display()))?;
    tracing::warn!(
        "no generator back end available, nothing written to {}",
        output.display()
    );

    Ok(ErrorCode::Success)
}

/// Map the numeric levels of the original tool to a filter directive
fn level_directive(level: u8) -> Option<&'static str> {
    match level {
        10 => Some("debug"),
        20 => Some("info"),
        30 => Some("warn"),
        40 | 50 => Some("error"),
        _ => None,
    }
}

fn init_logging(level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating log directory {}", dir.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

fn render(diagnostics: &Diagnostics) {
    for item in diagnostics.iter() {
        match item.severity() {
            Severity::Info => tracing::info!("{}", item),
            Severity::Warning => tracing::warn!("{}", item),
        }
    }
}
