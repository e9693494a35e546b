use anyhow::{Context, Result};
use colored::Colorize;
use jythonc_driver::cli::{self, Cli};
use jythonc_driver::config::{discover_config, load_config_from, FileConfig};
use jythonc_driver::observability::install_panic_hook;
use jythonc_driver::{CompilePipeline, PipelineResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    install_panic_hook();

    let args = cli::parse_args();
    cli::init_logging(args.verbose);

    match run(args) {
        Ok(result) => {
            print_summary(&result);
            if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<PipelineResult> {
    let file_config = load_file_config(&args)?;
    let config = args.into_config(file_config)?;

    let result = CompilePipeline::default()
        .execute(&config)
        .context("Compilation aborted")?;
    Ok(result)
}

fn load_file_config(args: &Cli) -> Result<FileConfig> {
    match &args.config {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(discover_config()
            .map(|(_, config)| config)
            .unwrap_or_default()),
    }
}

fn print_summary(result: &PipelineResult) {
    for report in result.failures() {
        let reason = match (report.error(), report.process_result()) {
            (Some(error), _) => format!("[{}] {}", error.code(), error),
            (None, Some(process)) => format!("jythonc exited with status {}", process.exit_code),
            (None, None) => "not compiled".to_string(),
        };
        eprintln!(
            "{} {}: {}",
            "failed".red(),
            report.file().display(),
            reason
        );
    }

    if result.is_success() {
        println!("{} {}", "✓".green().bold(), result);
    } else {
        println!("{} {}", "✗".red().bold(), result);
    }
}
