use colored::*;
use console::style;
use romusage::cli;
use romusage::environment::Options;
use romusage::error::Result;
use romusage::pipeline;
use romusage::report::Warning;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let arguments = cli::app().get_matches_from(cli::normalize_args(std::env::args()));

    let options = match cli::build_options(&arguments) {
        Ok(options) => options,
        Err(e) => {
            println!("{}\n", style(e).bold().red());
            if let Err(e) = print_usage() {
                println!("{}", style(e).bold().red());
            }
            process::exit(1);
        }
    };

    init_logging(options.debug);

    // input_file is required, clap exits before getting here without it
    let input_file = arguments.value_of("input_file").unwrap_or_default();

    match report_usage(Path::new(input_file), &options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            println!("{}", style(e).bold().red());
            process::exit(1);
        }
    }
}

fn print_usage() -> Result<()> {
    cli::app().print_help()?;
    println!();
    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the run succeeded.
fn report_usage(input_file: &Path, options: &Options) -> Result<bool> {
    if options.debug {
        println!("{}:\n{}\n---", "Options".bold(), style(options).cyan());
    }

    let outcome = pipeline::run(input_file, options)?;

    if !options.quiet {
        print!("{}", outcome.report());
    }

    for warning in outcome.diagnostics().warnings() {
        match warning {
            Warning::UnknownCapacity { .. } => println!("{}", warning.to_string().dimmed()),
            _ if outcome.failed() => println!("{}", warning.to_string().red()),
            _ => println!("{}", warning.to_string().yellow()),
        }
    }

    Ok(!outcome.failed())
}
