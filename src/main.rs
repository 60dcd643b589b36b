use anyhow::Result;
use std::process;

use gitfame::{app, cli, logging};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::args::parse_args();

    cli::args::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let fame_config = cli::args_to_fame_config(&args, Some(&config_manager))?;

    let report = app::run_fame(&fame_config)?;
    if report.ends_with('\n') {
        print!("{}", report);
    } else {
        println!("{}", report);
    }

    Ok(())
}
