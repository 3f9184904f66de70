use clap::Parser;
use tracing_subscriber::EnvFilter;
use workflow_probe::cli::commands::{cmd_locators, cmd_run, RunOptions};
use workflow_probe::cli::config::{Cli, Commands, load_config};

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            base_url,
            driver,
            prefix,
            format,
            output,
            trace,
        } => {
            let options = RunOptions::resolve(
                &config,
                base_url.as_deref(),
                driver.as_deref(),
                prefix.as_deref(),
                format.as_deref(),
                output.as_deref(),
                trace.as_deref(),
            )?;
            let all_passed = cmd_run(&config, &options)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Locators => cmd_locators(),
    }

    Ok(())
}
