//! Main application entry point.

use boothkit_app::{Cli, run};
use clap::Parser;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("running {:?}", cli.command);

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            eprintln!("boothkit: {e}");
            std::process::exit(1);
        }
    }
}
