mod app;
mod cli;
mod config;
mod consts;
mod diff;
mod error;
mod logging;
mod output;
mod pricing;
mod snapshot;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug, cli.quiet);

    // Config file values only fill options not given on the command line
    let config = Config::load();
    let cli = cli.with_config(&config);

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
