pub mod app;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod interface;
pub mod log;
pub mod output;
pub mod probe;
pub mod protocol;
pub mod signal;
pub mod stdin;
pub mod validator;

use clap::error::ErrorKind;

use crate::app::EXIT_FAILURE;
use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_FAILURE,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let logger = log::build_logger(&cli);
    if let Err(e) = log::init_logger(&logger) {
        app::print_error(&e);
        std::process::exit(EXIT_FAILURE);
    }
    tracing::debug!(?cli, "starting");

    let result = if cli.interfaces {
        cmd::interface::show(&cli).map(|_| app::EXIT_SUCCESS)
    } else {
        cmd::probe::run(&cli, logger).await
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            app::print_error(&e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}
