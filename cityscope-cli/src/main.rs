//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use cityscope_cli::CliError;

fn main() {
    pretty_env_logger::init_custom_env("RUST_LOG");
    if let Err(err) = cityscope_cli::run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("cityscope: {err}");
        std::process::exit(1);
    }
}
