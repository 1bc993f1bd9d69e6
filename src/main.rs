use clap::Parser;
use ssefetch::cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    ssefetch::cli::run(Cli::parse()).await
}
