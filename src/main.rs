use clap::Parser;
use traderewind::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
