mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { input, output } => {
            commands::build::run(commands::build::BuildArgs { input, output });
        }
        Command::Check { input, json } => {
            commands::check::run(commands::check::CheckArgs { input, json });
        }
    }
}
