use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tanager", bin_name = "tanager")]
#[command(about = "Typed expression language compiling to Lua")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a source file to Lua
    #[command(after_help = r#"EXAMPLES:
  tanager build program.tng
  tanager build program.tng -o out.lua"#)]
    Build {
        /// Source file (use "-" for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (defaults to the input with a .lua extension)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Typecheck a source file and print the type report
    #[command(after_help = r#"EXAMPLES:
  tanager check program.tng
  tanager check program.tng --json"#)]
    Check {
        /// Source file (use "-" for stdin)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}
