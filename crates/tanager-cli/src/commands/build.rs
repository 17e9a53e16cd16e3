use std::fs;
use std::path::PathBuf;

use super::load_source;

pub struct BuildArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

pub fn run(args: BuildArgs) {
    let source = load_source(&args.input);

    let out = match tanager_compiler::compile(&source) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let output = args.output.unwrap_or_else(|| {
        if args.input.as_os_str() == "-" {
            PathBuf::from("out.lua")
        } else {
            args.input.with_extension("lua")
        }
    });

    if let Err(e) = fs::write(&output, &out.lua) {
        eprintln!("error: failed to write {}: {e}", output.display());
        std::process::exit(1);
    }

    print!("{}", out.report);
}
