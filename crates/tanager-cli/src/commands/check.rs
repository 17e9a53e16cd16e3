use std::path::PathBuf;

use super::load_source;

pub struct CheckArgs {
    pub input: PathBuf,
    pub json: bool,
}

pub fn run(args: CheckArgs) {
    let source = load_source(&args.input);

    let out = match tanager_compiler::compile(&source) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&out.report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", out.report);
    }
}
