pub mod build;
pub mod check;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a source file, with "-" standing for stdin.
pub fn load_source(path: &Path) -> String {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: failed to read stdin: {e}");
            std::process::exit(1);
        }
        return buf;
    }

    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
