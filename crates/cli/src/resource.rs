use codepath_core::resolver::SearchPathResolver;
use std::path::Path;

use crate::resolve::EXIT_NOT_FOUND;

pub fn run(name: &str, path: &str, out: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = SearchPathResolver::new(path, out, None)?;

    match resolver.find_resource(name) {
        Some(location) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&location)?);
            } else {
                println!("{location}");
            }
            Ok(())
        }
        None => {
            eprintln!("resource '{name}' not found in any configured archive");
            std::process::exit(EXIT_NOT_FOUND);
        }
    }
}
