use codepath_core::native::{NativeSearchPath, platform_library_name};

use crate::resolve::EXIT_NOT_FOUND;

pub fn run(name: &str, lib_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let search_path = NativeSearchPath::new(lib_path);

    match search_path.find(name) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => {
            eprintln!(
                "library '{}' ({}) not found on {} search path entries",
                name,
                platform_library_name(name),
                search_path.dirs().len()
            );
            std::process::exit(EXIT_NOT_FOUND);
        }
    }
}
