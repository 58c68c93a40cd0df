use codepath_core::error::ResolveError;
use codepath_core::resolver::SearchPathResolver;
use std::path::Path;

/// Exit code for a name absent from every configured archive.
pub const EXIT_NOT_FOUND: i32 = 2;
/// Exit code for a name present but denied by policy.
pub const EXIT_NOT_ALLOWED: i32 = 3;

pub fn run(
    name: &str,
    path: &str,
    out: &Path,
    lib_path: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = SearchPathResolver::new(path, out, lib_path)?;

    match resolver.resolve_unit(name) {
        Ok(binding) => {
            if json {
                let value = serde_json::json!({
                    "name": binding.name,
                    "source": binding.source,
                    "descriptor": binding.def.descriptor,
                    "body_bytes": binding.def.body.len(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!(
                    "{} -> {} ({}, {} bytes)",
                    binding.name,
                    binding.source.display(),
                    binding.def.descriptor,
                    binding.def.body.len()
                );
            }
            Ok(())
        }
        Err(err @ ResolveError::NotFound(_)) => {
            eprintln!("{err}");
            std::process::exit(EXIT_NOT_FOUND);
        }
        Err(err @ ResolveError::NotAllowed(_)) => {
            eprintln!("{err}");
            std::process::exit(EXIT_NOT_ALLOWED);
        }
        Err(err) => Err(err.into()),
    }
}
