use codepath_core::artifact::ARTIFACT_EXT;
use std::path::Path;
use tracing::info;

pub fn run(out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !out.exists() {
        println!("nothing to clear at {}", out.display());
        return Ok(());
    }

    let mut removed = 0usize;
    for entry in std::fs::read_dir(out)? {
        let entry = entry?;
        let path = entry.path();
        if path
            .extension()
            .map(|ext| ext == ARTIFACT_EXT)
            .unwrap_or(false)
        {
            std::fs::remove_file(&path)?;
            info!("removed {}", path.display());
            removed += 1;
        }
    }

    println!(
        "removed {} derived artifact(s) from {}",
        removed,
        out.display()
    );
    Ok(())
}
