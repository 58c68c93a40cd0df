use codepath_core::resolver::SearchPathResolver;
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Archive")]
    archive: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Artifact")]
    artifact: String,
}

pub fn run(path: &str, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = SearchPathResolver::new(path, out, None)?;

    let rows: Vec<EntryRow> = resolver
        .entries()
        .iter()
        .map(|entry| EntryRow {
            source: entry.source().display().to_string(),
            archive: match entry.archive() {
                Some(handle) => format!("{} members", handle.member_count()),
                None => "-".to_string(),
            },
            unit: match entry.unit() {
                Some(unit) => format!("{} definitions", unit.len()),
                None => "-".to_string(),
            },
            artifact: entry.artifact().display().to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}
