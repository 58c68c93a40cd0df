use codepath_core::image::{UNIT_ENTRY, UnitDef, UnitImage};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Write a test archive holding the given definitions and resources.
/// An empty `defs` slice produces a resource-only archive (no unit image).
#[allow(dead_code)]
pub fn write_archive(path: &Path, defs: &[(&str, &str)], resources: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    if !defs.is_empty() {
        let image = UnitImage::new(
            defs.iter()
                .map(|(name, descriptor)| UnitDef::new(*name, *descriptor, Vec::new()))
                .collect(),
        );
        zip.start_file(UNIT_ENTRY, options).unwrap();
        zip.write_all(&image.encode().unwrap()).unwrap();
    }

    for (name, bytes) in resources {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }

    zip.finish().unwrap();
}

/// Join paths into a delimiter-separated search path list.
#[allow(dead_code)]
pub fn path_list(paths: &[&Path]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&codepath_core::native::PATH_LIST_SEPARATOR.to_string())
}
