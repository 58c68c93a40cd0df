mod common;

use codepath_core::artifact::{ARTIFACT_EXT, output_name};
use codepath_core::error::ResolveError;
use codepath_core::resolver::SearchPathResolver;
use common::{path_list, write_archive};
use std::path::Path;

#[test]
fn derived_names_follow_the_convention() {
    let dir = tempfile::tempdir().unwrap();
    let foo = dir.path().join("foo.jar");
    let bar = dir.path().join("bar.jar");
    write_archive(&foo, &[("a.A", "class")], &[]);
    write_archive(&bar, &[("b.B", "class")], &[]);
    let out = dir.path().join("cache");

    let resolver = SearchPathResolver::new(&path_list(&[&foo, &bar]), &out, None).unwrap();

    let entries = resolver.entries();
    assert_eq!(entries[0].artifact(), out.join("foo.unit"));
    assert_eq!(entries[1].artifact(), out.join("bar.unit"));
    assert!(out.join("foo.unit").is_file());
    assert!(out.join("bar.unit").is_file());
}

#[test]
fn fresh_artifact_is_reused_without_rewriting() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("app.jar");
    write_archive(&jar, &[("com.acme.Widget", "class")], &[]);
    let out = dir.path().join("cache");

    SearchPathResolver::new(&path_list(&[&jar]), &out, None).unwrap();
    let artifact = out.join("app.unit");
    assert!(artifact.is_file());

    // A read-only artifact would make any rewrite fail, so a successful
    // second construction proves the cached copy was loaded as-is.
    let mut perms = std::fs::metadata(&artifact).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&artifact, perms).unwrap();

    let resolver = SearchPathResolver::new(&path_list(&[&jar]), &out, None).unwrap();
    assert!(resolver.entries()[0].unit().is_some());
    assert!(resolver.resolve_unit("com.acme.Widget").is_ok());

    let mut perms = std::fs::metadata(&artifact).unwrap().permissions();
    perms.set_readonly(false);
    std::fs::set_permissions(&artifact, perms).unwrap();
}

#[test]
fn changed_source_is_rederived() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("app.jar");
    let out = dir.path().join("cache");

    write_archive(&jar, &[("com.acme.Old", "class")], &[]);
    let resolver = SearchPathResolver::new(&path_list(&[&jar]), &out, None).unwrap();
    assert!(resolver.resolve_unit("com.acme.Old").is_ok());
    drop(resolver);

    // Rewrite the archive with different contents (size changes, so the
    // stored source key no longer matches).
    write_archive(&jar, &[("com.acme.New", "class"), ("com.acme.Extra", "class")], &[]);

    let resolver = SearchPathResolver::new(&path_list(&[&jar]), &out, None).unwrap();
    assert!(resolver.resolve_unit("com.acme.New").is_ok());
    assert!(matches!(
        resolver.resolve_unit("com.acme.Old").unwrap_err(),
        ResolveError::NotFound(_)
    ));
}

#[test]
fn corrupt_artifact_is_rederived() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("app.jar");
    write_archive(&jar, &[("com.acme.Widget", "class")], &[]);
    let out = dir.path().join("cache");

    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("app.unit"), b"truncated garbage").unwrap();

    let resolver = SearchPathResolver::new(&path_list(&[&jar]), &out, None).unwrap();
    assert!(resolver.entries()[0].unit().is_some());
    assert!(resolver.resolve_unit("com.acme.Widget").is_ok());
}

#[test]
fn colliding_basenames_fail_construction() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    std::fs::create_dir_all(&a).unwrap();
    std::fs::create_dir_all(&b).unwrap();
    let first = a.join("app.jar");
    let second = b.join("app.jar");

    // The collision is rejected before any archive is opened, so the
    // files do not even need to exist.
    let err = SearchPathResolver::new(
        &path_list(&[&first, &second]),
        dir.path().join("cache"),
        None,
    )
    .unwrap_err();

    match err {
        ResolveError::ArtifactConflict {
            first: f,
            second: s,
            artifact,
        } => {
            assert_eq!(f, first);
            assert_eq!(s, second);
            assert_eq!(artifact.extension().unwrap(), ARTIFACT_EXT);
        }
        other => panic!("expected ArtifactConflict, got {other}"),
    }
}

#[test]
fn naming_is_a_pure_function() {
    let out = Path::new("/cache");
    assert_eq!(
        output_name(Path::new("/a/foo.jar"), out),
        output_name(Path::new("/a/foo.jar"), out)
    );
    // Same basename under different directories collides by design;
    // the resolver surfaces it instead of silently overwriting.
    assert_eq!(
        output_name(Path::new("/a/foo.jar"), out),
        output_name(Path::new("/b/foo.jar"), out)
    );
}
