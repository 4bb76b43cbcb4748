use std::collections::HashSet;

use fsindex::index::listing;
use fsindex::index::resolver;
use fsindex::{ApiError, Entry, ErrorClass, NodeKind};

use crate::integration::support::seeded_index;

fn entry(name: &str, path: &str, kind: NodeKind) -> Entry {
    Entry {
        name: name.to_string(),
        path: path.to_string(),
        kind,
    }
}

#[test]
fn create_and_list_from_root() {
    let (_temp, index) = seeded_index();

    let foo = index.create_directory("/", "foo").unwrap();
    assert_eq!(foo, entry("foo", "/foo", NodeKind::Directory));

    let baz = index.create_file("/foo", "baz", b"x").unwrap();
    assert_eq!(baz, entry("baz", "/foo/baz", NodeKind::File));

    let listed = index.list("/foo", true).unwrap();
    let expected: HashSet<Entry> = [
        entry("baz", "/foo/baz", NodeKind::File),
        entry("..", "/", NodeKind::Directory),
    ]
    .into_iter()
    .collect();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.into_iter().collect::<HashSet<_>>(), expected);
}

#[test]
fn root_listing_has_no_parent_entry() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "a").unwrap();
    index.create_file("/", "b.txt", b"b").unwrap();

    let listed = index.list("/", true).unwrap();
    assert!(listed.iter().all(|e| e.name != ".."));
    assert_eq!(listed.len(), 2);
}

#[test]
fn parent_entry_is_followed_by_path() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "a").unwrap();
    index.create_directory("/a", "b").unwrap();
    index.create_directory("/a/b", "c").unwrap();

    let listed = index.list("/a/b/c", true).unwrap();
    let parent = listed.iter().find(|e| e.is_parent_entry()).unwrap();
    assert_eq!(parent.path, "/a/b");

    let upper = index.list(&parent.path, true).unwrap();
    assert!(upper.contains(&entry("c", "/a/b/c", NodeKind::Directory)));
    assert!(upper.contains(&entry("..", "/a", NodeKind::Directory)));
}

#[test]
fn listing_by_id_through_a_session() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "docs").unwrap();
    index.create_file("/docs", "one.md", b"1").unwrap();

    let session = index.session();
    let docs = resolver::resolve(&session, "/docs/").unwrap();
    let entries = listing::list(&session, docs.id, false).unwrap();
    assert_eq!(entries, vec![entry("one.md", "/docs/one.md", NodeKind::File)]);
}

#[test]
fn resolution_round_trip() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "dir").unwrap();
    index.create_file("/dir", "f", b"").unwrap();

    let session = index.session();
    for node in index.store().all().unwrap() {
        let resolved = resolver::resolve(&session, &node.full_path).unwrap();
        assert_eq!(resolved.id, node.id);
        assert_eq!(resolved.name, node.name);
        assert_eq!(resolved.kind, node.kind);
        assert_eq!(resolved.parent_id, node.parent_id);
    }
}

#[test]
fn collision_suffixes_strictly_increase() {
    let (temp, index) = seeded_index();
    index.create_directory("/", "out").unwrap();

    let names: Vec<String> = (0..4)
        .map(|i| {
            index
                .create_file("/out", "report.txt", format!("{}", i).as_bytes())
                .unwrap()
                .name
        })
        .collect();
    assert_eq!(
        names,
        vec![
            "report.txt",
            "report (1).txt",
            "report (2).txt",
            "report (3).txt"
        ]
    );
    assert_eq!(
        std::fs::read(temp.path().join("out").join("report (2).txt")).unwrap(),
        b"2"
    );
}

#[test]
fn duplicate_directory_leaves_store_unchanged() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "foo").unwrap();
    let before = index.store().all().unwrap().len();

    let err = index.create_directory("/", "foo").unwrap_err();
    assert!(matches!(err, ApiError::PathAlreadyExists(_)));
    assert_eq!(err.class(), ErrorClass::BadRequest);
    assert_eq!(index.store().all().unwrap().len(), before);
}

#[test]
fn type_mismatches_are_rejected() {
    let (_temp, index) = seeded_index();
    index.create_directory("/", "dir").unwrap();
    index.create_file("/", "file.txt", b"content").unwrap();

    let err = index.list("/file.txt", true).unwrap_err();
    assert!(matches!(err, ApiError::NotADirectory(_)));
    assert_eq!(err.class(), ErrorClass::BadRequest);

    let err = index.read_file("/dir").unwrap_err();
    assert!(matches!(err, ApiError::NotAFile(_)));
}

#[test]
fn missing_paths_are_not_found() {
    let (_temp, index) = seeded_index();
    let err = index.list("/nothing", true).unwrap_err();
    assert!(matches!(err, ApiError::PathNotFound(_)));
    assert_eq!(err.class(), ErrorClass::NotFound);

    assert!(matches!(
        index.create_file("/nothing", "a", b""),
        Err(ApiError::PathNotFound(_))
    ));
    assert!(matches!(
        index.create_directory("/nothing", "a"),
        Err(ApiError::PathNotFound(_))
    ));
}

#[test]
fn vanished_file_is_an_integrity_fault() {
    let (temp, index) = seeded_index();
    index.create_file("/", "gone.txt", b"soon gone").unwrap();
    std::fs::remove_file(temp.path().join("gone.txt")).unwrap();

    let err = index.read_file("/gone.txt").unwrap_err();
    assert!(matches!(err, ApiError::IntegrityFault(_)));
    assert_eq!(err.class(), ErrorClass::ServerFault);
}

#[test]
fn audit_reports_out_of_band_changes() {
    let (temp, index) = seeded_index();
    index.create_file("/", "kept.txt", b"k").unwrap();
    assert!(index.audit().unwrap().is_consistent());

    std::fs::write(temp.path().join("sneaked-in.txt"), b"s").unwrap();
    let report = index.audit().unwrap();
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].path, "/sneaked-in.txt");
}
