//! Unit tests for the Netscape bookmark exporter.
//!
//! The exported document's preamble and tag shapes are part of the
//! interchange contract, so these tests assert on exact lines.

use rstest::rstest;
use webmarks::database::Database;
use webmarks::managers::bookmark_manager::{BookmarkManager, BookmarkStore};
use webmarks::services::bookmark_exporter::{datetime_to_epoch, BookmarkExporter};
use webmarks::types::bookmark::ROOT_FOLDER_ID;
use webmarks::types::errors::BookmarkError;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn export_to_string(db: &Database) -> String {
    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);
    let mut out = Vec::new();
    exporter
        .export_tree(ROOT_FOLDER_ID, &mut out)
        .expect("export should succeed");
    String::from_utf8(out).expect("export is valid UTF-8")
}

/// The fixed preamble must be reproduced byte-exact.
#[test]
fn test_preamble_is_byte_exact() {
    let db = setup();
    let document = export_to_string(&db);

    let expected = "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
                    <!-- This is an automatically generated file.\n\
                    It will be read and overwritten.\n\
                    Do Not Edit! -->\n\
                    <META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
                    <TITLE>Bookmarks</TITLE>\n\
                    <H1>Bookmarks</H1>\n\
                    <DL><p>\n";
    assert!(document.starts_with(expected), "preamble mismatch:\n{}", document);
    assert!(document.ends_with("</DL><p>\n"));
}

/// Round-trip shape: a "Work" folder containing one bookmark produces the
/// folder heading, a nested list, the anchor line, and matching closures.
#[test]
fn test_folder_with_bookmark_structure() {
    let db = setup();
    {
        let mut mgr = BookmarkManager::new(db.connection());
        let work = mgr.resolve_or_create_folder("Work").unwrap();
        mgr.add_bookmark("https://example.com", "Example", work)
            .unwrap();
    }
    let document = export_to_string(&db);

    assert!(document.contains("\t<DT><H3 FOLDED ADD_DATE=\""));
    assert!(document.contains(">Work</H3>\n"));
    assert!(document.contains("\t<DL><p>\n"));
    assert!(document.contains("\t\t<DT><A HREF=\"https://example.com\" ADD_DATE=\""));
    assert!(document.contains("LAST_VISIT=\""));
    assert!(document.contains("LAST_MODIFIED=\""));
    assert!(document.contains(">Example</A>\n"));
    assert!(document.contains("\t</DL><p>\n"));

    // Balanced nesting: one <DL> per </DL>
    assert_eq!(
        document.matches("<DL><p>").count(),
        document.matches("</DL><p>").count()
    );
}

/// Nesting depth grows one tab per level and stays balanced at any depth.
#[test]
fn test_deeply_nested_folders_stay_balanced() {
    let db = setup();
    {
        let mut mgr = BookmarkManager::new(db.connection());
        let mut parent = ROOT_FOLDER_ID;
        for level in 0..6 {
            parent = mgr.add_folder(&format!("Level {}", level), parent).unwrap();
        }
        mgr.add_bookmark("https://deep.example.com", "Deep", parent)
            .unwrap();
    }
    let document = export_to_string(&db);

    assert_eq!(
        document.matches("<DL><p>").count(),
        document.matches("</DL><p>").count()
    );
    // The innermost bookmark is indented one tab deeper than its folder
    assert!(document.contains("\t\t\t\t\t\t<DT><H3 FOLDED"));
    assert!(document.contains("\t\t\t\t\t\t\t<DT><A HREF=\"https://deep.example.com\""));
}

/// Nesting past the depth guard is reported as a corrupt tree.
#[test]
fn test_nesting_past_max_depth_fails() {
    let db = setup();
    {
        let mut mgr = BookmarkManager::new(db.connection());
        let mut parent = ROOT_FOLDER_ID;
        for level in 0..70 {
            parent = mgr.add_folder(&format!("Level {}", level), parent).unwrap();
        }
    }
    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);
    let mut out = Vec::new();
    let result = exporter.export_tree(ROOT_FOLDER_ID, &mut out);
    assert!(matches!(result, Err(BookmarkError::CorruptTree(_))));
}

/// An unparseable stored date degrades to 0 and never aborts the export.
#[test]
fn test_unparseable_date_degrades_to_zero() {
    let db = setup();
    {
        let mut mgr = BookmarkManager::new(db.connection());
        mgr.add_bookmark("https://example.com", "Example", ROOT_FOLDER_ID)
            .unwrap();
    }
    db.connection()
        .execute(
            "UPDATE bookmarks SET creationdate = 'not a date', updatedate = '' \
             WHERE parent != 0",
            [],
        )
        .unwrap();

    let document = export_to_string(&db);
    assert!(document.contains("ADD_DATE=\"0\""));
    assert!(document.contains("LAST_VISIT=\"0\""));
}

/// A parent-pointer cycle is detected and reported instead of looping.
#[test]
fn test_cycle_in_parent_pointers_fails() {
    let db = setup();
    let (a, b) = {
        let mut mgr = BookmarkManager::new(db.connection());
        let a = mgr.add_folder("A", ROOT_FOLDER_ID).unwrap();
        let b = mgr.add_folder("B", a).unwrap();
        (a, b)
    };
    // Corrupt the tree: A's parent becomes its own descendant B
    db.connection()
        .execute(
            "UPDATE bookmarks SET parent = ?1 WHERE id = ?2",
            rusqlite::params![b, a],
        )
        .unwrap();

    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);
    let mut out = Vec::new();
    let result = exporter.export_tree(a, &mut out);
    assert!(matches!(result, Err(BookmarkError::CorruptTree(_))));
}

/// Export to a path that cannot be opened reports FileNotFound.
#[test]
fn test_export_to_unopenable_path() {
    let db = setup();
    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);

    let result = exporter.export_to_file(ROOT_FOLDER_ID, "/nonexistent-dir/bookmarks.html");
    assert!(matches!(result, Err(BookmarkError::FileNotFound(_))));
}

/// Export to a real file writes the same document as the in-memory sink.
#[test]
fn test_export_to_file_round_trip() {
    let db = setup();
    {
        let mut mgr = BookmarkManager::new(db.connection());
        mgr.add_bookmark_in_folder("https://example.com", "Example", Some("Work"))
            .unwrap();
    }
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("bookmarks.html");

    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);
    exporter.export_to_file(ROOT_FOLDER_ID, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, export_to_string(&db));
}

#[rstest]
#[case("2012-06-15 10:30:00", 1339756200)]
#[case("1970-01-01 00:00:00", 0)]
#[case("1970-01-01 00:00:01", 1)]
#[case("2000-03-01 00:00:00", 951868800)]
#[case("not a date", 0)]
#[case("", 0)]
#[case("2012-02-29 00:00:00", 1330473600)] // leap day
#[case("2011-02-29 00:00:00", 0)]
#[case("2012-02-31 00:00:00", 0)]
#[case("2012-04-31 00:00:00", 0)]
#[case("2012-13-01 00:00:00", 0)]
#[case("2012-06-15 25:00:00", 0)]
#[case("1901-01-01 00:00:00", 0)] // pre-epoch clamps to 0
fn test_datetime_to_epoch(#[case] input: &str, #[case] expected: i64) {
    assert_eq!(datetime_to_epoch(input), expected);
}
