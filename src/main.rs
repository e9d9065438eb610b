//! webmarks — embedded bookmark and browsing-history data-access layer.
//!
//! Entry point: runs a console demo that walks the public surface against
//! an in-memory database, then prints the exported bookmark document.

use webmarks::database::Database;
use webmarks::managers::bookmark_manager::{BookmarkManager, BookmarkStore};
use webmarks::managers::history_manager::{HistoryManager, HistoryStore};
use webmarks::services::bookmark_exporter::BookmarkExporter;
use webmarks::types::bookmark::ROOT_FOLDER_ID;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!();
    println!("webmarks v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    let db = match Database::open_in_memory() {
        Ok(db) => db,
        Err(err) => {
            eprintln!("failed to open database: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = demo_bookmarks(&db) {
        eprintln!("bookmark demo failed: {}", err);
        std::process::exit(1);
    }
    if let Err(err) = demo_history(&db) {
        eprintln!("history demo failed: {}", err);
        std::process::exit(1);
    }
    if let Err(err) = demo_export(&db) {
        eprintln!("export demo failed: {}", err);
        std::process::exit(1);
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────");
}

fn demo_bookmarks(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    section("Bookmark tree");
    let mut mgr = BookmarkManager::new(db.connection());

    mgr.add_bookmark_in_folder("https://www.rust-lang.org/", "Rust", None)?;
    mgr.add_bookmark_in_folder("https://docs.rs/", "Docs", Some("Work"))?;
    mgr.add_bookmark_in_folder("https://crates.io/", "Crates", Some("Work"))?;

    println!(
        "{} folders, {} items total",
        mgr.count_folders()?,
        mgr.count_all()?
    );

    let work = mgr.resolve_or_create_folder("Work")?;
    let listing = mgr.list_at(work)?;
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn demo_history(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    section("Browsing history");
    let mut mgr = HistoryManager::new(db.connection());

    mgr.record_visit("https://www.rust-lang.org/", "Rust")?;
    mgr.record_visit("https://www.rust-lang.org/", "Rust")?;
    mgr.record_visit("https://docs.rs/", "Docs")?;

    println!("{} history entries:", mgr.count()?);
    mgr.for_each(&mut |entry| {
        println!("  {} ({} visits) {}", entry.visit_date, entry.visit_count, entry.address);
        true
    })?;
    Ok(())
}

fn demo_export(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    section("Netscape export");
    let mgr = BookmarkManager::new(db.connection());
    let exporter = BookmarkExporter::new(&mgr);

    let mut document = Vec::new();
    exporter.export_tree(ROOT_FOLDER_ID, &mut document)?;
    print!("{}", String::from_utf8_lossy(&document));
    Ok(())
}
