//! Batch ingestion tool.
//!
//! Scans a directory of image files and records one `Unlabeled` image
//! row per new file in a JSON store snapshot. Safe to re-run: already
//! known filenames are skipped.
//!
//! Usage: `spotter-seed <images-dir> <store.json>`

use std::path::Path;
use std::process::ExitCode;

use spotter::ingest;
use spotter::store::MemoryStore;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let [_, images_dir, snapshot] = args.as_slice() else {
        eprintln!("usage: spotter-seed <images-dir> <store.json>");
        return ExitCode::FAILURE;
    };

    let images_dir = Path::new(images_dir);
    let snapshot = Path::new(snapshot);

    if !images_dir.is_dir() {
        eprintln!("images directory not found: {}", images_dir.display());
        return ExitCode::FAILURE;
    }

    let mut store = if snapshot.exists() {
        match MemoryStore::load(snapshot) {
            Ok(store) => {
                log::info!(
                    "loaded snapshot {} ({} images, {} labels)",
                    snapshot.display(),
                    store.image_count(),
                    store.label_count()
                );
                store
            }
            Err(err) => {
                eprintln!("cannot load snapshot {}: {err}", snapshot.display());
                return ExitCode::FAILURE;
            }
        }
    } else {
        MemoryStore::new()
    };

    let report = match ingest::scan_directory(&mut store, images_dir) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("ingestion failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = store.save(snapshot) {
        eprintln!("cannot write snapshot {}: {err}", snapshot.display());
        return ExitCode::FAILURE;
    }

    println!(
        "scanned {}, inserted {}, already known {}, unreadable {}",
        report.scanned, report.inserted, report.skipped_known, report.skipped_unreadable
    );
    ExitCode::SUCCESS
}
