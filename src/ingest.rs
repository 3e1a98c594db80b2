//! Batch ingestion of image files into the store.
//!
//! Scans a source directory, measures each image's canonical pixel
//! dimensions, and inserts one `Unlabeled` row per new file. Re-running
//! the scan is idempotent: filenames already known to the store are
//! skipped, as are files whose dimensions cannot be measured.

use std::path::Path;

use crate::error::SpotterError;
use crate::store::LabelStore;

/// File extensions the ingester accepts, lowercase.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// Summary of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Candidate image files seen in the directory.
    pub scanned: usize,
    /// New `Unlabeled` rows inserted.
    pub inserted: usize,
    /// Files skipped because the filename was already ingested.
    pub skipped_known: usize,
    /// Files skipped because their dimensions could not be measured.
    pub skipped_unreadable: usize,
}

/// Scan `dir` and insert an `Unlabeled` image row for every new,
/// measurable image file.
///
/// Files are visited in filename order so repeated runs over a stable
/// directory assign ids deterministically. Only the image header is
/// read to obtain dimensions; pixel data is never decoded here.
pub fn scan_directory(
    store: &mut impl LabelStore,
    dir: &Path,
) -> Result<IngestReport, SpotterError> {
    let mut filenames: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| has_image_extension(name))
        .collect();
    filenames.sort();

    let mut report = IngestReport {
        scanned: filenames.len(),
        ..Default::default()
    };

    for filename in &filenames {
        if store.image_by_filename(filename)?.is_some() {
            report.skipped_known += 1;
            continue;
        }

        let path = dir.join(filename);
        let (width, height) = match image::image_dimensions(&path) {
            Ok(dims) => dims,
            Err(err) => {
                log::warn!("skipping {filename}: cannot measure dimensions ({err})");
                report.skipped_unreadable += 1;
                continue;
            }
        };

        if width == 0 || height == 0 {
            log::warn!("skipping {filename}: reported {width}x{height}");
            report.skipped_unreadable += 1;
            continue;
        }

        let image = store.insert_image(filename, width, height)?;
        log::debug!(
            "ingested {} as image {} ({}x{})",
            filename,
            image.id,
            width,
            height
        );
        report.inserted += 1;
    }

    log::info!(
        "ingestion: {} scanned, {} inserted, {} known, {} unreadable",
        report.scanned,
        report.inserted,
        report.skipped_known,
        report.skipped_unreadable
    );
    Ok(report)
}

fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
