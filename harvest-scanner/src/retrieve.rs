use crate::error::{Result, ScrapeError};
use crate::http::HttpFetcher;
use crate::result::ArchivedBytes;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Downloads a single asset and hands it back as `<filename>.zip`.
#[derive(Clone)]
pub struct AssetRetriever {
    fetcher: HttpFetcher,
}

impl AssetRetriever {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn retrieve(&self, url: &str, filename: &str) -> Result<ArchivedBytes> {
        check_filename(filename)?;

        let content = self.fetcher.get_bytes(url).await?;
        info!("Fetched {} ({} bytes)", url, content.len());

        let entry_name = filename.to_string();
        let archive = tokio::task::spawn_blocking(move || {
            package(&std::env::temp_dir(), &entry_name, &content)
        })
        .await??;

        Ok(archive)
    }
}

/// Filenames become zip entry names and temp file names, so they must be a
/// single plain path component.
fn check_filename(filename: &str) -> Result<()> {
    let invalid = filename.trim().is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename == "."
        || filename == ".."
        || filename.contains('\0');

    if invalid {
        return Err(ScrapeError::InvalidInput(format!(
            "'{}' is not a usable file name",
            filename
        )));
    }
    Ok(())
}

/// Write the asset into a private directory under `temp_root`, zip it there,
/// and read the archive back. The directory is removed before returning on
/// every path.
fn package(temp_root: &Path, filename: &str, content: &[u8]) -> Result<ArchivedBytes> {
    let workdir = tempfile::Builder::new()
        .prefix("harvest-download-")
        .tempdir_in(temp_root)
        .map_err(|e| ScrapeError::Packaging(format!("cannot create temporary directory: {}", e)))?;

    let outcome = package_in(workdir.path(), filename, content);
    release(workdir);
    outcome
}

fn package_in(dir: &Path, filename: &str, content: &[u8]) -> Result<ArchivedBytes> {
    let asset_path = dir.join(filename);
    fs::write(&asset_path, content).map_err(packaging_io("write asset"))?;

    let archive_name = format!("{}.zip", filename);
    let archive_path = dir.join(&archive_name);

    let archive_file = File::create(&archive_path).map_err(packaging_io("create archive"))?;
    let mut writer = ZipWriter::new(archive_file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(filename, options)?;
    let mut asset = File::open(&asset_path).map_err(packaging_io("reopen asset"))?;
    io::copy(&mut asset, &mut writer).map_err(packaging_io("compress asset"))?;
    writer
        .finish()?
        .flush()
        .map_err(packaging_io("flush archive"))?;

    let bytes = fs::read(&archive_path).map_err(packaging_io("read archive"))?;
    debug!("Packaged {} into {} ({} bytes)", filename, archive_name, bytes.len());

    Ok(ArchivedBytes {
        archive_name,
        entry_name: filename.to_string(),
        bytes,
    })
}

fn packaging_io(step: &'static str) -> impl Fn(io::Error) -> ScrapeError {
    move |e| ScrapeError::Packaging(format!("{}: {}", step, e))
}

fn release(workdir: TempDir) {
    let path = workdir.path().to_path_buf();
    if let Err(e) = workdir.close() {
        warn!("Failed to remove temporary directory {}: {}", path.display(), e);
    }
}
