//! Package a decoded message into a ZIP archive.
//!
//! The file set is staged in a scratch directory first, then archived and
//! the scratch directory discarded, so a half-written archive never leaves
//! stray files next to the output path.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::model::message::TnefMessage;

use super::attachment::export_message_files;

/// Write `message` as a deflate ZIP archive at `output_path`.
///
/// Returns the archive entry names in the order they were added. A message
/// with no attachments and no bodies produces a valid empty archive.
pub fn export_zip(message: &TnefMessage, output_path: &Path) -> anyhow::Result<Vec<String>> {
    let scratch = TempDir::new()?;
    let staged = export_message_files(message, scratch.path())?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::with_capacity(staged.len());
    let mut buf = Vec::new();
    for path in &staged {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        buf.clear();
        File::open(path)?.read_to_end(&mut buf)?;
        archive.start_file(name.as_str(), options)?;
        archive.write_all(&buf)?;
        entries.push(name);
    }

    archive.finish()?;
    tracing::debug!(
        entries = entries.len(),
        path = %output_path.display(),
        "Wrote ZIP archive"
    );
    Ok(entries)
}
