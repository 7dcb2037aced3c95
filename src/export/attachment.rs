//! Write a decoded message out as plain files.

use std::path::{Path, PathBuf};

use crate::model::attachment::TnefAttachment;
use crate::model::message::TnefMessage;

/// Export a single attachment to disk.
pub fn export_attachment(
    attachment: &TnefAttachment,
    index: usize,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let path = output_dir.join(attachment_filename(attachment, index));

    // Avoid overwriting — append a counter if needed
    let path = unique_path(&path);
    std::fs::write(&path, &attachment.data)?;
    Ok(path)
}

/// Write every attachment, plus `body.txt` / `body.html` when the bodies
/// are non-empty, into `output_dir`.
///
/// A failure to write one attachment logs a warning and moves on; the body
/// files are not optional in the same way and propagate their errors.
/// Returns the paths written.
pub fn export_message_files(
    message: &TnefMessage,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut paths = Vec::new();

    for (index, attachment) in message.attachments.iter().enumerate() {
        match export_attachment(attachment, index, output_dir) {
            Ok(path) => paths.push(path),
            Err(e) => {
                tracing::warn!(
                    title = %attachment.title,
                    error = %e,
                    "Failed to write attachment"
                );
            }
        }
    }

    if !message.body.is_empty() {
        let path = output_dir.join("body.txt");
        std::fs::write(&path, &message.body)?;
        paths.push(path);
    }

    if !message.body_html.is_empty() {
        let path = output_dir.join("body.html");
        std::fs::write(&path, &message.body_html)?;
        paths.push(path);
    }

    Ok(paths)
}

/// Filename for an attachment: its sanitized title, or a synthesized
/// `attachment_<index>.bin` when the stream never named it.
pub fn attachment_filename(attachment: &TnefAttachment, index: usize) -> String {
    if attachment.title.is_empty() {
        format!("attachment_{index}.bin")
    } else {
        sanitize_filename_part(&attachment.title, 150)
    }
}

/// Sanitize a string for use in filenames.
///
/// Replaces invalid characters with `_` and truncates to `max_len`.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .take(max_len)
        .collect();

    if sanitized.is_empty() {
        "unknown".to_string()
    } else {
        sanitized
    }
}

/// If `path` already exists, append a counter to make it unique.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new("."));

    for i in 1..1000 {
        let candidate = if ext.is_empty() {
            parent.join(format!("{stem}_{i}"))
        } else {
            parent.join(format!("{stem}_{i}.{ext}"))
        };
        if !candidate.exists() {
            return candidate;
        }
    }

    // Fallback — very unlikely
    parent.join(format!("{stem}_dup.{ext}"))
}
