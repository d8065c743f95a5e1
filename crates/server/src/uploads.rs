// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored-file handling for report images.
//!
//! Uploaded parts are written under the configured uploads directory
//! with a timestamp prefix, and reports store the `/uploads/<name>`
//! path references that the static route serves back.

use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Builds a collision-resistant stored filename for an upload.
///
/// The original name is reduced to a safe character set; path
/// separators and anything else unexpected become underscores.
#[must_use]
pub fn stored_filename(original: &str, sequence: usize) -> String {
    let safe: String = original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let millis: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{sequence}-{safe}")
}

/// Writes one uploaded image and returns its public path reference.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn store_image(
    uploads_dir: &Path,
    filename: &str,
    data: &[u8],
) -> Result<String, std::io::Error> {
    let target: PathBuf = uploads_dir.join(filename);
    tokio::fs::write(&target, data).await?;
    Ok(format!("/uploads/{filename}"))
}
