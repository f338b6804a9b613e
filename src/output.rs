//! Man page output.
//!
//! The target is either an exact file path or an existing directory that
//! receives [`MAN_PAGE_FILE_NAME`]. Existing files are overwritten.
use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name used when the output target is a directory.
pub const MAN_PAGE_FILE_NAME: &str = "yunohost";

/// Resolve the file to write, creating missing parent directories.
pub fn resolve_output_path(target: &Path) -> Result<PathBuf> {
    if target.is_dir() {
        return Ok(target.join(MAN_PAGE_FILE_NAME));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(target.to_path_buf())
}

/// Write the man page to `target`, gzip-compressed when `gzip` is set.
///
/// Returns the path actually written.
pub fn write_man_page(target: &Path, man_page: &str, gzip: bool) -> Result<PathBuf> {
    let path = resolve_output_path(target)?;
    if gzip {
        write_gzip(&path, man_page.as_bytes())?;
    } else {
        fs::write(&path, man_page).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(path)
}

fn write_gzip(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
    encoder
        .write_all(bytes)
        .with_context(|| format!("compress {}", path.display()))?;
    // finish() writes the gzip trailer.
    let mut writer = encoder
        .finish()
        .with_context(|| format!("finish {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
