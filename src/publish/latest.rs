use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

pub const LATEST_LINK: &str = "latest";

/// Point `<output_root>/latest` at the `target_key` directory.
///
/// The link target is relative so the output tree can be moved or served
/// from anywhere. An existing link or file is replaced; a real directory is
/// refused.
pub fn update_latest_link(output_root: &Path, target_key: &str) -> Result<PathBuf> {
    let link = output_root.join(LATEST_LINK);

    match fs::symlink_metadata(&link) {
        Ok(meta) if meta.file_type().is_symlink() || meta.is_file() => remove_link(&link)?,
        Ok(_) => {
            return Err(SyncError::publish(format!(
                "{} is a directory, refusing to replace it with a symlink",
                link.display()
            )))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    symlink_dir(Path::new(target_key), &link).map_err(|e| {
        SyncError::publish(format!(
            "Cannot create symlink {} -> {}: {}",
            link.display(),
            target_key,
            e
        ))
    })?;
    Ok(link)
}

fn remove_link(link: &Path) -> io::Result<()> {
    // Directory symlinks on Windows need remove_dir
    fs::remove_file(link).or_else(|_| fs::remove_dir(link))
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
