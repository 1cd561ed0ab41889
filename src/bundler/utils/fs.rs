//! File system utilities for staging trees.
//!
//! Provides idempotent directory resets, recursive copies that preserve
//! symlinks, and Unix permission helpers with path-carrying errors.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists. Returns whether something was removed.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// `to` may be a directory, in which case the file keeps its name.
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<PathBuf> {
    if !from.is_file() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a file",
            from.display()
        )));
    }

    let to = if to.is_dir() {
        let name = from
            .file_name()
            .ok_or_else(|| Error::GenericError(format!("{} has no file name", from.display())))?;
        to.join(name)
    } else {
        to.to_path_buf()
    };

    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, &to).await.fs_context("copying to", &to)?;
    Ok(to)
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them.
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                let linked = if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)
                } else {
                    symlink_file(&target, &dest_path)
                };
                linked.fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying to", &dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Moves a file, falling back to copy + remove across filesystems.
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!("{} is on another device, copying", to.display());
            copy_file(from, to).await?;
            fs::remove_file(from).await.fs_context("removing", from)
        }
        Err(e) => Err(e).fs_context("moving to", to),
    }
}

/// Sets the permission bits of a single path.
#[cfg(unix)]
pub async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("changing mode of", path)
}

/// Permission bits do not exist on this platform; only checks the path.
#[cfg(not(unix))]
pub async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    log::debug!("ignoring mode {:o} for {} on this platform", mode, path.display());
    fs::metadata(path)
        .await
        .map(|_| ())
        .fs_context("changing mode of", path)
}

/// Sets every directory under (and including) `root` to `mode`.
///
/// Directories are changed before they are read, so a tree that starts out
/// unreadable is still normalized. Any directory that cannot be read fails
/// the whole call.
pub async fn set_dir_modes(root: &Path, mode: u32) -> Result<()> {
    let root = root.to_path_buf();

    tokio::task::spawn_blocking(move || set_dir_modes_blocking(&root, mode))
        .await
        .map_err(|e| Error::GenericError(format!("Directory mode task panicked: {}", e)))?
}

fn set_dir_modes_blocking(dir: &Path, mode: u32) -> Result<()> {
    set_mode_blocking(dir, mode)?;

    for entry in std::fs::read_dir(dir).fs_context("reading directory", dir)? {
        let entry = entry.fs_context("reading directory", dir)?;
        let file_type = entry.file_type().fs_context("reading file type", entry.path())?;
        if file_type.is_dir() {
            set_dir_modes_blocking(&entry.path(), mode)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn set_mode_blocking(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .fs_context("changing mode of", path)
}

#[cfg(not(unix))]
fn set_mode_blocking(path: &Path, _mode: u32) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .fs_context("changing mode of", path)
}
