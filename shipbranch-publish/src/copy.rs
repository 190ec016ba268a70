//! Artifact sync into the clone, and optional source cleanup.
//!
//! ## `copy_contents`
//!
//! Copies the *contents* of the output directory into the clone root,
//! overwriting existing files. Two entries are never copied:
//!
//! 1. `.git`: the source repository's metadata must not replace the clone's.
//! 2. The clone itself, when it lives inside the output directory (the
//!    output directory defaults to the working directory).
//!
//! Symbolic links are recreated as links and never followed, so dangling or
//! cyclic links in the output tree are copied verbatim.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{io_err, PublishError};

/// Ignore file removed from the clone by [`clean_sources`].
pub const IGNORE_FILE: &str = ".gitignore";

const GIT_DIR: &str = ".git";

/// Recursively copy the contents of `src` into `dest`.
///
/// Returns the number of files and links written.
pub fn copy_contents(src: &Path, dest: &Path) -> Result<usize, PublishError> {
    let src = src.canonicalize().map_err(|e| io_err(src, e))?;
    fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;
    let dest = dest.canonicalize().map_err(|e| io_err(dest, e))?;

    let mut copied = 0;
    copy_dir(&src, &dest, &dest, &mut copied)?;
    tracing::debug!(
        files = copied,
        from = %src.display(),
        to = %dest.display(),
        "copied build output"
    );
    Ok(copied)
}

fn copy_dir(
    src: &Path,
    dest: &Path,
    clone_root: &Path,
    copied: &mut usize,
) -> Result<(), PublishError> {
    let mut entries: Vec<_> = fs::read_dir(src)
        .map_err(|e| io_err(src, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(src, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_name() == GIT_DIR || path == clone_root {
            continue;
        }

        let target = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_symlink() {
            copy_link(&path, &target)?;
            *copied += 1;
        } else if file_type.is_dir() {
            if fs::symlink_metadata(&target).is_ok_and(|m| !m.is_dir()) {
                remove_existing(&target)?;
            }
            fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
            copy_dir(&path, &target, clone_root, copied)?;
        } else {
            if fs::symlink_metadata(&target).is_ok_and(|m| !m.is_file()) {
                remove_existing(&target)?;
            }
            fs::copy(&path, &target).map_err(|e| io_err(&target, e))?;
            *copied += 1;
        }
    }
    Ok(())
}

/// Recreate the link at `link` as a link at `target`, without following it.
#[cfg(unix)]
fn copy_link(link: &Path, target: &Path) -> Result<(), PublishError> {
    let points_to = fs::read_link(link).map_err(|e| io_err(link, e))?;
    remove_existing(target)?;
    std::os::unix::fs::symlink(&points_to, target).map_err(|e| io_err(target, e))
}

#[cfg(windows)]
fn copy_link(link: &Path, target: &Path) -> Result<(), PublishError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    let points_to = fs::read_link(link).map_err(|e| io_err(link, e))?;
    remove_existing(target)?;
    let is_dir = fs::metadata(link).is_ok_and(|m| m.is_dir());
    let created = if is_dir {
        symlink_dir(&points_to, target)
    } else {
        symlink_file(&points_to, target)
    };
    created.map_err(|e| io_err(target, e))
}

/// Clear whatever sits at `path` so a different kind of entry can replace it.
fn remove_existing(path: &Path) -> Result<(), PublishError> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Ok(());
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| io_err(path, e))
}

/// Remove the clone's ignore file and the source tree under the working directory.
///
/// A source root that contains the working directory or the clone is left in
/// place. Returns the paths actually removed.
pub fn clean_sources(
    working_dir: &Path,
    clone_dir: &Path,
    source_root: &Path,
) -> Result<Vec<PathBuf>, PublishError> {
    let mut removed = Vec::new();

    let ignore = clone_dir.join(IGNORE_FILE);
    if ignore.is_file() {
        fs::remove_file(&ignore).map_err(|e| io_err(&ignore, e))?;
        removed.push(ignore);
    }

    if !source_root.exists() {
        return Ok(removed);
    }
    let root = source_root
        .canonicalize()
        .map_err(|e| io_err(source_root, e))?;
    let working = working_dir
        .canonicalize()
        .map_err(|e| io_err(working_dir, e))?;
    let clone = clone_dir.canonicalize().map_err(|e| io_err(clone_dir, e))?;

    if working.starts_with(&root) || clone.starts_with(&root) {
        tracing::warn!(
            path = %source_root.display(),
            "source root contains the working directory or the clone; not removing it"
        );
        return Ok(removed);
    }

    fs::remove_dir_all(&root).map_err(|e| io_err(&root, e))?;
    removed.push(source_root.to_path_buf());
    Ok(removed)
}
