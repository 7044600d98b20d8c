//! Template trees: compiled into the binary, or read from a directory.
//!
//! The built-in plan's `copy/blank`, `copy/example` and `template` trees are
//! embedded at build time, so an installed binary never looks for the source
//! checkout. `--templates` swaps in a directory on disk with the same layout.

use creator_core::{AppError, AppResult};
use include_dir::{include_dir, Dir, DirEntry};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

static BUNDLED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Location prefix used in logs and errors for embedded files.
const BUNDLED_PREFIX: &str = "<bundled>";

/// Where file set sources are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// Trees compiled into the binary
    #[default]
    Bundled,
    /// Trees under a directory on disk
    Disk(PathBuf),
}

/// A regular file found under a template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the directory that was listed
    pub relative: PathBuf,

    /// Where the file lives, for logs and errors
    pub location: PathBuf,

    contents: Contents,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Contents {
    Bundled(&'static [u8]),
    Disk,
}

impl TemplateSource {
    /// List the regular files under `dir`, ordered by relative path.
    ///
    /// A directory that does not exist in the source is a FileSystem error.
    pub fn files(&self, dir: &Path) -> AppResult<Vec<TemplateFile>> {
        match self {
            TemplateSource::Bundled => bundled_files(dir),
            TemplateSource::Disk(root) => disk_files(&root.join(dir)),
        }
    }
}

impl TemplateFile {
    /// Raw file contents.
    pub fn read(&self) -> AppResult<Cow<'static, [u8]>> {
        match self.contents {
            Contents::Bundled(bytes) => Ok(Cow::Borrowed(bytes)),
            Contents::Disk => fs::read(&self.location)
                .map(Cow::Owned)
                .map_err(|e| AppError::file(&self.location, e)),
        }
    }

    /// Copy the file to `destination` byte for byte.
    pub fn copy_to(&self, destination: &Path) -> AppResult<()> {
        match self.contents {
            Contents::Bundled(bytes) => fs::write(destination, bytes),
            // fs::copy keeps permission bits, e.g. an executable bin script
            Contents::Disk => fs::copy(&self.location, destination).map(|_| ()),
        }
        .map_err(|e| AppError::file(destination, e))
    }
}

fn not_found(location: PathBuf) -> AppError {
    AppError::file(
        location,
        io::Error::new(io::ErrorKind::NotFound, "template source directory not found"),
    )
}

fn bundled_files(dir: &Path) -> AppResult<Vec<TemplateFile>> {
    let relative: PathBuf = dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();

    let root = if relative.as_os_str().is_empty() {
        Some(&BUNDLED)
    } else {
        BUNDLED.get_dir(&relative)
    };
    let root = root.ok_or_else(|| not_found(Path::new(BUNDLED_PREFIX).join(&relative)))?;

    let mut found = Vec::new();
    collect_bundled(root, &mut found);

    let mut files: Vec<TemplateFile> = found
        .into_iter()
        .filter_map(|file| {
            let relative = file.path().strip_prefix(root.path()).ok()?;
            Some(TemplateFile {
                relative: relative.to_path_buf(),
                location: Path::new(BUNDLED_PREFIX).join(file.path()),
                contents: Contents::Bundled(file.contents()),
            })
        })
        .collect();
    files.sort_by(|a, b| a.relative.cmp(&b.relative));

    Ok(files)
}

fn collect_bundled(dir: &'static Dir<'static>, found: &mut Vec<&'static include_dir::File<'static>>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_bundled(sub, found),
            DirEntry::File(file) => found.push(file),
        }
    }
}

fn disk_files(dir: &Path) -> AppResult<Vec<TemplateFile>> {
    if !dir.is_dir() {
        return Err(not_found(dir.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            AppError::file(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };

        files.push(TemplateFile {
            relative: relative.to_path_buf(),
            location: entry.path().to_path_buf(),
            contents: Contents::Disk,
        });
    }

    Ok(files)
}
