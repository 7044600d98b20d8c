//! Destination path transforms.
//!
//! Template trees name dotfiles with a leading `_` so they stay visible, and
//! mark files that need variable substitution with a `.hbs` suffix. The
//! transforms undo both conventions on the file name only; the directory
//! portion is never touched.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// `_gitignore.hbs` -> `.gitignore` (copy actions)
    Dotfile,
    /// `_package.json.hbs` -> `package.json` (template actions)
    StripUnderscore,
}

impl Transform {
    /// Map a template-relative path to its destination-relative path.
    ///
    /// Total over any input, including names that are not valid UTF-8. A file
    /// name that rewrites to nothing (or `.`) collapses to its directory.
    pub fn apply(&self, path: &Path) -> PathBuf {
        let Some(file_name) = path.file_name() else {
            return path.to_path_buf();
        };
        let bytes = file_name.as_encoded_bytes();

        let renamed = match (bytes.strip_prefix(b"_"), self) {
            (Some(rest), Transform::Dotfile) => [b".".as_slice(), rest].concat(),
            (Some(rest), Transform::StripUnderscore) => rest.to_vec(),
            (None, _) => bytes.to_vec(),
        };
        let renamed = renamed.strip_suffix(b".hbs").unwrap_or(&renamed);

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if renamed.is_empty() || renamed == b"." {
            return parent.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        }

        // SAFETY: `renamed` is the encoded name with ASCII `_` or `.hbs` cut
        // off the ends, optionally behind an ASCII `.`, so every boundary is
        // next to valid UTF-8.
        let renamed = unsafe { OsStr::from_encoded_bytes_unchecked(renamed) };

        match parent {
            Some(parent) => parent.join(renamed),
            None => PathBuf::from(renamed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dotfile(path: &str) -> PathBuf {
        Transform::Dotfile.apply(Path::new(path))
    }

    fn strip(path: &str) -> PathBuf {
        Transform::StripUnderscore.apply(Path::new(path))
    }

    #[test]
    fn test_dotfile_transform() {
        assert_eq!(dotfile("_gitignore.hbs"), PathBuf::from(".gitignore"));
        assert_eq!(dotfile("_npmignore"), PathBuf::from(".npmignore"));
        assert_eq!(dotfile("bin/index.js"), PathBuf::from("bin/index.js"));
        assert_eq!(
            dotfile("bin/template/README.md.hbs"),
            PathBuf::from("bin/template/README.md")
        );
    }

    #[test]
    fn test_strip_underscore_transform() {
        assert_eq!(strip("_package.json.hbs"), PathBuf::from("package.json"));
        assert_eq!(strip("README.md.hbs"), PathBuf::from("README.md"));
        assert_eq!(strip("docs/_guide.md"), PathBuf::from("docs/guide.md"));
    }

    #[test]
    fn test_directory_portion_unchanged() {
        assert_eq!(dotfile("_hidden/_rc.hbs"), PathBuf::from("_hidden/.rc"));
        assert_eq!(strip("_hidden/_rc.hbs"), PathBuf::from("_hidden/rc"));
    }

    #[test]
    fn test_only_leading_underscore_and_trailing_suffix() {
        assert_eq!(strip("a_b.hbs.txt"), PathBuf::from("a_b.hbs.txt"));
        assert_eq!(dotfile("__init__.py"), PathBuf::from("._init__.py"));
    }

    #[test]
    fn test_underscore_hbs_files_become_plain() {
        for path in ["_gitignore.hbs", "nested/dir/_eslintrc.json.hbs", "_x.hbs"] {
            let copied = dotfile(path);
            let name = copied.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with('.'), "{} -> {}", path, name);
            assert!(!name.ends_with(".hbs"), "{} -> {}", path, name);

            let rendered = strip(path);
            let name = rendered.file_name().unwrap().to_string_lossy().into_owned();
            assert!(!name.starts_with('_'), "{} -> {}", path, name);
            assert!(!name.ends_with(".hbs"), "{} -> {}", path, name);
        }
    }

    #[test]
    fn test_idempotent_on_transformed_paths() {
        for path in [".gitignore", "package.json", "bin/index.js", "a/b/c.txt"] {
            assert_eq!(dotfile(path), PathBuf::from(path));
            assert_eq!(strip(path), PathBuf::from(path));
            assert_eq!(dotfile(dotfile(path).to_str().unwrap()), dotfile(path));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"_caf\xe9.hbs");
        let copied = Transform::Dotfile.apply(&Path::new("bin").join(name));
        assert_eq!(copied, Path::new("bin").join(OsStr::from_bytes(b".caf\xe9")));

        let rendered = Transform::StripUnderscore.apply(Path::new(name));
        assert_eq!(rendered.as_os_str().as_bytes(), b"caf\xe9");

        let untouched = OsStr::from_bytes(b"\xff\xfe.txt");
        assert_eq!(
            Transform::Dotfile.apply(Path::new(untouched)).as_os_str(),
            untouched
        );
    }

    #[test]
    fn test_degenerate_names_collapse_to_directory() {
        assert_eq!(strip("_"), PathBuf::from("."));
        assert_eq!(strip("dir/_.hbs"), PathBuf::from("dir"));
        assert_eq!(dotfile("dir/_"), PathBuf::from("dir"));
        assert_eq!(strip(".hbs"), PathBuf::from("."));
    }
}
