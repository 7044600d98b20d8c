//! File materialization: copy or render matched template files into place.

use crate::templates::TemplateFile;
use crate::transform::Transform;
use crate::types::{join_relative, AnswerSet, ResolvedFileSet};
use creator_core::{AppError, AppResult};
use glob::{MatchOptions, Pattern};
use handlebars::{handlebars_helper, Handlebars, JsonValue};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// How matched files are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Bytes unchanged
    Copy,
    /// Content rendered as a Handlebars template against the answers
    Template,
}

/// A source file and the destination it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub source: TemplateFile,
    pub destination: PathBuf,
}

/// Writes the files of one file set, returning the destinations written.
pub trait Materializer {
    fn materialize(
        &self,
        mode: RenderMode,
        files: &ResolvedFileSet,
        transform: Transform,
        answers: &AnswerSet,
    ) -> AppResult<Vec<PathBuf>>;
}

/// Match a file set against its source tree and compute destinations.
///
/// Only regular files are considered, ordered by path, so the result is
/// deterministic.
pub fn plan_writes(files: &ResolvedFileSet, transform: Transform) -> AppResult<Vec<PlannedWrite>> {
    let candidates = files.templates.files(&files.source)?;

    let pattern = compile_pattern(&files.pattern)?;
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let writes: Vec<PlannedWrite> = candidates
        .into_iter()
        .filter(|file| pattern.matches_path_with(&file.relative, options))
        .map(|file| PlannedWrite {
            destination: join_relative(&files.target, &transform.apply(&file.relative)),
            source: file,
        })
        .collect();

    tracing::debug!(
        "{} files in {:?} match {:?}",
        writes.len(),
        files.source,
        files.pattern
    );

    Ok(writes)
}

/// Compile a file set glob, ignoring a leading `./`.
fn compile_pattern(pattern: &str) -> AppResult<Pattern> {
    let trimmed = pattern
        .strip_prefix("./")
        .or_else(|| pattern.strip_prefix(".\\"))
        .unwrap_or(pattern);

    Pattern::new(trimmed)
        .map_err(|e| AppError::Config(format!("Invalid file glob {:?}: {}", pattern, e)))
}

// Escapes an answer for use inside a JSON string literal. Missing answers
// render as nothing.
handlebars_helper!(json_escape: |value: Json| {
    let text = match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    };
    let quoted = serde_json::to_string(&text).unwrap_or_default();
    quoted
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or_default()
        .to_string()
});

/// Writes to the real filesystem.
pub struct FsMaterializer {
    handlebars: Handlebars<'static>,
}

impl Default for FsMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

impl FsMaterializer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Templates produce source files, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("json_escape", Box::new(json_escape));

        Self { handlebars }
    }

    fn write(&self, mode: RenderMode, write: &PlannedWrite, answers: &AnswerSet) -> AppResult<()> {
        if let Some(parent) = write.destination.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::file(parent, e))?;
        }

        let source = &write.source.location;

        match mode {
            RenderMode::Copy => write.source.copy_to(&write.destination)?,
            RenderMode::Template => {
                let bytes = write.source.read()?;
                let template = std::str::from_utf8(&bytes).map_err(|e| {
                    AppError::Template(format!("Template {:?} is not UTF-8: {}", source, e))
                })?;

                let rendered = self
                    .handlebars
                    .render_template(template, answers)
                    .map_err(|e| {
                        AppError::Template(format!("Failed to render {:?}: {}", source, e))
                    })?;

                fs::write(&write.destination, rendered)
                    .map_err(|e| AppError::file(&write.destination, e))?;
            }
        }

        tracing::debug!("Wrote {:?} from {:?}", write.destination, source);
        Ok(())
    }
}

impl Materializer for FsMaterializer {
    fn materialize(
        &self,
        mode: RenderMode,
        files: &ResolvedFileSet,
        transform: Transform,
        answers: &AnswerSet,
    ) -> AppResult<Vec<PathBuf>> {
        let writes = plan_writes(files, transform)?;

        let mut written = Vec::with_capacity(writes.len());
        for write in &writes {
            self.write(mode, write, answers)?;
            written.push(write.destination.clone());
        }

        Ok(written)
    }
}

/// Reports destinations without touching the filesystem (`--dry-run`).
#[derive(Debug)]
pub struct DryRunMaterializer<W = io::Stderr> {
    out: RefCell<W>,
}

impl DryRunMaterializer {
    /// Report to stderr.
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for DryRunMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DryRunMaterializer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Materializer for DryRunMaterializer<W> {
    fn materialize(
        &self,
        mode: RenderMode,
        files: &ResolvedFileSet,
        transform: Transform,
        _answers: &AnswerSet,
    ) -> AppResult<Vec<PathBuf>> {
        let verb = match mode {
            RenderMode::Copy => "copy",
            RenderMode::Template => "render",
        };

        let writes = plan_writes(files, transform)?;
        let mut out = self.out.borrow_mut();
        for write in &writes {
            writeln!(
                out,
                "  would {} {} -> {}",
                verb,
                write.source.location.display(),
                write.destination.display()
            )?;
        }

        Ok(writes.into_iter().map(|w| w.destination).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateSource;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn tree(root: &std::path::Path, files: &[(&str, &str)]) {
        for (path, contents) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn file_set(source: &std::path::Path, target: &std::path::Path, pattern: &str) -> ResolvedFileSet {
        ResolvedFileSet {
            templates: TemplateSource::Disk(source.to_path_buf()),
            source: PathBuf::new(),
            target: target.to_path_buf(),
            pattern: pattern.to_string(),
        }
    }

    #[test]
    fn test_recursive_glob_matches_nested_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(
            &source,
            &[("_gitignore", ""), ("bin/index.js", ""), ("bin/template/README.md.hbs", "")],
        );

        let target = temp_dir.path().join("out");
        let writes = plan_writes(&file_set(&source, &target, "./**/*"), Transform::Dotfile).unwrap();
        let destinations: Vec<PathBuf> = writes.into_iter().map(|w| w.destination).collect();

        assert_eq!(
            destinations,
            vec![
                target.join(".gitignore"),
                target.join("bin/index.js"),
                target.join("bin/template/README.md"),
            ]
        );
    }

    #[test]
    fn test_single_star_stays_top_level() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(&source, &[("_package.json.hbs", ""), ("nested/skip.hbs", "")]);

        let target = temp_dir.path().join("out");
        let writes =
            plan_writes(&file_set(&source, &target, "./*"), Transform::StripUnderscore).unwrap();

        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].destination, target.join("package.json"));
    }

    #[test]
    fn test_copy_keeps_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(&source, &[("bin/index.js", "const x = '{{name}}'\n")]);

        let target = temp_dir.path().join("out");
        let mut answers = AnswerSet::new();
        answers.insert("name", "create-widget");

        let written = FsMaterializer::new()
            .materialize(
                RenderMode::Copy,
                &file_set(&source, &target, "**/*"),
                Transform::Dotfile,
                &answers,
            )
            .unwrap();

        assert_eq!(written, vec![target.join("bin/index.js")]);
        assert_eq!(
            fs::read_to_string(target.join("bin/index.js")).unwrap(),
            "const x = '{{name}}'\n"
        );
    }

    #[test]
    fn test_template_renders_answers_without_escaping() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(
            &source,
            &[(
                "_package.json.hbs",
                "{\"name\": \"{{#if organization}}{{organizationName}}/{{/if}}{{name}}\", \"author\": \"{{username}} <{{email}}>\"}",
            )],
        );

        let target = temp_dir.path().join("out");
        let mut answers = AnswerSet::new();
        answers.insert("organization", false);
        answers.insert("name", "create-widget");
        answers.insert("username", "u");
        answers.insert("email", "e@x.com");

        FsMaterializer::new()
            .materialize(
                RenderMode::Template,
                &file_set(&source, &target, "./*"),
                Transform::StripUnderscore,
                &answers,
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(target.join("package.json")).unwrap(),
            "{\"name\": \"create-widget\", \"author\": \"u <e@x.com>\"}"
        );
    }

    #[test]
    fn test_missing_source_is_file_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = plan_writes(
            &file_set(&temp_dir.path().join("nope"), temp_dir.path(), "*"),
            Transform::Dotfile,
        );
        assert!(matches!(result, Err(AppError::FileSystem { .. })));
    }

    #[test]
    fn test_broken_template_is_template_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(&source, &[("README.md.hbs", "{{#if name}}unclosed")]);

        let result = FsMaterializer::new().materialize(
            RenderMode::Template,
            &file_set(&source, &temp_dir.path().join("out"), "*"),
            Transform::StripUnderscore,
            &AnswerSet::new(),
        );
        assert!(matches!(result, Err(AppError::Template(_))));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(&source, &[("_gitignore", "node_modules\n")]);

        let target = temp_dir.path().join("out");
        let dry_run = DryRunMaterializer::with_writer(Vec::new());
        let planned = dry_run
            .materialize(
                RenderMode::Copy,
                &file_set(&source, &target, "**/*"),
                Transform::Dotfile,
                &AnswerSet::new(),
            )
            .unwrap();

        assert_eq!(planned, vec![target.join(".gitignore")]);
        assert!(!target.exists());

        let shown = String::from_utf8(dry_run.into_writer()).unwrap();
        assert!(shown.starts_with("  would copy "));
        assert!(shown.trim_end().ends_with(".gitignore"));
    }

    #[test]
    fn test_destinations_have_no_current_dir_components() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(&source, &[("_gitignore", ""), ("bin/index.js", ""), ("_.hbs", "")]);

        let target = temp_dir.path().join("out");
        let writes = plan_writes(&file_set(&source, &target, "./**/*"), Transform::StripUnderscore)
            .unwrap();

        assert_eq!(writes.len(), 3);
        for write in &writes {
            assert!(
                !write
                    .destination
                    .components()
                    .any(|c| matches!(c, std::path::Component::CurDir)),
                "{:?}",
                write.destination
            );
        }
    }

    #[test]
    fn test_json_escape_keeps_package_json_valid() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        tree(
            &source,
            &[(
                "_package.json.hbs",
                "{\"description\": \"{{json_escape description}}\", \"author\": \"{{json_escape username}} <{{json_escape email}}>\"}",
            )],
        );

        let target = temp_dir.path().join("out");
        let mut answers = AnswerSet::new();
        answers.insert("description", "A \"quoted\" tool");
        answers.insert("username", "back\\slash");

        FsMaterializer::new()
            .materialize(
                RenderMode::Template,
                &file_set(&source, &target, "./*"),
                Transform::StripUnderscore,
                &answers,
            )
            .unwrap();

        let package: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(target.join("package.json")).unwrap())
                .unwrap();
        assert_eq!(package["description"], "A \"quoted\" tool");
        assert_eq!(package["author"], "back\\slash <>");
    }
}
