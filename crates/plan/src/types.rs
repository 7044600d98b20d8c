//! Plan types for create-creator.
//!
//! A plan is plain data: an ordered list of questions and an ordered list of
//! actions. Everything that varies per run (defaults, visibility, validation,
//! source selection) is a named strategy evaluated against explicit inputs
//! rather than a closure over ambient state.

use crate::context::RunContext;
use crate::templates::TemplateSource;
use crate::transform::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A single answer: confirm questions yield booleans, input questions text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Text(String),
}

impl Answer {
    /// `true` for `Bool(true)` and for non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Answer::Bool(value) => *value,
            Answer::Text(value) => !value.is_empty(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(value) => write!(f, "{}", value),
            Answer::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::Bool(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

/// Answers collected so far, keyed by question name.
///
/// Serializes as a flat map, which is also the data templates render against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, Answer>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Later answers for the same name replace earlier ones.
    pub fn insert(&mut self, name: impl Into<String>, answer: impl Into<Answer>) {
        self.0.insert(name.into(), answer.into());
    }

    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether `name` was answered with a truthy value. Absent answers are falsy.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(Answer::is_truthy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The root object of a scaffold run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Questions, asked in order
    #[serde(default)]
    pub queries: Vec<QuestionSpec>,

    /// Actions, executed in order once every question is resolved
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// One prompt, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionSpec {
    Confirm(ConfirmQuestion),
    Input(InputQuestion),
}

/// A yes/no question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmQuestion {
    pub name: String,
    pub message: String,

    #[serde(default)]
    pub default: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

/// A free-text question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputQuestion {
    pub name: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<Validator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

impl QuestionSpec {
    pub fn name(&self) -> &str {
        match self {
            QuestionSpec::Confirm(q) => &q.name,
            QuestionSpec::Input(q) => &q.name,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            QuestionSpec::Confirm(q) => &q.message,
            QuestionSpec::Input(q) => &q.message,
        }
    }

    pub fn when(&self) -> Option<&Condition> {
        match self {
            QuestionSpec::Confirm(q) => q.when.as_ref(),
            QuestionSpec::Input(q) => q.when.as_ref(),
        }
    }

    pub fn validator(&self) -> Option<&Validator> {
        match self {
            QuestionSpec::Confirm(_) => None,
            QuestionSpec::Input(q) => q.validate.as_ref(),
        }
    }

    /// Whether the question should be asked given the answers so far.
    pub fn is_visible(&self, answers: &AnswerSet) -> bool {
        self.when().map_or(true, |condition| condition.holds(answers))
    }

    /// Resolve the default offered for this question.
    ///
    /// Confirm questions always have one; input questions only when declared.
    pub fn resolve_default(&self, context: &RunContext) -> Option<Answer> {
        match self {
            QuestionSpec::Confirm(q) => Some(Answer::Bool(q.default)),
            QuestionSpec::Input(q) => q
                .default
                .as_ref()
                .map(|default| Answer::Text(default.resolve(context))),
        }
    }
}

/// Default for an input question: a literal, or a value from the run context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Context { from: ContextValue },
    Literal(Answer),
}

impl DefaultValue {
    pub fn resolve(&self, context: &RunContext) -> String {
        match self {
            DefaultValue::Context { from } => context.value(*from),
            DefaultValue::Literal(answer) => answer.to_string(),
        }
    }
}

/// Process-wide values a default may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextValue {
    /// Final component of the working directory
    CwdName,
    /// `user.name` from the git config
    GitUserName,
    /// `user.email` from the git config
    GitUserEmail,
}

/// Input validation strategy, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Validator {
    /// Input must begin with `prefix`; otherwise `message` is shown.
    StartsWith { prefix: String, message: String },
}

impl Validator {
    /// Check `input`, returning the user-facing message on rejection.
    pub fn check(&self, input: &str) -> Result<(), String> {
        match self {
            Validator::StartsWith { prefix, message } => {
                if input.starts_with(prefix.as_str()) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
        }
    }
}

/// Visibility condition for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Ask only when the named answer is truthy
    Truthy { truthy: String },
    /// Ask only when the named answer is absent or falsy
    Falsy { falsy: String },
}

impl Condition {
    pub fn holds(&self, answers: &AnswerSet) -> bool {
        match self {
            Condition::Truthy { truthy } => answers.is_truthy(truthy),
            Condition::Falsy { falsy } => !answers.is_truthy(falsy),
        }
    }

    /// The answer this condition reads.
    pub fn subject(&self) -> &str {
        match self {
            Condition::Truthy { truthy } => truthy,
            Condition::Falsy { falsy } => falsy,
        }
    }
}

/// One post-prompt step, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionSpec {
    /// Copy matched files byte for byte
    Copy(FileAction),
    /// Render matched files as Handlebars templates
    Template(FileAction),
    /// Run external commands in the working directory
    Command(CommandAction),
}

impl ActionSpec {
    pub fn name(&self) -> &str {
        match self {
            ActionSpec::Copy(a) | ActionSpec::Template(a) => &a.name,
            ActionSpec::Command(a) => &a.name,
        }
    }

    /// The path transform applied by file actions.
    pub fn transform(&self) -> Option<Transform> {
        match self {
            ActionSpec::Copy(_) => Some(Transform::Dotfile),
            ActionSpec::Template(_) => Some(Transform::StripUnderscore),
            ActionSpec::Command(_) => None,
        }
    }
}

/// Body of a `copy` or `template` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAction {
    pub name: String,
    pub files: Vec<FileSet>,
}

/// Body of a `command` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandAction {
    pub name: String,
    pub commands: Vec<CommandSpec>,
}

/// A glob of files under a source directory, materialized into a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSet {
    /// Source directory, relative to the templates root
    pub source: SourceDir,

    /// Target directory, relative to the working directory
    #[serde(default = "default_target")]
    pub target: PathBuf,

    /// Glob matched against paths relative to `source`
    pub files: String,
}

fn default_target() -> PathBuf {
    PathBuf::from(".")
}

impl FileSet {
    /// Resolve against the run context and answers.
    pub fn resolve(&self, context: &RunContext, answers: &AnswerSet) -> ResolvedFileSet {
        ResolvedFileSet {
            templates: context.templates.clone(),
            source: self.source.pick(answers).to_path_buf(),
            target: join_relative(&context.cwd, &self.target),
            pattern: self.files.clone(),
        }
    }
}

/// Join `relative` onto `base`, dropping `.` components.
pub fn join_relative(base: &Path, relative: &Path) -> PathBuf {
    let mut joined = base.to_path_buf();
    joined.extend(
        relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir)),
    );
    joined
}

/// Source directory choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceDir {
    /// `then` when the `switch` answer is truthy, `else` otherwise
    Switch {
        switch: String,
        then: PathBuf,
        #[serde(rename = "else")]
        otherwise: PathBuf,
    },
    Fixed(PathBuf),
}

impl SourceDir {
    pub fn pick(&self, answers: &AnswerSet) -> &Path {
        match self {
            SourceDir::Switch {
                switch,
                then,
                otherwise,
            } => {
                if answers.is_truthy(switch) {
                    then
                } else {
                    otherwise
                }
            }
            SourceDir::Fixed(path) => path,
        }
    }
}

/// A file set with every choice made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFileSet {
    /// Trees the source directory is read from
    pub templates: TemplateSource,
    /// Source directory within `templates`
    pub source: PathBuf,
    /// Absolute destination directory
    pub target: PathBuf,
    pub pattern: String,
}

/// An external program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub cmd: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(cmd: impl Into<String>, args: &[&str]) -> Self {
        Self {
            cmd: cmd.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cmd)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
