//! Plan-driven scaffolding for create-creator.
//!
//! This crate provides:
//! - Declarative plan types (questions and actions) loaded from YAML
//! - The bundled create-creator plan and its template trees, embedded at build time
//! - Path transforms for `_`-prefixed and `.hbs` template files
//! - Prompt, file and command collaborators behind traits
//! - The orchestrator that runs a plan end to end

pub mod command;
pub mod context;
pub mod loader;
pub mod materializer;
pub mod orchestrator;
pub mod prompter;
pub mod templates;
pub mod transform;
pub mod types;


// Re-export main types
pub use command::{CommandRunner, CommandStatus, DryRunCommandRunner, SystemCommandRunner};
pub use context::RunContext;
pub use loader::{builtin_plan, load_plan, parse_plan, validate_plan};
pub use materializer::{DryRunMaterializer, FsMaterializer, Materializer, RenderMode};
pub use orchestrator::{Orchestrator, RunReport};
pub use prompter::{DefaultsPrompter, Prompter, TerminalPrompter};
pub use templates::{TemplateFile, TemplateSource};
pub use transform::Transform;
pub use types::{
    ActionSpec, Answer, AnswerSet, CommandSpec, Condition, ContextValue, DefaultValue, FileSet,
    Plan, QuestionSpec, SourceDir, Validator,
};
