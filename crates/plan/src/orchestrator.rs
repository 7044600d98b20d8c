//! Plan orchestrator: prompts first, then actions, strictly in order.
//!
//! A run is two linear phases. PROMPTING walks the questions, skipping those
//! whose condition is false, and grows the answer set one entry at a time.
//! ACTING then executes every action against the finished answers, each one
//! completing before the next starts. The first failure ends the run; nothing
//! already written is rolled back.

use crate::command::CommandRunner;
use crate::context::RunContext;
use crate::materializer::{Materializer, RenderMode};
use crate::prompter::Prompter;
use crate::types::{ActionSpec, AnswerSet, CommandSpec, FileAction, Plan, QuestionSpec};
use colored::Colorize;
use creator_core::{AppError, AppResult};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Final answers
    pub answers: AnswerSet,

    /// Every destination written, in order
    pub written: Vec<PathBuf>,

    /// Commands that ran and exited successfully, in order
    pub commands: Vec<CommandSpec>,
}

/// Drives one plan through its collaborators.
///
/// Progress lines go to stderr unless another writer is given, so stdout
/// stays free for the caller's own output.
pub struct Orchestrator<'a> {
    context: &'a RunContext,
    prompter: &'a mut dyn Prompter,
    materializer: &'a dyn Materializer,
    commands: &'a mut dyn CommandRunner,
    progress: Box<dyn Write + 'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        context: &'a RunContext,
        prompter: &'a mut dyn Prompter,
        materializer: &'a dyn Materializer,
        commands: &'a mut dyn CommandRunner,
    ) -> Self {
        Self {
            context,
            prompter,
            materializer,
            commands,
            progress: Box::new(io::stderr()),
        }
    }

    /// Send progress lines to `progress` instead of stderr.
    pub fn with_progress(mut self, progress: impl Write + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Run the plan to completion or to its first failure.
    pub fn run(&mut self, plan: &Plan) -> AppResult<RunReport> {
        let answers = self.collect_answers(&plan.queries)?;

        let mut report = RunReport {
            answers,
            ..RunReport::default()
        };
        self.execute_actions(&plan.actions, &mut report)?;

        tracing::info!(
            "Plan completed: {} files written, {} commands run",
            report.written.len(),
            report.commands.len()
        );

        Ok(report)
    }

    /// PROMPTING phase: ask each visible question in order.
    pub fn collect_answers(&mut self, queries: &[QuestionSpec]) -> AppResult<AnswerSet> {
        let _span = tracing::info_span!("prompting").entered();
        let mut answers = AnswerSet::new();

        for question in queries {
            if !question.is_visible(&answers) {
                tracing::debug!("Skipping question {}", question.name());
                continue;
            }

            let default = question.resolve_default(self.context);
            let answer = self.prompter.ask(question, default.as_ref())?;
            tracing::debug!("Answered {}: {}", question.name(), answer);

            answers.insert(question.name(), answer);
        }

        Ok(answers)
    }

    /// ACTING phase: run each action in order against the final answers.
    fn execute_actions(&mut self, actions: &[ActionSpec], report: &mut RunReport) -> AppResult<()> {
        for (index, action) in actions.iter().enumerate() {
            let step = index + 1;
            let _span = tracing::info_span!("action", step, name = action.name()).entered();

            writeln!(self.progress, "{} {}", "»".cyan(), action.name().bold())?;

            if let Err(e) = self.execute_action(action, report) {
                tracing::error!("Action {} ({}) failed: {}", step, action.name(), e);
                return Err(e);
            }
        }

        Ok(())
    }

    fn execute_action(&mut self, action: &ActionSpec, report: &mut RunReport) -> AppResult<()> {
        match action {
            ActionSpec::Copy(files) => self.materialize(RenderMode::Copy, action, files, report),
            ActionSpec::Template(files) => {
                self.materialize(RenderMode::Template, action, files, report)
            }
            ActionSpec::Command(command) => {
                for spec in &command.commands {
                    self.run_command(spec)?;
                    report.commands.push(spec.clone());
                }
                Ok(())
            }
        }
    }

    fn materialize(
        &mut self,
        mode: RenderMode,
        action: &ActionSpec,
        files: &FileAction,
        report: &mut RunReport,
    ) -> AppResult<()> {
        let transform = action.transform().ok_or_else(|| {
            AppError::Config(format!("Action '{}' has no path transform", action.name()))
        })?;

        for file_set in &files.files {
            let resolved = file_set.resolve(self.context, &report.answers);
            let written =
                self.materializer
                    .materialize(mode, &resolved, transform, &report.answers)?;
            report.written.extend(written);
        }

        Ok(())
    }

    fn run_command(&mut self, spec: &CommandSpec) -> AppResult<()> {
        let status = self.commands.run(spec, &self.context.cwd)?;

        if !status.is_success() {
            return Err(AppError::Command(format!("`{}` failed with {}", spec, status)));
        }

        tracing::debug!("`{}` finished with {}", spec, status);
        Ok(())
    }
}
