//! Prompt runners: turn a question plus its resolved default into an answer.

use crate::types::{Answer, QuestionSpec};
use colored::Colorize;
use creator_core::{AppError, AppResult};
use std::io::{BufRead, Write};

/// Collects one answer per question.
///
/// Validation is the runner's concern: an interactive runner re-prompts on a
/// rejected value, a non-interactive one fails with `AppError::Validation`.
pub trait Prompter {
    fn ask(&mut self, question: &QuestionSpec, default: Option<&Answer>) -> AppResult<Answer>;
}

/// Interactive prompts over a line reader and a writer.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back the writer, e.g. to inspect what was shown.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_answer(&mut self, question: &QuestionSpec, hint: &str) -> AppResult<String> {
        write!(
            self.writer,
            "{} {} {}",
            "?".green(),
            question.message().bold(),
            hint.dimmed()
        )?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(AppError::Prompt(format!(
                "Input closed before '{}' was answered",
                question.name()
            )));
        }

        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, question: &QuestionSpec, default: bool) -> AppResult<Answer> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        let input = self.read_answer(question, hint)?;

        let value = if input.is_empty() {
            default
        } else {
            input.to_ascii_lowercase().starts_with('y')
        };

        Ok(Answer::Bool(value))
    }

    fn input(&mut self, question: &QuestionSpec, default: Option<&Answer>) -> AppResult<Answer> {
        let default = default.map(Answer::to_string);
        let hint = match default.as_deref() {
            Some(value) if !value.is_empty() => format!("({})", value),
            _ => String::new(),
        };

        loop {
            let input = self.read_answer(question, &hint)?;
            let value = if input.is_empty() {
                default.clone().unwrap_or_default()
            } else {
                input
            };

            match question.validator().map(|v| v.check(&value)) {
                Some(Err(message)) => {
                    tracing::debug!("Rejected answer for {}: {}", question.name(), message);
                    writeln!(self.writer, "{} {}", ">>".red(), message)?;
                }
                _ => return Ok(Answer::Text(value)),
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &QuestionSpec, default: Option<&Answer>) -> AppResult<Answer> {
        match question {
            QuestionSpec::Confirm(_) => {
                let default = default.is_some_and(Answer::is_truthy);
                self.confirm(question, default)
            }
            QuestionSpec::Input(_) => self.input(question, default),
        }
    }
}

/// Accepts every default without reading input (`--yes`).
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn ask(&mut self, question: &QuestionSpec, default: Option<&Answer>) -> AppResult<Answer> {
        let answer = match question {
            QuestionSpec::Confirm(_) => Answer::Bool(default.is_some_and(Answer::is_truthy)),
            QuestionSpec::Input(_) => {
                Answer::Text(default.map(Answer::to_string).unwrap_or_default())
            }
        };

        if let (Some(validator), Answer::Text(value)) = (question.validator(), &answer) {
            validator.check(value).map_err(|message| {
                AppError::Validation(format!(
                    "default for '{}' ({:?}) was rejected: {}",
                    question.name(),
                    value,
                    message
                ))
            })?;
        }

        tracing::info!("Accepted default for {}: {}", question.name(), answer);
        Ok(answer)
    }
}
