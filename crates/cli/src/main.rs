//! create-creator CLI
//!
//! Main entry point for the create-creator scaffolder. Run it from the
//! directory that should become the new creator package: it asks a short
//! series of questions, writes the project files, then runs `npm install`
//! and `git init`.

use clap::Parser;
use colored::Colorize;
use creator_core::{config::AppConfig, logging, AppResult, GitUser};
use creator_plan::{
    builtin_plan, load_plan, CommandRunner, DefaultsPrompter, DryRunCommandRunner,
    DryRunMaterializer, FsMaterializer, Materializer, Orchestrator, Plan, Prompter, RunContext,
    RunReport, SystemCommandRunner, TemplateSource, TerminalPrompter,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Scaffold a new creator package in the current directory
#[derive(Parser, Debug)]
#[command(name = "create-creator")]
#[command(about = "Scaffold a new creator package in the current directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory to scaffold into (default: current directory)
    #[arg(short, long, env = "CREATOR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, env = "CREATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to read template trees from instead of the built-in ones
    #[arg(long, env = "CREATOR_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Plan file to run instead of the built-in plan
    #[arg(long, env = "CREATOR_PLAN")]
    plan: Option<PathBuf>,

    /// Accept every default without prompting
    #[arg(short, long)]
    yes: bool,

    /// Show what would be written and run without doing it
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON when done
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let mut config = AppConfig::load()?
        .with_overrides(
            cli.workspace,
            cli.config,
            cli.templates,
            cli.plan,
            cli.log_level,
            cli.verbose,
            cli.no_color,
        )?;
    config.assume_yes = cli.yes;
    config.dry_run = cli.dry_run;

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    if config.no_color {
        colored::control::set_override(false);
    }

    tracing::info!("create-creator starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Templates: {:?}", config.templates);

    config.validate()?;

    let plan = match config.plan {
        Some(ref path) => load_plan(path)?,
        None => builtin_plan()?,
    };

    let user = config
        .gitconfig_path()
        .and_then(|path| GitUser::from_file(&path));
    let templates = match config.templates {
        Some(ref dir) => TemplateSource::Disk(dir.clone()),
        None => TemplateSource::Bundled,
    };
    let context = RunContext::new(&config.workspace, templates).with_user(user);

    let _span = tracing::info_span!("scaffold", dry_run = config.dry_run).entered();

    let result = scaffold(&config, &context, &plan);
    match &result {
        Ok(_) => tracing::info!("Scaffold completed successfully"),
        Err(e) => tracing::error!("Scaffold failed: {}", e),
    }
    let report = result?;

    print_report(&mut io::stdout().lock(), &report, cli.json)
}

/// Write the final report. Only this reaches stdout; progress and prompts
/// go to stderr.
fn print_report(out: &mut dyn Write, report: &RunReport, json: bool) -> AppResult<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        writeln!(
            out,
            "{} {} files written, {} commands run",
            "✔".green(),
            report.written.len(),
            report.commands.len()
        )?;
    }

    Ok(())
}

/// Pick collaborators for the configured mode and run the plan.
fn scaffold(config: &AppConfig, context: &RunContext, plan: &Plan) -> AppResult<RunReport> {
    let mut prompter: Box<dyn Prompter> = if config.assume_yes {
        Box::new(DefaultsPrompter)
    } else {
        Box::new(TerminalPrompter::new(io::stdin().lock(), io::stderr()))
    };

    let (materializer, mut commands): (Box<dyn Materializer>, Box<dyn CommandRunner>) =
        if config.dry_run {
            eprintln!("{}", "Dry run: nothing will be written or executed".yellow());
            (
                Box::new(DryRunMaterializer::new()),
                Box::new(DryRunCommandRunner::new()),
            )
        } else {
            (Box::new(FsMaterializer::new()), Box::new(SystemCommandRunner))
        };

    let mut orchestrator =
        Orchestrator::new(context, &mut *prompter, &*materializer, &mut *commands);
    orchestrator.run(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_is_valid() {
        let cli = Cli::try_parse_from(["create-creator"]).unwrap();
        assert!(!cli.yes);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "create-creator",
            "--yes",
            "--dry-run",
            "--plan",
            "custom.yml",
            "-v",
        ])
        .unwrap();
        assert!(cli.yes);
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert_eq!(cli.plan, Some(PathBuf::from("custom.yml")));
    }

    #[test]
    fn test_json_report_is_the_only_stdout_output() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = temp_dir.path().join("create-widget");
        fs::create_dir(&workspace).unwrap();

        let mut config = AppConfig::default();
        config.workspace = workspace.clone();
        config.assume_yes = true;
        config.dry_run = true;

        let context = RunContext::new(&workspace, TemplateSource::Bundled);
        let report = scaffold(&config, &context, &builtin_plan().unwrap()).unwrap();

        let mut stdout = Vec::new();
        print_report(&mut stdout, &report, true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
        assert_eq!(parsed["answers"]["name"], "create-widget");
        assert_eq!(parsed["commands"].as_array().map(Vec::len), Some(2));
        assert!(!parsed["written"].as_array().unwrap().is_empty());
        assert_eq!(fs::read_dir(&workspace).unwrap().count(), 0);
    }
}
