//! Plan loader for YAML plan definitions.

use crate::types::{ActionSpec, DefaultValue, FileSet, Plan, QuestionSpec, SourceDir};
use creator_core::{AppError, AppResult};
use std::collections::HashSet;
use std::path::Path;

/// The create-creator plan, embedded at build time.
const BUILTIN_PLAN: &str = include_str!("../plans/create-creator.yml");

/// Parse and validate the built-in create-creator plan.
pub fn builtin_plan() -> AppResult<Plan> {
    parse_plan(BUILTIN_PLAN)
}

/// Load a plan definition from a YAML file.
///
/// # Example
/// ```no_run
/// use creator_plan::load_plan;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let plan = load_plan(Path::new("plans/create-creator.yml"))?;
/// println!("{} questions", plan.queries.len());
/// # Ok(())
/// # }
/// ```
pub fn load_plan(path: &Path) -> AppResult<Plan> {
    tracing::debug!("Loading plan from: {:?}", path);

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("Failed to read plan file {:?}: {}", path, e)))?;

    let plan = parse_plan(&contents)
        .map_err(|e| AppError::Config(format!("Invalid plan {:?}: {}", path, e)))?;

    tracing::info!(
        "Loaded plan {:?}: {} questions, {} actions",
        path,
        plan.queries.len(),
        plan.actions.len()
    );

    Ok(plan)
}

/// Parse plan YAML and validate it.
pub fn parse_plan(contents: &str) -> AppResult<Plan> {
    let plan: Plan = serde_yaml::from_str(contents)?;
    validate_plan(&plan)?;
    Ok(plan)
}

/// Validate a plan definition.
///
/// Rejects structural mistakes that would otherwise surface mid-run: unnamed
/// or duplicate questions, conditions on answers not yet collected, literal
/// defaults their own validator refuses, and unusable globs or commands.
pub fn validate_plan(plan: &Plan) -> AppResult<()> {
    let mut asked: HashSet<&str> = HashSet::new();

    for question in &plan.queries {
        let name = question.name();
        if name.is_empty() {
            return Err(AppError::Config("Question name cannot be empty".to_string()));
        }

        if let Some(condition) = question.when() {
            if !asked.contains(condition.subject()) {
                return Err(AppError::Config(format!(
                    "Question '{}' depends on '{}', which is not asked before it",
                    name,
                    condition.subject()
                )));
            }
        }

        if let QuestionSpec::Input(input) = question {
            if let (Some(DefaultValue::Literal(default)), Some(validator)) =
                (&input.default, &input.validate)
            {
                if let Err(message) = validator.check(&default.to_string()) {
                    return Err(AppError::Config(format!(
                        "Default for question '{}' is rejected by its validator: {}",
                        name, message
                    )));
                }
            }
        }

        if !asked.insert(name) {
            return Err(AppError::Config(format!("Duplicate question name: {}", name)));
        }
    }

    for action in &plan.actions {
        if action.name().is_empty() {
            return Err(AppError::Config("Action name cannot be empty".to_string()));
        }

        match action {
            ActionSpec::Copy(a) | ActionSpec::Template(a) => {
                for files in &a.files {
                    validate_file_set(&a.name, files, &asked)?;
                }
            }
            ActionSpec::Command(a) => {
                if let Some(empty) = a.commands.iter().find(|c| c.cmd.trim().is_empty()) {
                    return Err(AppError::Config(format!(
                        "Action '{}' has a command with no program: {:?}",
                        a.name, empty
                    )));
                }
            }
        }
    }

    Ok(())
}

fn validate_file_set(action: &str, files: &FileSet, asked: &HashSet<&str>) -> AppResult<()> {
    if let SourceDir::Switch { switch, .. } = &files.source {
        if !asked.contains(switch.as_str()) {
            return Err(AppError::Config(format!(
                "Action '{}' switches on '{}', which is never asked",
                action, switch
            )));
        }
    }

    glob::Pattern::new(&files.files).map_err(|e| {
        AppError::Config(format!(
            "Action '{}' has an invalid glob {:?}: {}",
            action, files.files, e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_plan_parses() {
        let plan = builtin_plan().unwrap();

        let names: Vec<&str> = plan.queries.iter().map(|q| q.name()).collect();
        assert_eq!(
            names,
            vec![
                "organization",
                "organizationName",
                "name",
                "description",
                "username",
                "email",
                "license",
                "repository",
                "standard",
                "example"
            ]
        );

        let actions: Vec<&str> = plan.actions.iter().map(|a| a.name()).collect();
        assert_eq!(actions, vec!["Copy Files", "Templates", "Commands"]);
    }

    #[test]
    fn test_rejects_invalid_literal_default() {
        let yaml = r#"
queries:
  - type: input
    name: organizationName
    message: Org?
    default: organization
    validate:
      kind: startsWith
      prefix: "@"
      message: organization must start with an @ symbol
"#;
        let err = parse_plan(yaml).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("must start with an @ symbol"));
    }

    #[test]
    fn test_rejects_forward_condition() {
        let yaml = r#"
queries:
  - type: input
    name: organizationName
    message: Org?
    when:
      truthy: organization
  - type: confirm
    name: organization
    message: Org?
"#;
        assert!(matches!(parse_plan(yaml), Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let yaml = r#"
queries:
  - type: confirm
    name: standard
    message: Lint?
  - type: confirm
    name: standard
    message: Lint again?
"#;
        let err = parse_plan(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate question name"));
    }

    #[test]
    fn test_rejects_unknown_switch() {
        let yaml = r#"
actions:
  - type: copy
    name: Copy Files
    files:
      - source:
          switch: example
          then: a
          else: b
        files: "*"
"#;
        assert!(matches!(parse_plan(yaml), Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(
            parse_plan("queries: [unclosed"),
            Err(AppError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_plan_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.yml");
        fs::write(
            &path,
            "queries:\n  - type: confirm\n    name: ok\n    message: OK?\nactions: []\n",
        )
        .unwrap();

        let plan = load_plan(&path).unwrap();
        assert_eq!(plan.queries.len(), 1);
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn test_load_missing_plan() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_plan(&temp_dir.path().join("missing.yml"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
