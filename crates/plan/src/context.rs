//! Run context: the process-wide values a plan may read.
//!
//! Built once at startup from configuration and handed to the orchestrator,
//! so plan logic never consults the environment directly.

use crate::templates::TemplateSource;
use crate::types::ContextValue;
use creator_core::GitUser;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Directory the project is scaffolded into
    pub cwd: PathBuf,

    /// Trees file set sources are read from
    pub templates: TemplateSource,

    /// User from the git config, when one could be read
    pub user: Option<GitUser>,
}

impl RunContext {
    pub fn new(cwd: impl Into<PathBuf>, templates: TemplateSource) -> Self {
        Self {
            cwd: cwd.into(),
            templates,
            user: None,
        }
    }

    pub fn with_user(mut self, user: Option<GitUser>) -> Self {
        self.user = user;
        self
    }

    /// Final component of the working directory, or empty.
    pub fn cwd_name(&self) -> String {
        self.cwd
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolve a context value; missing user details resolve to empty text.
    pub fn value(&self, key: ContextValue) -> String {
        match key {
            ContextValue::CwdName => self.cwd_name(),
            ContextValue::GitUserName => self
                .user
                .as_ref()
                .and_then(|u| u.name.clone())
                .unwrap_or_default(),
            ContextValue::GitUserEmail => self
                .user
                .as_ref()
                .and_then(|u| u.email.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cwd_name() {
        let context = RunContext::new("/work/create-widget", TemplateSource::Bundled);
        assert_eq!(context.value(ContextValue::CwdName), "create-widget");

        let root = RunContext::new("/", TemplateSource::Bundled);
        assert_eq!(root.cwd_name(), "");
    }

    #[test]
    fn test_missing_user_resolves_empty() {
        let context = RunContext::new("/work", TemplateSource::Bundled);
        assert_eq!(context.value(ContextValue::GitUserName), "");
        assert_eq!(context.value(ContextValue::GitUserEmail), "");
    }

    #[test]
    fn test_user_values() {
        let context = RunContext::new("/work", TemplateSource::Bundled).with_user(Some(GitUser {
            name: Some("Ada".to_string()),
            email: None,
        }));
        assert_eq!(context.value(ContextValue::GitUserName), "Ada");
        assert_eq!(context.value(ContextValue::GitUserEmail), "");
    }
}
