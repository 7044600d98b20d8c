//! Git user lookup.
//!
//! Reads the `[user]` section of a `.gitconfig` file so prompts can offer the
//! user's name and email as defaults. The lookup is best effort: a missing or
//! unreadable file simply yields no user.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name and email from a git config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl GitUser {
    /// Read the user from a git config file, if it exists and names one.
    pub fn from_file(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let user = Self::parse(&contents);
                tracing::debug!("Read git user from {:?}: {:?}", path, user);
                user
            }
            Err(e) => {
                tracing::debug!("No git user available from {:?}: {}", path, e);
                None
            }
        }
    }

    /// Parse the `[user]` section of git config text.
    ///
    /// Later keys win, like git itself. Returns `None` when neither key is set.
    pub fn parse(contents: &str) -> Option<Self> {
        let mut user = GitUser::default();
        let mut in_user = false;

        for raw in contents.lines() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                // `[user]` only; subsections like `[user "x"]` are not the user.
                let header = line.trim_start_matches('[').trim_end_matches(']').trim();
                in_user = header.eq_ignore_ascii_case("user");
                continue;
            }

            if !in_user {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = unquote(value.trim()).to_string();
                match key.trim().to_ascii_lowercase().as_str() {
                    "name" => user.name = Some(value),
                    "email" => user.email = Some(value),
                    _ => {}
                }
            }
        }

        if user.name.is_none() && user.email.is_none() {
            None
        } else {
            Some(user)
        }
    }
}

/// Drop a trailing `#` or `;` comment that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' | ';' if !quoted => return &line[..i],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
