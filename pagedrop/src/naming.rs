//! Repository naming

use std::fmt;

use serde::Serialize;

/// Longest repository name we ever derive
pub const MAX_REPO_NAME_LEN: usize = 80;

/// URL and filesystem safe repository name derived from a task label.
///
/// Only `[A-Za-z0-9._-]` survive; every run of other characters becomes a
/// single `-`. Labels that normalise to the same name share one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Derive the repository name for a task label
pub fn derive_repository_name(task_label: &str) -> RepositoryName {
    let mut name = String::with_capacity(task_label.len());
    let mut in_run = false;

    for c in task_label.chars() {
        if is_allowed(c) {
            name.push(c);
            in_run = false;
        } else if !in_run {
            name.push('-');
            in_run = true;
        }
    }

    // Output is pure ASCII, so byte truncation stays on a char boundary
    name.truncate(MAX_REPO_NAME_LEN);
    RepositoryName(name)
}
