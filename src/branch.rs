//! Branch-name derivation for task branches.

use std::fmt;

use crate::ports::Task;

/// Maximum number of characters kept from the title slug.
const MAX_SLUG_CHARS: usize = 40;

/// Slug used when the title has no usable characters.
const FALLBACK_SLUG: &str = "task";

/// A branch name derived from a prefix, a task id fragment, and a title slug.
///
/// Shaped `<prefix>/<short-id>-<slug>`, e.g. `feature/abc12345-fix-login-bug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Derives the branch name for a task id and title.
    #[must_use]
    pub fn derive(prefix: &str, task_id: &str, title: &str) -> Self {
        let short_id = task_id.split('-').next().unwrap_or_default();
        Self(format!("{prefix}/{short_id}-{}", slugify(title)))
    }

    /// Derives the branch name for a task.
    #[must_use]
    pub fn for_task(prefix: &str, task: &Task) -> Self {
        Self::derive(prefix, &task.id, &task.title)
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases, keeps alphanumerics plus `-`, `_` and space, trims, turns
/// spaces into dashes, and truncates to [`MAX_SLUG_CHARS`] characters.
fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .collect();
    let slug: String = kept.trim().replace(' ', "-").chars().take(MAX_SLUG_CHARS).collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
