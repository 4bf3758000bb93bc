//! `branch-name`: print the branch a task would use.

use crate::branch::BranchName;

/// Prints the derived branch name.
pub fn run(prefix: &str, task_id: &str, title: &str) {
    println!("{}", BranchName::derive(prefix, task_id, title));
}
