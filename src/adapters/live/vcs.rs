//! Live source-control adapter using the `git` and `gh` CLIs.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::ports::vcs::{PullRequest, SourceControl};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Live adapter that shells out to `git` and `gh` inside the repository root.
pub struct LiveSourceControl {
    root: PathBuf,
}

impl LiveSourceControl {
    /// Creates an adapter operating on the repository at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        tracing::debug!(program, ?args, root = %self.root.display(), "running command");
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.root);
        command
    }

    /// Runs a command to completion and returns its stdout.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = self.command(program, args).output()?;
        check(program, args, &output)
    }
}

fn check(
    program: &str,
    args: &[&str],
    output: &Output,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let subcommand = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        return Err(format!("{program} {subcommand} failed ({}): {}", output.status, stderr.trim()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Reads a child pipe to the end on its own thread so the child never blocks
/// on a full pipe while we poll for its exit.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                tracing::debug!("stopped reading child output: {e}");
            }
        }
        buf
    })
}

/// Waits for a spawned command, killing it once `deadline` has passed.
fn wait_with_deadline(
    mut child: std::process::Child,
    deadline: Duration,
) -> Result<Output, Box<dyn std::error::Error + Send + Sync>> {
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= deadline {
            child.kill()?;
            child.wait()?;
            return Err(format!("gave up waiting after {}s", deadline.as_secs()).into());
        }
        thread::sleep(POLL_INTERVAL);
    };
    let stdout = stdout.join().map_err(|_| "stdout reader panicked")?;
    let stderr = stderr.join().map_err(|_| "stderr reader panicked")?;
    Ok(Output { status, stdout, stderr })
}

/// Last non-empty line of `stdout`, trimmed.
fn last_line(stdout: &str) -> Option<String> {
    stdout.lines().map(str::trim).rev().find(|line| !line.is_empty()).map(str::to_string)
}

impl SourceControl for LiveSourceControl {
    fn branch_and_checkout(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.run("git", &["checkout", "-b", branch]).map(drop)
    }

    fn stage_and_commit(
        &self,
        path: &Path,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let path = path.to_string_lossy().into_owned();
        self.run("git", &["add", path.as_str()])?;
        self.run("git", &["commit", "-m", message]).map(drop)
    }

    fn push(&self, branch: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.run("git", &["push", "-u", "origin", branch]).map(drop)
    }

    fn create_pull_request(
        &self,
        request: &PullRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let stdout = self.run(
            "gh",
            &[
                "pr",
                "create",
                "--title",
                request.title.as_str(),
                "--body",
                request.body.as_str(),
                "--repo",
                request.repo.as_str(),
            ],
        )?;
        last_line(&stdout).ok_or_else(|| "gh pr create printed no pull request URL".into())
    }

    fn watch_checks(
        &self,
        pr_url: &str,
        timeout: Option<Duration>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args = ["pr", "checks", pr_url, "--watch"];
        let Some(deadline) = timeout else {
            return Ok(self.run("gh", &args)?.trim().to_string());
        };
        let child = self
            .command("gh", &args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let output = wait_with_deadline(child, deadline)
            .map_err(|e| format!("gh pr checks {pr_url}: {e}"))?;
        Ok(check("gh", &args, &output)?.trim().to_string())
    }
}
