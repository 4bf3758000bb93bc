//! `run`: process every pending task.

use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::PipelineError;
use crate::pipeline::{Orchestrator, RunReport};

/// Runs the orchestrator to completion and prints the run summary.
///
/// # Errors
///
/// Returns the orchestrator's error, or [`PipelineError::TasksFailed`] when
/// tasks failed under the continue-on-error policy.
pub fn run(ctx: &ServiceContext, config: &Config) -> Result<(), PipelineError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PipelineError::Runtime(e.to_string()))?;

    let report = runtime.block_on(Orchestrator::new(ctx, config).run())?;
    println!("{}", report.summary());
    check_failures(&report)
}

fn check_failures(report: &RunReport) -> Result<(), PipelineError> {
    match report.failures() {
        0 => Ok(()),
        failed => Err(PipelineError::TasksFailed { failed, total: report.outcomes.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{TaskOutcome, TaskReport};

    #[test]
    fn failed_outcomes_fail_the_command() {
        let mut report = RunReport::new("pending");
        assert!(check_failures(&report).is_ok());

        report.outcomes.push(TaskReport {
            task_id: "p1".into(),
            title: "T".into(),
            outcome: TaskOutcome::Failed { error: "push failed: denied".into() },
        });
        let err = check_failures(&report).unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 task(s) failed");
        assert_eq!(err.exit_code(), 1);
    }
}
