//! End-to-end lifecycle scenarios over in-memory port fakes.

mod common;

use std::path::PathBuf;
use std::time::Duration;

use agent_pipeline::error::{MockError, PipelineError, TrackerError};
use agent_pipeline::pipeline::{FailurePolicy, Orchestrator, TaskOutcome};
use agent_pipeline::ports::TaskStatus;

use common::{config, context, task, FakeTracker, FakeVcs};

const BRANCH: &str = "feature/abc12345-fix-login-bug";
const MOCK: &str = "/repo/mocks/abc12345xyz.mock.json";

#[tokio::test]
async fn zero_pending_tasks_is_a_quiet_success() {
    let (ctx, fakes) = context(vec![]);
    let config = config();

    let report = Orchestrator::new(&ctx, &config).run().await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.summary(), "No tasks in status=待处理");
    assert!(fakes.updates().is_empty());
    assert!(fakes.file_paths().is_empty());
    assert!(fakes.vcs_calls().is_empty());
}

#[tokio::test]
async fn dry_run_marks_in_progress_and_writes_mock_only() {
    let (ctx, fakes) = context(vec![task("abc12345-xyz", "Fix Login Bug")]);
    let mut config = config();
    config.dry_run = true;

    let report = Orchestrator::new(&ctx, &config).run().await.unwrap();

    let updates = fakes.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, TaskStatus::InProgress);
    assert!(updates[0].acceptance.starts_with("## Spec\n# Overview\n- Objective: Fix Login Bug"));
    assert_eq!(fakes.file_paths(), vec![PathBuf::from(MOCK)]);
    assert!(fakes.vcs_calls().is_empty());
    assert_eq!(
        report.outcomes[0].outcome,
        TaskOutcome::DryRun { mock_path: PathBuf::from(MOCK) }
    );
}

#[tokio::test]
async fn publishes_branch_and_pull_request_without_ci_wait() {
    let (ctx, fakes) = context(vec![task("abc12345-xyz", "Fix Login Bug")]);
    let config = config();

    let report = Orchestrator::new(&ctx, &config).run().await.unwrap();

    assert_eq!(
        fakes.vcs_calls(),
        vec![
            format!("checkout {BRANCH}"),
            "commit mocks Add mock for Fix Login Bug".to_string(),
            format!("push {BRANCH}"),
            "pr Fix Login Bug".to_string(),
        ]
    );

    let updates = fakes.updates();
    let statuses: Vec<TaskStatus> = updates.iter().map(|u| u.status).collect();
    assert_eq!(statuses, vec![TaskStatus::InProgress, TaskStatus::AwaitingTest]);

    let last = &updates[1].acceptance;
    assert!(last.starts_with(&updates[0].acceptance.trim_end().to_string()));
    assert!(last.ends_with("---\n\n## PR\nhttps://github.com/acme/app/pull/1\n"));
    assert!(!last.contains("## Test Report"));

    match &report.outcomes[0].outcome {
        TaskOutcome::Published { branch, pr_url, checks } => {
            assert_eq!(branch.as_str(), BRANCH);
            assert_eq!(pr_url, "https://github.com/acme/app/pull/1");
            assert!(checks.is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn ci_wait_appends_test_report_after_pr_section() {
    let (ctx, fakes) = context(vec![task("abc12345-xyz", "Fix Login Bug")]);
    let mut config = config();
    config.wait_for_ci = true;
    config.ci_timeout = Some(Duration::from_secs(600));

    Orchestrator::new(&ctx, &config).run().await.unwrap();

    let calls = fakes.vcs_calls();
    assert_eq!(calls.last().unwrap(), "checks https://github.com/acme/app/pull/1 Some(600s)");

    let updates = fakes.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].status, TaskStatus::AwaitingTest);
    let doc = &updates[1].acceptance;
    let pr_at = doc.find("## PR").unwrap();
    let report_at = doc.find("## Test Report\nbuild\tpass\t1m2s").unwrap();
    assert!(pr_at < report_at);
}

#[tokio::test]
async fn existing_acceptance_text_is_kept_ahead_of_the_spec() {
    let mut pending = task("abc12345-xyz", "Fix Login Bug");
    pending.acceptance = "Reported by support.\n".to_string();
    let (ctx, fakes) = context(vec![pending]);
    let mut config = config();
    config.dry_run = true;

    Orchestrator::new(&ctx, &config).run().await.unwrap();

    assert!(fakes.updates()[0]
        .acceptance
        .starts_with("Reported by support.\n\n---\n\n## Spec\n"));
}

#[tokio::test]
async fn invalid_existing_mock_aborts_after_in_progress_write() {
    let (ctx, fakes) = context(vec![task("abc12345-xyz", "Fix Login Bug")]);
    fakes.seed_file(MOCK, "{\"task_id\": \"abc12345-xyz\", \"title\": \"x\"}\n");
    let config = config();

    let err = Orchestrator::new(&ctx, &config).run().await.unwrap_err();

    match err {
        PipelineError::Mock(MockError::MissingFields { missing, .. }) => {
            assert_eq!(missing, vec!["cases", "description", "inputs", "notes", "outputs"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    let updates = fakes.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].status, TaskStatus::InProgress);
    assert!(fakes.vcs_calls().is_empty());
}

#[tokio::test]
async fn push_failure_aborts_remaining_tasks_by_default() {
    let (mut ctx, fakes) =
        context(vec![task("abc12345-xyz", "Fix Login Bug"), task("def67890-uvw", "Add Logout")]);
    ctx.vcs = Box::new(FakeVcs::failing(fakes.vcs_calls.clone(), "push", "abc12345"));
    let config = config();

    let err = Orchestrator::new(&ctx, &config).run().await.unwrap_err();

    assert_eq!(err.to_string(), "push failed: push rejected by remote");
    let updates = fakes.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].task_id, "abc12345-xyz");
    assert!(!fakes.vcs_calls().iter().any(|c| c.contains("def67890")));
}

#[tokio::test]
async fn continue_policy_records_failure_and_processes_next_task() {
    let (mut ctx, fakes) =
        context(vec![task("abc12345-xyz", "Fix Login Bug"), task("def67890-uvw", "Add Logout")]);
    ctx.vcs = Box::new(FakeVcs::failing(fakes.vcs_calls.clone(), "push", "abc12345"));
    let mut config = config();
    config.failure_policy = FailurePolicy::ContinueOnError;

    let report = Orchestrator::new(&ctx, &config).run().await.unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failures(), 1);
    assert!(matches!(
        &report.outcomes[0].outcome,
        TaskOutcome::Failed { error } if error == "push failed: push rejected by remote"
    ));
    assert!(matches!(&report.outcomes[1].outcome, TaskOutcome::Published { .. }));

    let statuses: Vec<(String, TaskStatus)> =
        fakes.updates().into_iter().map(|u| (u.task_id, u.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("abc12345-xyz".to_string(), TaskStatus::InProgress),
            ("def67890-uvw".to_string(), TaskStatus::InProgress),
            ("def67890-uvw".to_string(), TaskStatus::AwaitingTest),
        ]
    );
}

#[tokio::test]
async fn tracker_query_failure_aborts_before_any_work() {
    let (mut ctx, fakes) = context(vec![]);
    ctx.tracker = Box::new(FakeTracker::failing_query(
        Box::new(TrackerError::Api { status: 401, message: "API token is invalid.".into() }),
        fakes.updates.clone(),
    ));
    let config = config();

    let err = Orchestrator::new(&ctx, &config).run().await.unwrap_err();

    assert!(matches!(err, PipelineError::Tracker(TrackerError::Api { status: 401, .. })));
    assert!(fakes.file_paths().is_empty());
    assert!(fakes.vcs_calls().is_empty());
}

#[tokio::test]
async fn rerun_keeps_hand_edited_mock() {
    let (ctx, fakes) = context(vec![task("abc12345-xyz", "Fix Login Bug")]);
    let edited = serde_json::json!({
        "task_id": "abc12345-xyz",
        "title": "Fix Login Bug",
        "description": "login contract",
        "inputs": {"body": {"user": "a"}},
        "outputs": {"status": 200},
        "cases": [],
        "notes": "hand written",
    })
    .to_string();
    fakes.seed_file(MOCK, &edited);
    let mut config = config();
    config.dry_run = true;

    Orchestrator::new(&ctx, &config).run().await.unwrap();

    assert_eq!(fakes.files.lock().unwrap()[&PathBuf::from(MOCK)], edited);
}
