use super::*;
use chatpilot_flow::OutputFormat;

async fn store() -> JobStore {
    JobStore::open_in_memory().await.unwrap()
}

#[tokio::test]
async fn test_enqueue_and_get() {
    let store = store().await;
    let job = store
        .enqueue(
            NewJob::new("gemini", "what is 2+2?")
                .with_system_prompt("answer briefly")
                .with_output(OutputFormat::Json),
        )
        .await
        .unwrap();

    let loaded = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.provider, "gemini");
    assert_eq!(loaded.prompt, "what is 2+2?");
    assert_eq!(loaded.system_prompt.as_deref(), Some("answer briefly"));
    assert_eq!(loaded.output, OutputFormat::Json);
    assert_eq!(loaded.status, JobStatus::Pending);
    assert_eq!(loaded.attempts, 0);
}

#[tokio::test]
async fn test_get_missing() {
    let store = store().await;
    assert!(store.get("no-such-job").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_rejects_corrupt_status() {
    let store = store().await;
    let job = store.enqueue(NewJob::new("gemini", "hi")).await.unwrap();

    // Write a status outside the lifecycle vocabulary behind the store's back.
    let id = job.id.clone();
    store
        .conn
        .call(move |conn| {
            conn.execute(
                "UPDATE jobs SET status = 'sleeping' WHERE id = ?1",
                rusqlite::params![id],
            )?;
            Ok(())
        })
        .await
        .unwrap();

    let err = store.get(&job.id).await.unwrap_err();
    assert!(err.to_string().contains("Invalid job status"), "got: {err}");
}

#[tokio::test]
async fn test_claim_is_fifo() {
    let store = store().await;
    let first = store.enqueue(NewJob::new("gemini", "first")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.enqueue(NewJob::new("grok", "second")).await.unwrap();

    let claimed = store.claim_next().await.unwrap().unwrap();
    assert_eq!(claimed.id, first.id);
    assert_eq!(claimed.status, JobStatus::Running);
    assert_eq!(claimed.attempts, 1);
    assert!(claimed.started_at.is_some());

    let claimed = store.claim_next().await.unwrap().unwrap();
    assert_eq!(claimed.id, second.id);

    assert!(store.claim_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_claim_empty_queue() {
    let store = store().await;
    assert!(store.claim_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_complete() {
    let store = store().await;
    let job = store.enqueue(NewJob::new("gemini", "hi")).await.unwrap();
    store.claim_next().await.unwrap().unwrap();

    store.complete(&job.id, "{\"text\":\"4\"}").await.unwrap();

    let loaded = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, JobStatus::Completed);
    assert_eq!(loaded.result.as_deref(), Some("{\"text\":\"4\"}"));
    assert!(loaded.finished_at.is_some());
    assert!(loaded.error.is_none());
}

#[tokio::test]
async fn test_complete_missing() {
    let store = store().await;
    let err = store.complete("ghost", "{}").await.unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[tokio::test]
async fn test_fail_requeues_until_exhausted() {
    let store = store().await;
    let job = store
        .enqueue(NewJob::new("gemini", "hi").with_max_attempts(2))
        .await
        .unwrap();

    // First failure: one attempt used, goes back to pending.
    store.claim_next().await.unwrap().unwrap();
    let status = store.fail(&job.id, "selector vanished").await.unwrap();
    assert_eq!(status, JobStatus::Pending);

    let loaded = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, JobStatus::Pending);
    assert_eq!(loaded.error.as_deref(), Some("selector vanished"));
    assert!(loaded.finished_at.is_none());

    // Second failure exhausts the budget.
    store.claim_next().await.unwrap().unwrap();
    let status = store.fail(&job.id, "still broken").await.unwrap();
    assert_eq!(status, JobStatus::Failed);

    let loaded = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, JobStatus::Failed);
    assert_eq!(loaded.attempts, 2);
    assert!(loaded.finished_at.is_some());
}

#[tokio::test]
async fn test_fail_missing() {
    let store = store().await;
    let err = store.fail("ghost", "boom").await.unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[tokio::test]
async fn test_list_and_counts() {
    let store = store().await;
    let a = store.enqueue(NewJob::new("gemini", "a")).await.unwrap();
    store.enqueue(NewJob::new("grok", "b")).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.complete(&a.id, "{}").await.unwrap();

    let all = store.list(None, 10).await.unwrap();
    assert_eq!(all.len(), 2);

    let pending = store.list(Some(JobStatus::Pending), 10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].prompt, "b");

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.get(&JobStatus::Pending), Some(&1));
    assert_eq!(counts.get(&JobStatus::Completed), Some(&1));
    assert_eq!(counts.get(&JobStatus::Running), None);
}

#[tokio::test]
async fn test_queue_position() {
    let store = store().await;
    let first = store.enqueue(NewJob::new("gemini", "a")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.enqueue(NewJob::new("gemini", "b")).await.unwrap();

    assert_eq!(store.queue_position(&first.id).await.unwrap(), Some(1));
    assert_eq!(store.queue_position(&second.id).await.unwrap(), Some(2));

    // Running jobs have no queue position.
    store.claim_next().await.unwrap().unwrap();
    assert_eq!(store.queue_position(&first.id).await.unwrap(), None);
    assert_eq!(store.queue_position(&second.id).await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_queue_position_missing() {
    let store = store().await;
    let err = store.queue_position("ghost").await.unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[tokio::test]
async fn test_average_defaults_without_history() {
    let store = store().await;
    let avg = store.average_processing_seconds().await.unwrap();
    assert_eq!(avg, 60.0);
}

#[tokio::test]
async fn test_average_uses_completed_jobs() {
    let store = store().await;
    let job = store.enqueue(NewJob::new("gemini", "a")).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.complete(&job.id, "{}").await.unwrap();

    // Wall time of the single sample is near zero, so the average must
    // have left the 60 s fallback.
    let avg = store.average_processing_seconds().await.unwrap();
    assert!(avg < 10.0, "average was {avg}");
}

#[tokio::test]
async fn test_estimated_start() {
    let store = store().await;
    let first = store.enqueue(NewJob::new("gemini", "a")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.enqueue(NewJob::new("gemini", "b")).await.unwrap();

    // Head of the queue, nothing running: starts immediately.
    assert_eq!(
        store.estimated_start_seconds(&first.id).await.unwrap(),
        Some(0.0)
    );
    // One job ahead at the 60 s default average.
    assert_eq!(
        store.estimated_start_seconds(&second.id).await.unwrap(),
        Some(60.0)
    );

    // Claiming the head makes it running: it now counts toward the wait.
    store.claim_next().await.unwrap().unwrap();
    assert_eq!(
        store.estimated_start_seconds(&second.id).await.unwrap(),
        Some(60.0)
    );
    assert_eq!(store.estimated_start_seconds(&first.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_cleanup_removes_only_old_terminal_jobs() {
    let store = store().await;
    let done = store.enqueue(NewJob::new("gemini", "done")).await.unwrap();
    store.claim_next().await.unwrap().unwrap();
    store.complete(&done.id, "{}").await.unwrap();
    store.enqueue(NewJob::new("gemini", "waiting")).await.unwrap();

    // Recent terminal job survives a 10-day retention window.
    assert_eq!(store.cleanup(10).await.unwrap(), 0);

    // With a zero-day window the completed job is pruned; the pending one
    // is untouched.
    assert_eq!(store.cleanup(0).await.unwrap(), 1);
    let counts = store.counts().await.unwrap();
    assert_eq!(counts.get(&JobStatus::Pending), Some(&1));
    assert_eq!(counts.get(&JobStatus::Completed), None);
}

#[tokio::test]
async fn test_open_creates_parent_dirs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("jobs.db");
    let store = JobStore::open(&path).await.unwrap();
    store.enqueue(NewJob::new("gemini", "hi")).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_reopen_preserves_jobs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("jobs.db");

    let store = JobStore::open(&path).await.unwrap();
    let job = store.enqueue(NewJob::new("gemini", "persisted")).await.unwrap();
    drop(store);

    let store = JobStore::open(&path).await.unwrap();
    let loaded = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.prompt, "persisted");
}
