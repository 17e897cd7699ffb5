//! Sequential bulk operation orchestrator.
//!
//! Spreadsheet-driven workflows (bulk listing creation, bulk price updates)
//! run many items through the same operation. [`BulkRunner`] executes them
//! strictly one at a time — concurrency would defeat the rate limiter — and
//! tolerates per-item failures: a failed item is recorded and the batch
//! moves on. Cancellation is checked between items only; an in-flight
//! request always completes and its outcome is recorded.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::ApiError;

/// Outcome state of one bulk item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BulkStatus {
    /// Not yet processed (remains after cancellation).
    Pending,
    /// The operation completed successfully.
    Succeeded,
    /// The operation failed; the error text is on the record.
    Failed,
}

/// The record of one item in a bulk run.
#[derive(Clone, Debug)]
pub struct BulkRecord<T> {
    /// Position of the item in the input, 0-based.
    pub index: usize,
    /// The input item.
    pub input: T,
    /// Outcome state.
    pub status: BulkStatus,
    /// Identifier of the created/updated resource, when the operation
    /// produced one.
    pub result_id: Option<String>,
    /// Error text for failed items.
    pub error: Option<String>,
}

/// Progress notification delivered after each processed item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkProgress {
    /// Index of the item just processed.
    pub index: usize,
    /// Total items in the batch.
    pub total: usize,
    /// Succeeded so far.
    pub succeeded: usize,
    /// Failed so far.
    pub failed: usize,
}

/// Callback invoked with a [`BulkProgress`] after each processed item.
pub type ProgressHook = Arc<dyn Fn(&BulkProgress) + Send + Sync>;

/// The outcome of a bulk run.
///
/// Always carries exactly one record per input item, in input order; a
/// cancelled run leaves the unprocessed remainder [`BulkStatus::Pending`].
#[derive(Clone, Debug)]
pub struct BulkReport<T> {
    /// Per-item records, in input order.
    pub records: Vec<BulkRecord<T>>,
    /// Whether the run stopped early due to cancellation.
    pub cancelled: bool,
}

impl<T> BulkReport<T> {
    /// Number of items that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(&BulkStatus::Succeeded)
    }

    /// Number of items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(&BulkStatus::Failed)
    }

    /// Number of items never processed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.count(&BulkStatus::Pending)
    }

    fn count(&self, status: &BulkStatus) -> usize {
        self.records.iter().filter(|r| &r.status == status).count()
    }
}

/// Runs bulk operations sequentially.
#[derive(Clone, Copy, Debug, Default)]
pub struct BulkRunner;

impl BulkRunner {
    /// Runs `operation` over `items`, one at a time, in order.
    ///
    /// The operation receives a clone of each item and returns the created
    /// resource's identifier, if any. Failures are recorded on the item's
    /// record and never abort the batch. `cancel` is polled between items;
    /// once set, the remaining items stay [`BulkStatus::Pending`].
    pub async fn run<T, F, Fut>(
        items: Vec<T>,
        operation: F,
        progress: Option<ProgressHook>,
        cancel: &Arc<AtomicBool>,
    ) -> BulkReport<T>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<Option<String>, ApiError>>,
    {
        let total = items.len();
        let mut records: Vec<BulkRecord<T>> = Vec::with_capacity(total);
        let mut cancelled = false;
        let mut succeeded = 0;
        let mut failed = 0;

        for (index, input) in items.into_iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!(index, total, "Bulk run cancelled; remaining items left pending");
                cancelled = true;
                records.push(BulkRecord {
                    index,
                    input,
                    status: BulkStatus::Pending,
                    result_id: None,
                    error: None,
                });
                continue;
            }

            let record = match operation(input.clone()).await {
                Ok(result_id) => {
                    succeeded += 1;
                    BulkRecord {
                        index,
                        input,
                        status: BulkStatus::Succeeded,
                        result_id,
                        error: None,
                    }
                }
                Err(error) => {
                    failed += 1;
                    warn!(index, %error, "Bulk item failed; continuing");
                    BulkRecord {
                        index,
                        input,
                        status: BulkStatus::Failed,
                        result_id: None,
                        error: Some(error.to_string()),
                    }
                }
            };
            records.push(record);

            if let Some(hook) = &progress {
                hook(&BulkProgress {
                    index,
                    total,
                    succeeded,
                    failed,
                });
            }
        }

        info!(total, succeeded, failed, cancelled, "Bulk run finished");
        BulkReport { records, cancelled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn no_cancel() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[tokio::test]
    async fn test_all_items_succeed_in_order() {
        let items = vec!["a", "b", "c"];
        let report = BulkRunner::run(
            items,
            |item| async move { Ok(Some(format!("id-{item}"))) },
            None,
            &no_cancel(),
        )
        .await;

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.succeeded(), 3);
        assert!(!report.cancelled);
        for (i, record) in report.records.iter().enumerate() {
            assert_eq!(record.index, i);
            assert_eq!(record.status, BulkStatus::Succeeded);
        }
        assert_eq!(report.records[1].result_id.as_deref(), Some("id-b"));
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_the_batch() {
        let items = vec![1, 2, 3, 4, 5];
        let report = BulkRunner::run(
            items,
            |item| async move {
                if item == 3 {
                    Err(ApiError::NotFound {
                        message: "listing gone".to_string(),
                    })
                } else {
                    Ok(None)
                }
            },
            None,
            &no_cancel(),
        )
        .await;

        assert_eq!(report.records.len(), 5);
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.records[2].status, BulkStatus::Failed);
        assert!(report.records[2]
            .error
            .as_deref()
            .unwrap()
            .contains("listing gone"));
        // Items after the failure still ran
        assert_eq!(report.records[4].status, BulkStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_cancellation_leaves_remainder_pending() {
        let cancel = no_cancel();
        let cancel_inside = Arc::clone(&cancel);

        let items = vec![0usize, 1, 2, 3, 4];
        let report = BulkRunner::run(
            items,
            |item| {
                let cancel = Arc::clone(&cancel_inside);
                async move {
                    // Request cancellation while processing item 1; item 1
                    // itself still completes.
                    if item == 1 {
                        cancel.store(true, Ordering::SeqCst);
                    }
                    Ok(None)
                }
            },
            None,
            &cancel,
        )
        .await;

        assert!(report.cancelled);
        assert_eq!(report.records.len(), 5);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.pending(), 3);
        assert_eq!(report.records[1].status, BulkStatus::Succeeded);
        assert_eq!(report.records[2].status, BulkStatus::Pending);
    }

    #[tokio::test]
    async fn test_progress_hook_fires_per_processed_item() {
        let seen: Arc<Mutex<Vec<BulkProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook: ProgressHook = Arc::new(move |progress| {
            sink.lock().unwrap().push(progress.clone());
        });

        let report = BulkRunner::run(
            vec!["x", "y"],
            |_| async move { Ok(None) },
            Some(hook),
            &no_cancel(),
        )
        .await;

        assert_eq!(report.succeeded(), 2);
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            BulkProgress {
                index: 1,
                total: 2,
                succeeded: 2,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_report() {
        let report = BulkRunner::run(
            Vec::<u32>::new(),
            |_| async move { Ok(None) },
            None,
            &no_cancel(),
        )
        .await;

        assert!(report.records.is_empty());
        assert!(!report.cancelled);
    }
}
