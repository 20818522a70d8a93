// ==========================================
// Scorte - import reconciler
// ==========================================
// Submits the valid batch to the store strictly one row at a time.
// A failed submission is counted and skipped: no retry, no abort.
// Progress is emitted after every attempt and never decreases.
// ==========================================

use crate::domain::import::{ImportProgress, ImportReport, ImportRow};
use crate::repository::material_store::MaterialStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub struct ImportReconciler {
    store: Arc<dyn MaterialStore>,
}

impl ImportReconciler {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    /// Submit every row without progress reporting.
    pub async fn reconcile(&self, rows: &[ImportRow]) -> ImportReport {
        self.reconcile_with_progress(rows, |_| {}).await
    }

    /// Submit every row in order, calling `on_progress` after each attempt.
    ///
    /// # Parameters
    /// - `rows`: valid rows, in source order
    /// - `on_progress`: observer for `{completed, total, percent, succeeded, failed}`
    ///
    /// # Returns
    /// Counts of succeeded and failed submissions; `succeeded + failed == rows.len()`.
    #[instrument(skip_all, fields(total = rows.len()))]
    pub async fn reconcile_with_progress<F>(
        &self,
        rows: &[ImportRow],
        mut on_progress: F,
    ) -> ImportReport
    where
        F: FnMut(ImportProgress) + Send,
    {
        let started = Instant::now();
        let total = rows.len();
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut created_ids = Vec::with_capacity(total);

        for (idx, row) in rows.iter().enumerate() {
            match self.store.create_material(row.to_input()).await {
                Ok(material) => {
                    succeeded += 1;
                    created_ids.push(material.id);
                }
                Err(e) => {
                    failed += 1;
                    warn!(
                        row = row.source_row_number,
                        name = %row.name,
                        error = %e,
                        "material submission failed"
                    );
                }
            }

            let completed = idx + 1;
            on_progress(ImportProgress {
                completed,
                total,
                percent: ImportProgress::percent_of(completed, total),
                succeeded,
                failed,
            });
        }

        let report = ImportReport {
            total,
            succeeded,
            failed,
            progress: ImportProgress::percent_of(total, total),
            created_ids,
            elapsed: started.elapsed(),
        };

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "import submission finished"
        );

        report
    }
}
