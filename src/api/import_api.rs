// ==========================================
// Scorte - material import API
// ==========================================
// upload (boundary checks + parse) -> preview -> confirm (sequential submit)
// The ImportSession belongs to the caller and is passed to every step.
// ==========================================

use crate::api::error::ApiResult;
use crate::config::policy_reader::PolicyReader;
use crate::domain::import::{ImportProgress, ImportReport};
use crate::importer::file_parser::check_upload;
use crate::importer::reconciler::ImportReconciler;
use crate::importer::row_validator::RowValidator;
use crate::importer::session::{ImportPreview, ImportSession, ImportStep};
use crate::importer::tabular_import::TabularImportParser;
use crate::importer::ImportFailure;
use crate::repository::material_store::MaterialStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct ImportApi {
    store: Arc<dyn MaterialStore>,
    policy: Arc<dyn PolicyReader>,
}

impl ImportApi {
    pub fn new(store: Arc<dyn MaterialStore>, policy: Arc<dyn PolicyReader>) -> Self {
        Self { store, policy }
    }

    /// Upload a file from disk. Size is checked before the file is read.
    ///
    /// # Parameters
    /// - `session`: caller-owned session (must not be importing)
    /// - `path`: file to import; its name decides the decoder
    pub async fn upload_file(
        &self,
        session: &mut ImportSession,
        path: &Path,
    ) -> ApiResult<ImportPreview> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        ensure_not_importing(session)?;
        let size = tokio::fs::metadata(path)
            .await
            .map_err(ImportFailure::from)?
            .len();
        let max = self.policy.get_max_upload_bytes().await?;
        check_upload(&file_name, size, max)?;

        let payload = tokio::fs::read(path).await.map_err(ImportFailure::from)?;
        self.upload_bytes(session, &file_name, &payload).await
    }

    /// Upload an in-memory payload.
    ///
    /// # Returns
    /// The preview: valid rows plus rejected rows with their messages.
    ///
    /// # Errors
    /// Boundary rejections and fatal parse errors; the session is reset to
    /// `upload` on a fatal error so no partial state survives.
    #[instrument(skip(self, session, payload), fields(bytes = payload.len()))]
    pub async fn upload_bytes(
        &self,
        session: &mut ImportSession,
        file_name: &str,
        payload: &[u8],
    ) -> ApiResult<ImportPreview> {
        ensure_not_importing(session)?;

        let max = self.policy.get_max_upload_bytes().await?;
        check_upload(file_name, payload.len() as u64, max)?;

        let default_unit = self.policy.get_default_unit().await?;
        let parser = TabularImportParser::new(RowValidator::new(default_unit));

        let parsed = match parser.parse(file_name, payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "import file rejected");
                session.cancel()?;
                return Err(e.into());
            }
        };

        session.load_preview(file_name, parsed)?;
        session
            .preview()
            .ok_or_else(|| ImportFailure::InvalidTransition {
                from: session.step().to_string(),
                to: ImportStep::Preview.to_string(),
            })
            .map_err(Into::into)
    }

    /// Abandon the preview. Refused once importing has started.
    pub fn cancel(&self, session: &mut ImportSession) -> ApiResult<()> {
        session.cancel()?;
        Ok(())
    }

    /// Submit the previewed valid rows.
    pub async fn confirm_import(&self, session: &mut ImportSession) -> ApiResult<ImportReport> {
        self.confirm_import_with_progress(session, |_| {}).await
    }

    /// Submit the previewed valid rows, one at a time, reporting progress.
    ///
    /// # Errors
    /// `NothingToImport` when the preview has no valid row.
    pub async fn confirm_import_with_progress<F>(
        &self,
        session: &mut ImportSession,
        mut on_progress: F,
    ) -> ApiResult<ImportReport>
    where
        F: FnMut(ImportProgress) + Send,
    {
        let rows = session.begin_import()?;
        let reconciler = ImportReconciler::new(Arc::clone(&self.store));

        let report = reconciler
            .reconcile_with_progress(&rows, |progress| {
                session.record_progress(&progress);
                on_progress(progress);
            })
            .await;

        session.complete(&report)?;

        if let Some(msg) = report.success_message() {
            info!("{}", msg);
        }
        if let Some(msg) = report.failure_message() {
            warn!("{}", msg);
        }
        Ok(report)
    }
}

fn ensure_not_importing(session: &ImportSession) -> ApiResult<()> {
    if session.step() == ImportStep::Importing {
        return Err(ImportFailure::InvalidTransition {
            from: ImportStep::Importing.to_string(),
            to: ImportStep::Preview.to_string(),
        }
        .into());
    }
    Ok(())
}
