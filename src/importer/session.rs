// ==========================================
// Scorte - import session state machine
// ==========================================
// upload -> preview -> importing -> upload
//
// - preview can be cancelled or replaced by a new upload
// - importing cannot be cancelled; it ends with `complete`
// - the session is owned by the caller and passed by &mut to each transition
// ==========================================

use crate::domain::import::{ImportError, ImportProgress, ImportReport, ImportRow, ParsedImport};
use crate::importer::error::{ImportFailure, ImportResult};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportStep {
    Upload,
    Preview,
    Importing,
}

impl ImportStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStep::Upload => "upload",
            ImportStep::Preview => "preview",
            ImportStep::Importing => "importing",
        }
    }
}

impl std::fmt::Display for ImportStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the operator sees before confirming.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub file_name: String,
    pub valid_count: usize,
    pub error_count: usize,
    pub valid_rows: Vec<ImportRow>,
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Clone)]
pub struct ImportSession {
    step: ImportStep,
    file_name: Option<String>,
    parsed: ParsedImport,
    progress: u8,
    importing_total: usize,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession {
    pub fn new() -> Self {
        Self {
            step: ImportStep::Upload,
            file_name: None,
            parsed: ParsedImport::default(),
            progress: 0,
            importing_total: 0,
        }
    }

    pub fn step(&self) -> ImportStep {
        self.step
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn valid_rows(&self) -> &[ImportRow] {
        &self.parsed.valid_rows
    }

    pub fn errors(&self) -> &[ImportError] {
        &self.parsed.errors
    }

    /// Rows handed to the reconciler by `begin_import`.
    pub fn importing_total(&self) -> usize {
        self.importing_total
    }

    fn invalid(&self, to: ImportStep) -> ImportFailure {
        ImportFailure::InvalidTransition {
            from: self.step.to_string(),
            to: to.to_string(),
        }
    }

    /// upload|preview -> preview. A new upload replaces the previous preview.
    pub fn load_preview(&mut self, file_name: &str, parsed: ParsedImport) -> ImportResult<()> {
        if self.step == ImportStep::Importing {
            return Err(self.invalid(ImportStep::Preview));
        }
        debug!(
            file_name,
            valid = parsed.valid_rows.len(),
            errors = parsed.errors.len(),
            "import preview loaded"
        );
        self.file_name = Some(file_name.to_string());
        self.parsed = parsed;
        self.progress = 0;
        self.step = ImportStep::Preview;
        Ok(())
    }

    pub fn preview(&self) -> Option<ImportPreview> {
        if self.step != ImportStep::Preview {
            return None;
        }
        Some(ImportPreview {
            file_name: self.file_name.clone().unwrap_or_default(),
            valid_count: self.parsed.valid_rows.len(),
            error_count: self.parsed.errors.len(),
            valid_rows: self.parsed.valid_rows.clone(),
            errors: self.parsed.errors.clone(),
        })
    }

    /// upload|preview -> upload. Not allowed once importing has started.
    pub fn cancel(&mut self) -> ImportResult<()> {
        if self.step == ImportStep::Importing {
            return Err(self.invalid(ImportStep::Upload));
        }
        self.reset();
        Ok(())
    }

    /// preview -> importing. Returns the rows to submit, in source order.
    ///
    /// # Errors
    /// - `NothingToImport`: the preview has no valid row (session stays in preview)
    /// - `InvalidTransition`: not in preview
    pub fn begin_import(&mut self) -> ImportResult<Vec<ImportRow>> {
        if self.step != ImportStep::Preview {
            return Err(self.invalid(ImportStep::Importing));
        }
        if self.parsed.valid_rows.is_empty() {
            return Err(ImportFailure::NothingToImport);
        }

        let rows = std::mem::take(&mut self.parsed.valid_rows);
        self.importing_total = rows.len();
        self.progress = 0;
        self.step = ImportStep::Importing;
        Ok(rows)
    }

    /// Track reconciler progress. Ignored outside `importing`; never decreases.
    pub fn record_progress(&mut self, progress: &ImportProgress) {
        if self.step != ImportStep::Importing {
            return;
        }
        self.progress = self.progress.max(progress.percent);
    }

    /// importing -> upload.
    pub fn complete(&mut self, report: &ImportReport) -> ImportResult<()> {
        if self.step != ImportStep::Importing {
            return Err(self.invalid(ImportStep::Upload));
        }
        debug!(
            succeeded = report.succeeded,
            failed = report.failed,
            "import session completed"
        );
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
