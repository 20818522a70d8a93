// ==========================================
// Scorte - import domain types
// ==========================================
// Transient records of one import session: canonical fields, candidate
// rows, row errors, progress, and the final report.
// ==========================================

use crate::domain::material::{MaterialInput, Supplier, DEFAULT_UNIT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// CanonicalField
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Name,
    AvailableQuantity,
    Unit,
    AverageDailyConsumption,
    SupplierLeadTimeDays,
    UnitCost,
    SupplierName,
    SupplierEmail,
    SupplierPhone,
    SupplierWebsite,
}

impl CanonicalField {
    /// Declaration order; also the order in which headers are bound.
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Name,
        CanonicalField::AvailableQuantity,
        CanonicalField::Unit,
        CanonicalField::AverageDailyConsumption,
        CanonicalField::SupplierLeadTimeDays,
        CanonicalField::UnitCost,
        CanonicalField::SupplierName,
        CanonicalField::SupplierEmail,
        CanonicalField::SupplierPhone,
        CanonicalField::SupplierWebsite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::AvailableQuantity => "availableQuantity",
            CanonicalField::Unit => "unit",
            CanonicalField::AverageDailyConsumption => "averageDailyConsumption",
            CanonicalField::SupplierLeadTimeDays => "supplierLeadTimeDays",
            CanonicalField::UnitCost => "unitCost",
            CanonicalField::SupplierName => "supplierName",
            CanonicalField::SupplierEmail => "supplierEmail",
            CanonicalField::SupplierPhone => "supplierPhone",
            CanonicalField::SupplierWebsite => "supplierWebsite",
        }
    }
}

// ==========================================
// ImportRow - normalized candidate record
// ==========================================
// `None` on the coercible numeric fields means "absent or unreadable";
// `Some(0)` means the sheet really said zero (or a negative was clamped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub name: String,
    pub available_quantity: f64,
    pub unit: String,
    pub average_daily_consumption: Option<f64>,
    pub supplier_lead_time_days: Option<u32>,
    pub unit_cost: Option<f64>,
    pub supplier: Option<Supplier>,
    /// 1-based row in the source file, header included.
    pub source_row_number: usize,
}

impl ImportRow {
    /// Create request for the persistence collaborator; absent numbers become 0.
    pub fn to_input(&self) -> MaterialInput {
        MaterialInput {
            name: self.name.clone(),
            available_quantity: self.available_quantity,
            unit: if self.unit.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                self.unit.clone()
            },
            average_daily_consumption: self.average_daily_consumption.unwrap_or(0.0),
            supplier_lead_time_days: self.supplier_lead_time_days.unwrap_or(0),
            unit_cost: self.unit_cost.unwrap_or(0.0),
            supplier: self.supplier.clone(),
        }
    }
}

// ==========================================
// ImportError - rejected row
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    pub row: usize,
    pub message: String,
}

// ==========================================
// ParsedImport - parser output
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedImport {
    pub valid_rows: Vec<ImportRow>,
    pub errors: Vec<ImportError>,
}

impl ParsedImport {
    pub fn total_rows(&self) -> usize {
        self.valid_rows.len() + self.errors.len()
    }
}

// ==========================================
// ImportProgress - emitted after every submission attempt
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub succeeded: usize,
    pub failed: usize,
}

impl ImportProgress {
    /// `round(100 * completed / total)`; an empty batch is complete.
    pub fn percent_of(completed: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        let pct = (completed.min(total) as f64 * 100.0 / total as f64).round();
        pct as u8
    }
}

// ==========================================
// ImportReport - reconciler outcome
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub progress: u8,
    /// Ids assigned by the store, in submission order.
    pub created_ids: Vec<String>,
    pub elapsed: Duration,
}

impl ImportReport {
    /// The caller's material list is stale as soon as one row landed.
    pub fn refresh_needed(&self) -> bool {
        self.succeeded > 0
    }

    pub fn success_message(&self) -> Option<String> {
        (self.succeeded > 0)
            .then(|| format!("Importati {} materiali con successo!", self.succeeded))
    }

    pub fn failure_message(&self) -> Option<String> {
        (self.failed > 0).then(|| format!("{} materiali non importati (errori)", self.failed))
    }
}
