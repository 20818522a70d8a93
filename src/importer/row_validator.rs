// ==========================================
// Scorte - row validator
// ==========================================
// One raw row + the session's ColumnMapping -> ImportRow or failures.
// Only a missing name and an unusable quantity reject a row; every other
// numeric field is coerced (negative -> 0, unreadable -> absent).
// ==========================================

use crate::domain::import::{CanonicalField, ImportRow};
use crate::domain::material::{clean_optional, Supplier, DEFAULT_UNIT};
use crate::importer::column_mapper::ColumnMapping;
use crate::importer::file_parser::RawRow;

pub const MSG_NAME_MISSING: &str = "Nome mancante";
pub const MSG_QUANTITY_INVALID: &str = "Quantità non valida";

/// Separator used when a row carries several failures.
pub const FAILURE_SEPARATOR: &str = ", ";

/// Outcome for a single row: never both a row and failures.
pub type RowOutcome = Result<ImportRow, Vec<String>>;

#[derive(Debug, Clone)]
pub struct RowValidator {
    default_unit: String,
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}

impl RowValidator {
    pub fn new(default_unit: impl Into<String>) -> Self {
        Self {
            default_unit: default_unit.into(),
        }
    }

    /// Validate one row.
    ///
    /// # Parameters
    /// - `row`: raw cells keyed by source header
    /// - `mapping`: header binding built once for the session
    /// - `source_row_number`: 1-based file row (data index + 2)
    ///
    /// # Returns
    /// The normalized row, or every fatal failure found on it in rule order.
    pub fn validate(
        &self,
        row: &RawRow,
        mapping: &ColumnMapping,
        source_row_number: usize,
    ) -> RowOutcome {
        let cell = |field: CanonicalField| {
            mapping
                .header_for(field)
                .and_then(|header| row.get(header))
                .map(|value| value.trim())
        };

        let mut failures = Vec::new();

        // rule 1: name
        let name = cell(CanonicalField::Name).unwrap_or_default();
        if name.is_empty() {
            failures.push(MSG_NAME_MISSING.to_string());
        }

        // rule 2: quantity
        let available_quantity = match cell(CanonicalField::AvailableQuantity).and_then(parse_number)
        {
            Some(qty) if qty >= 0.0 => qty,
            _ => {
                failures.push(MSG_QUANTITY_INVALID.to_string());
                0.0
            }
        };

        if !failures.is_empty() {
            return Err(failures);
        }

        // rule 3: unit
        let unit = match cell(CanonicalField::Unit) {
            Some(unit) if !unit.is_empty() => unit.to_string(),
            _ => self.default_unit.clone(),
        };

        // rules 4-5: lenient numerics
        let average_daily_consumption = cell(CanonicalField::AverageDailyConsumption)
            .and_then(parse_number)
            .map(clamp_negative);
        let unit_cost = cell(CanonicalField::UnitCost)
            .and_then(parse_number)
            .map(clamp_negative);
        let supplier_lead_time_days = cell(CanonicalField::SupplierLeadTimeDays)
            .and_then(parse_number)
            .map(whole_days);

        // rule 6: supplier sub-fields
        let text = |field| clean_optional(cell(field).map(str::to_string));
        let supplier = Supplier {
            name: text(CanonicalField::SupplierName),
            email: text(CanonicalField::SupplierEmail),
            phone: text(CanonicalField::SupplierPhone),
            website: text(CanonicalField::SupplierWebsite),
        }
        .normalized();

        Ok(ImportRow {
            name: name.to_string(),
            available_quantity,
            unit,
            average_daily_consumption,
            supplier_lead_time_days,
            unit_cost,
            supplier,
            source_row_number,
        })
    }
}

/// Parse a spreadsheet number. Accepts a decimal comma ("12,5").
/// Blank, non-numeric and non-finite cells are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    candidate.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn clamp_negative(value: f64) -> f64 {
    value.max(0.0)
}

/// Truncate to whole days; negatives become 0.
fn whole_days(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else {
        value.trunc().min(u32::MAX as f64) as u32
    }
}
