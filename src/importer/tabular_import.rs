// ==========================================
// Scorte - tabular import parser
// ==========================================
// payload -> RawTable -> ColumnMapping (once) -> RowValidator (per row)
// Output keeps source order among valid rows; the reconciler submits
// them in that order.
// ==========================================

use crate::domain::import::{ImportError, ParsedImport};
use crate::importer::column_mapper::{ColumnMapper, ColumnMapping};
use crate::importer::error::{ImportFailure, ImportResult};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::row_validator::{RowValidator, FAILURE_SEPARATOR};
use tracing::{info, instrument, warn};

/// Header row + 1-based indexing.
const SOURCE_ROW_OFFSET: usize = 2;

pub struct TabularImportParser {
    file_parser: UniversalFileParser,
    mapper: ColumnMapper,
    validator: RowValidator,
}

impl Default for TabularImportParser {
    fn default() -> Self {
        Self::new(RowValidator::default())
    }
}

impl TabularImportParser {
    pub fn new(validator: RowValidator) -> Self {
        Self {
            file_parser: UniversalFileParser,
            mapper: ColumnMapper::new(),
            validator,
        }
    }

    /// Decode and validate an uploaded payload.
    ///
    /// # Parameters
    /// - `file_name`: declared name, used to pick the decoder
    /// - `payload`: raw file bytes
    ///
    /// # Errors
    /// Fatal only: `Unreadable`, `Empty`, `KeyColumnMissing`
    /// (and `UnsupportedFormat` if the caller skipped the boundary check).
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    pub fn parse(&self, file_name: &str, payload: &[u8]) -> ImportResult<ParsedImport> {
        let table = self.file_parser.parse(file_name, payload).map_err(|e| {
            if let Some(detail) = e.detail() {
                warn!(detail, "payload could not be decoded");
            }
            e
        })?;

        let (mapping, parsed) = self.process_table(&table)?;

        info!(
            rows = table.rows.len(),
            valid = parsed.valid_rows.len(),
            errors = parsed.errors.len(),
            mapped_columns = mapping.mapped_count(),
            "import file parsed"
        );

        Ok(parsed)
    }

    /// Map and validate an already decoded table.
    pub fn process_table(&self, table: &RawTable) -> ImportResult<(ColumnMapping, ParsedImport)> {
        if table.is_empty() {
            return Err(ImportFailure::Empty);
        }

        let mapping = self.mapper.map_headers(&table.headers)?;

        let mut parsed = ParsedImport::default();
        for (idx, row) in table.rows.iter().enumerate() {
            let source_row_number = idx + SOURCE_ROW_OFFSET;
            match self.validator.validate(row, &mapping, source_row_number) {
                Ok(valid) => parsed.valid_rows.push(valid),
                Err(failures) => parsed.errors.push(ImportError {
                    row: source_row_number,
                    message: failures.join(FAILURE_SEPARATOR),
                }),
            }
        }

        Ok((mapping, parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_csv(text: &str) -> ImportResult<ParsedImport> {
        TabularImportParser::default().parse("magazzino.csv", text.as_bytes())
    }

    #[test]
    fn test_mixed_valid_and_invalid_rows() {
        let csv = "nome,quantita,consumo,giorni_consegna\n\
                   Cemento,100,10,5\n\
                   ,30,1,2\n\
                   Sabbia,abc,1,2\n\
                   Ghiaia,40,10,5\n";

        let parsed = parse_csv(csv).unwrap();

        let names: Vec<&str> = parsed.valid_rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cemento", "Ghiaia"]);
        assert_eq!(parsed.valid_rows[1].source_row_number, 5);

        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 3);
        assert_eq!(parsed.errors[0].message, "Nome mancante");
        assert_eq!(parsed.errors[1].row, 4);
        assert_eq!(parsed.errors[1].message, "Quantità non valida");
        assert_eq!(parsed.total_rows(), 4);
    }

    #[test]
    fn test_vernice_rejected_at_row_two() {
        let parsed = parse_csv("Descrizione,Qty,Unità\nVernice,,litri\n").unwrap();

        assert!(parsed.valid_rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert_eq!(parsed.errors[0].message, "Quantità non valida");
    }

    #[test]
    fn test_unit_and_unit_cost_columns_kept_apart() {
        let parsed = parse_csv("Nome,Quantita,UM,Costo unitario\nCemento,5,sacchi,4.5\n").unwrap();

        let row = &parsed.valid_rows[0];
        assert_eq!(row.unit, "sacchi");
        assert_eq!(row.unit_cost, Some(4.5));
    }

    #[test]
    fn test_windows_1252_csv() {
        let parsed = TabularImportParser::default()
            .parse("export.csv", b"Nome;Quantit\xe0;Unit\xe0\nCemento;5;sacchi\n")
            .unwrap();

        assert_eq!(parsed.valid_rows.len(), 1);
        assert_eq!(parsed.valid_rows[0].available_quantity, 5.0);
        assert_eq!(parsed.valid_rows[0].unit, "sacchi");
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let err = parse_csv("nome,quantita\n").unwrap_err();
        assert!(matches!(err, ImportFailure::Empty));
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        let err = parse_csv("codice,quantita\nA1,5\n").unwrap_err();
        assert!(matches!(err, ImportFailure::KeyColumnMissing));
    }

    #[test]
    fn test_unreadable_payload() {
        let err = TabularImportParser::default()
            .parse("magazzino.xlsx", b"not a workbook")
            .unwrap_err();
        assert!(matches!(err, ImportFailure::Unreadable(_)));
    }

    #[test]
    fn test_default_unit_from_validator() {
        let parser = TabularImportParser::new(RowValidator::new("kg"));
        let parsed = parser
            .parse("m.csv", "nome;quantita\nFarina;12,5\n".as_bytes())
            .unwrap();

        assert_eq!(parsed.valid_rows[0].unit, "kg");
        assert_eq!(parsed.valid_rows[0].available_quantity, 12.5);
    }
}
