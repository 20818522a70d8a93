// ==========================================
// Scorte - column mapper
// ==========================================
// Source header -> canonical field binding.
// Matching is case-insensitive and accent-insensitive ("quantità" and
// "quantita" are the same header). Every variant is tried for an exact
// match first; only then is the first header containing a variant taken.
// ==========================================

use crate::domain::import::CanonicalField;
use crate::importer::error::{ImportFailure, ImportResult};
use std::collections::BTreeMap;
use tracing::{debug, warn};

// ==========================================
// Header variant table
// ==========================================
const NAME_VARIANTS: &[&str] = &["nome", "name", "descrizione", "materiale", "prodotto", "articolo"];
const QUANTITY_VARIANTS: &[&str] = &["quantita", "quantità", "qty", "disponibile", "quantita_disponibile"];
const UNIT_VARIANTS: &[&str] = &["unita", "unità", "um", "unita_misura", "unità_misura", "unit"];
const CONSUMPTION_VARIANTS: &[&str] = &[
    "consumo",
    "consumo_giornaliero",
    "consumo_medio",
    "consumo_medio_giornaliero",
];
const LEAD_TIME_VARIANTS: &[&str] = &["giorni_consegna", "consegna", "lead_time", "tempi_consegna"];
const COST_VARIANTS: &[&str] = &["costo", "prezzo", "costo_unitario", "prezzo_unitario"];
const SUPPLIER_NAME_VARIANTS: &[&str] = &["fornitore", "supplier", "vendor"];
const SUPPLIER_EMAIL_VARIANTS: &[&str] = &["email_fornitore", "fornitore_email", "email"];
const SUPPLIER_PHONE_VARIANTS: &[&str] = &["telefono_fornitore", "fornitore_telefono", "telefono", "tel"];
const SUPPLIER_WEBSITE_VARIANTS: &[&str] = &["sito_fornitore", "fornitore_sito", "sito", "website", "url"];

/// Accepted header variants for a canonical field, in priority order.
pub fn header_variants(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Name => NAME_VARIANTS,
        CanonicalField::AvailableQuantity => QUANTITY_VARIANTS,
        CanonicalField::Unit => UNIT_VARIANTS,
        CanonicalField::AverageDailyConsumption => CONSUMPTION_VARIANTS,
        CanonicalField::SupplierLeadTimeDays => LEAD_TIME_VARIANTS,
        CanonicalField::UnitCost => COST_VARIANTS,
        CanonicalField::SupplierName => SUPPLIER_NAME_VARIANTS,
        CanonicalField::SupplierEmail => SUPPLIER_EMAIL_VARIANTS,
        CanonicalField::SupplierPhone => SUPPLIER_PHONE_VARIANTS,
        CanonicalField::SupplierWebsite => SUPPLIER_WEBSITE_VARIANTS,
    }
}

/// Lower-case, strip accents, and turn blanks/dashes into underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' | 'ã' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            c if c.is_whitespace() || c == '-' => '_',
            c => c,
        })
        .collect()
}

// ==========================================
// ColumnMapping - canonical field -> source header
// ==========================================
// Built once per session from the header row; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    bindings: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    /// Source header bound to `field`, if any.
    pub fn header_for(&self, field: CanonicalField) -> Option<&str> {
        self.bindings.get(&field).map(String::as_str)
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.bindings.contains_key(&field)
    }

    pub fn mapped_count(&self) -> usize {
        self.bindings.len()
    }

    /// Headers claimed by more than one canonical field.
    ///
    /// Collisions are allowed; this is reported for the preview only.
    pub fn shared_headers(&self) -> Vec<(String, Vec<CanonicalField>)> {
        let mut by_header: BTreeMap<&str, Vec<CanonicalField>> = BTreeMap::new();
        for (field, header) in &self.bindings {
            by_header.entry(header.as_str()).or_default().push(*field);
        }
        by_header
            .into_iter()
            .filter(|(_, fields)| fields.len() > 1)
            .map(|(header, fields)| (header.to_string(), fields))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(CanonicalField, &str)]) -> Self {
        Self {
            bindings: pairs
                .iter()
                .map(|(field, header)| (*field, header.to_string()))
                .collect(),
        }
    }
}

// ==========================================
// ColumnMapper
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMapper;

impl ColumnMapper {
    pub fn new() -> Self {
        Self
    }

    /// Bind every canonical field independently, in declaration order.
    ///
    /// Two fields may end up on the same header; no conflict resolution.
    ///
    /// # Errors
    /// `KeyColumnMissing` when no header matches `name`.
    pub fn map_headers(&self, headers: &[String]) -> ImportResult<ColumnMapping> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

        let mut bindings = BTreeMap::new();
        for field in CanonicalField::ALL {
            if let Some(idx) = Self::find_column(&normalized, header_variants(field)) {
                if let Some(header) = headers.get(idx) {
                    bindings.insert(field, header.clone());
                }
            }
        }

        let mapping = ColumnMapping { bindings };
        if !mapping.is_mapped(CanonicalField::Name) {
            warn!(headers = ?headers, "no header matches the name column");
            return Err(ImportFailure::KeyColumnMissing);
        }

        for (header, fields) in mapping.shared_headers() {
            debug!(header = %header, fields = ?fields, "header bound to several fields");
        }
        debug!(mapped = mapping.mapped_count(), "column mapping built");

        Ok(mapping)
    }

    /// Index of the matching header: an exact match on any variant wins over
    /// a containment match. Within each pass, variants are tried in order.
    fn find_column(normalized_headers: &[String], variants: &[&str]) -> Option<usize> {
        let variants: Vec<String> = variants.iter().map(|v| normalize_header(v)).collect();

        let exact = variants
            .iter()
            .find_map(|variant| normalized_headers.iter().position(|h| h == variant));
        exact.or_else(|| {
            variants.iter().find_map(|variant| {
                normalized_headers
                    .iter()
                    .position(|h| h.contains(variant.as_str()))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_italian_headers() {
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&[
                "Nome",
                "Quantità",
                "UM",
                "Consumo medio",
                "Giorni consegna",
                "Costo unitario",
                "Fornitore",
                "Email fornitore",
                "Telefono",
                "Sito",
            ]))
            .unwrap();

        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Nome"));
        assert_eq!(mapping.header_for(CanonicalField::AvailableQuantity), Some("Quantità"));
        assert_eq!(mapping.header_for(CanonicalField::Unit), Some("UM"));
        assert_eq!(
            mapping.header_for(CanonicalField::AverageDailyConsumption),
            Some("Consumo medio")
        );
        assert_eq!(
            mapping.header_for(CanonicalField::SupplierLeadTimeDays),
            Some("Giorni consegna")
        );
        assert_eq!(mapping.header_for(CanonicalField::UnitCost), Some("Costo unitario"));
        assert_eq!(mapping.header_for(CanonicalField::SupplierEmail), Some("Email fornitore"));
        assert_eq!(mapping.header_for(CanonicalField::SupplierPhone), Some("Telefono"));
        assert_eq!(mapping.header_for(CanonicalField::SupplierWebsite), Some("Sito"));
    }

    #[test]
    fn test_accent_insensitive() {
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["articolo", "QUANTITA'"]))
            .unwrap();
        assert_eq!(mapping.header_for(CanonicalField::AvailableQuantity), Some("QUANTITA'"));

        assert_eq!(normalize_header(" Unità Misura "), "unita_misura");
    }

    #[test]
    fn test_exact_match_preferred_over_substring() {
        // "nome_fornitore" contains "nome", but "nome" matches exactly
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["nome_fornitore", "nome", "qty"]))
            .unwrap();
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("nome"));
    }

    #[test]
    fn test_later_exact_variant_beats_earlier_substring() {
        // "costo_unitario" contains "unita", but "UM" is an exact unit variant
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["Nome", "Quantita", "Costo unitario", "UM"]))
            .unwrap();
        assert_eq!(mapping.header_for(CanonicalField::Unit), Some("UM"));
        assert_eq!(mapping.header_for(CanonicalField::UnitCost), Some("Costo unitario"));
    }

    #[test]
    fn test_substring_used_when_no_exact_variant() {
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["Nome articolo", "Quantita in magazzino"]))
            .unwrap();
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Nome articolo"));
        assert_eq!(
            mapping.header_for(CanonicalField::AvailableQuantity),
            Some("Quantita in magazzino")
        );
    }

    #[test]
    fn test_shared_header_is_permitted() {
        // "fornitore_email" contains "fornitore" and is also the email column
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["prodotto", "fornitore_email"]))
            .unwrap();

        assert_eq!(mapping.header_for(CanonicalField::SupplierName), Some("fornitore_email"));
        assert_eq!(mapping.header_for(CanonicalField::SupplierEmail), Some("fornitore_email"));
        assert_eq!(mapping.shared_headers().len(), 1);
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let err = ColumnMapper::new()
            .map_headers(&headers(&["qty", "unit"]))
            .unwrap_err();
        assert!(matches!(err, ImportFailure::KeyColumnMissing));
    }

    #[test]
    fn test_unmapped_optional_fields() {
        let mapping = ColumnMapper::new()
            .map_headers(&headers(&["Descrizione", "Qty", "Unità"]))
            .unwrap();
        assert_eq!(mapping.header_for(CanonicalField::Name), Some("Descrizione"));
        assert!(!mapping.is_mapped(CanonicalField::UnitCost));
        assert!(!mapping.is_mapped(CanonicalField::SupplierName));
        assert_eq!(mapping.mapped_count(), 3);
    }
}
