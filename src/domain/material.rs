// ==========================================
// Scorte - material domain model
// ==========================================
// Material entity, write inputs, and the derived view the dashboard reads.
// Derived fields (status, remaining days, reorder advice) are never stored.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit label used when a material has none.
pub const DEFAULT_UNIT: &str = "pz";

/// Clamp a real number into the entity's numeric domain (finite, >= 0).
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ==========================================
// Supplier
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// How an operator should reach the supplier when stock is critical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum ContactChannel {
    Email(String),
    Phone(String),
    Website(String),
}

impl ContactChannel {
    /// Link for the contact button: `mailto:` carries the order subject.
    pub fn link(&self, material_name: &str) -> String {
        match self {
            ContactChannel::Email(address) => {
                format!("mailto:{}?subject=Ordine {}", address, material_name)
            }
            ContactChannel::Phone(number) => format!("tel:{}", number),
            ContactChannel::Website(url) => url.clone(),
        }
    }
}

impl Supplier {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.website.is_none()
    }

    /// Blank strings become `None`; a supplier with no field left collapses to `None`.
    pub fn normalized(self) -> Option<Self> {
        let supplier = Supplier {
            name: clean_optional(self.name),
            email: clean_optional(self.email),
            phone: clean_optional(self.phone),
            website: clean_optional(self.website),
        };
        if supplier.is_empty() {
            None
        } else {
            Some(supplier)
        }
    }

    /// First available channel: email, then phone, then website.
    pub fn preferred_contact(&self) -> Option<ContactChannel> {
        if let Some(email) = &self.email {
            return Some(ContactChannel::Email(email.clone()));
        }
        if let Some(phone) = &self.phone {
            return Some(ContactChannel::Phone(phone.clone()));
        }
        self.website.clone().map(ContactChannel::Website)
    }
}

pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// ==========================================
// Material - persisted entity
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    pub available_quantity: f64,
    pub unit: String,
    pub average_daily_consumption: f64,
    pub supplier_lead_time_days: u32,
    pub unit_cost: f64,
    pub supplier: Option<Supplier>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// MaterialInput - create request
// ==========================================
// Canonical field set minus id and derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    pub name: String,
    pub available_quantity: f64,
    pub unit: String,
    pub average_daily_consumption: f64,
    pub supplier_lead_time_days: u32,
    pub unit_cost: f64,
    pub supplier: Option<Supplier>,
}

impl MaterialInput {
    pub fn new(name: impl Into<String>, available_quantity: f64) -> Self {
        Self {
            name: name.into(),
            available_quantity,
            unit: DEFAULT_UNIT.to_string(),
            average_daily_consumption: 0.0,
            supplier_lead_time_days: 0,
            unit_cost: 0.0,
            supplier: None,
        }
    }

    /// Apply the entity invariants: numbers >= 0, unit defaults to "pz",
    /// empty supplier collapses to `None`.
    pub fn normalized(self) -> Self {
        let unit = self.unit.trim();
        Self {
            name: self.name.trim().to_string(),
            available_quantity: non_negative(self.available_quantity),
            unit: if unit.is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                unit.to_string()
            },
            average_daily_consumption: non_negative(self.average_daily_consumption),
            supplier_lead_time_days: self.supplier_lead_time_days,
            unit_cost: non_negative(self.unit_cost),
            supplier: self.supplier.and_then(Supplier::normalized),
        }
    }
}

// ==========================================
// MaterialPatch - partial update
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPatch {
    pub available_quantity: Option<f64>,
    pub average_daily_consumption: Option<f64>,
    pub supplier_lead_time_days: Option<u32>,
    pub unit_cost: Option<f64>,
    pub supplier_name: Option<String>,
    pub supplier_email: Option<String>,
    pub supplier_phone: Option<String>,
    pub supplier_website: Option<String>,
}

impl MaterialPatch {
    pub fn quantity(available_quantity: f64) -> Self {
        Self {
            available_quantity: Some(available_quantity),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available_quantity.is_none()
            && self.average_daily_consumption.is_none()
            && self.supplier_lead_time_days.is_none()
            && self.unit_cost.is_none()
            && self.supplier_name.is_none()
            && self.supplier_email.is_none()
            && self.supplier_phone.is_none()
            && self.supplier_website.is_none()
    }

    /// Overwrite only the fields present in the patch.
    pub fn apply_to(&self, material: &mut Material) {
        if let Some(q) = self.available_quantity {
            material.available_quantity = non_negative(q);
        }
        if let Some(c) = self.average_daily_consumption {
            material.average_daily_consumption = non_negative(c);
        }
        if let Some(days) = self.supplier_lead_time_days {
            material.supplier_lead_time_days = days;
        }
        if let Some(cost) = self.unit_cost {
            material.unit_cost = non_negative(cost);
        }

        let touches_supplier = self.supplier_name.is_some()
            || self.supplier_email.is_some()
            || self.supplier_phone.is_some()
            || self.supplier_website.is_some();
        if touches_supplier {
            let mut supplier = material.supplier.take().unwrap_or_default();
            if let Some(name) = &self.supplier_name {
                supplier.name = Some(name.clone());
            }
            if let Some(email) = &self.supplier_email {
                supplier.email = Some(email.clone());
            }
            if let Some(phone) = &self.supplier_phone {
                supplier.phone = Some(phone.clone());
            }
            if let Some(website) = &self.supplier_website {
                supplier.website = Some(website.clone());
            }
            material.supplier = supplier.normalized();
        }
    }
}

// ==========================================
// StockStatus - operational risk tier
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StockStatus {
    Ok,
    Attention,
    OrderNow,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Ok => "ok",
            StockStatus::Attention => "attention",
            StockStatus::OrderNow => "orderNow",
        }
    }

    /// Card title shown on the warehouse page.
    pub fn title(&self) -> &'static str {
        match self {
            StockStatus::Ok => "Scorte Sufficienti",
            StockStatus::Attention => "In Esaurimento",
            StockStatus::OrderNow => "Rischio Fermo Operativo",
        }
    }

    /// Elevated tiers get reorder advice.
    pub fn is_elevated(&self) -> bool {
        matches!(self, StockStatus::Attention | StockStatus::OrderNow)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// MaterialView - entity + derived fields
// ==========================================
// Computed on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: Material,
    pub status: StockStatus,
    /// One decimal place; `None` when there is no consumption data.
    pub remaining_days: Option<f64>,
    pub recommended_order_quantity: Option<u64>,
    pub impact_estimate: Option<f64>,
    pub contact: Option<ContactChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_material() -> Material {
        Material {
            id: "mat_000000000001".to_string(),
            name: "Cemento".to_string(),
            available_quantity: 100.0,
            unit: "sacchi".to_string(),
            average_daily_consumption: 10.0,
            supplier_lead_time_days: 5,
            unit_cost: 4.5,
            supplier: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_input_normalized_coerces_negatives() {
        let mut input = MaterialInput::new("  Sabbia ", -3.0);
        input.unit = "   ".to_string();
        input.average_daily_consumption = f64::NAN;
        input.unit_cost = -1.0;

        let input = input.normalized();

        assert_eq!(input.name, "Sabbia");
        assert_eq!(input.available_quantity, 0.0);
        assert_eq!(input.unit, DEFAULT_UNIT);
        assert_eq!(input.average_daily_consumption, 0.0);
        assert_eq!(input.unit_cost, 0.0);
    }

    #[test]
    fn test_supplier_blank_collapses_to_none() {
        let supplier = Supplier {
            name: Some("  ".to_string()),
            email: Some(String::new()),
            phone: None,
            website: None,
        };
        assert_eq!(supplier.normalized(), None);
    }

    #[test]
    fn test_preferred_contact_order() {
        let supplier = Supplier {
            name: Some("Edilcentro".to_string()),
            email: None,
            phone: Some("+39 02 1234".to_string()),
            website: Some("https://edilcentro.it".to_string()),
        };
        assert_eq!(
            supplier.preferred_contact(),
            Some(ContactChannel::Phone("+39 02 1234".to_string()))
        );

        let channel = ContactChannel::Email("ordini@edilcentro.it".to_string());
        assert_eq!(
            channel.link("Cemento"),
            "mailto:ordini@edilcentro.it?subject=Ordine Cemento"
        );
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut material = sample_material();
        let patch = MaterialPatch {
            available_quantity: Some(40.0),
            supplier_email: Some("ordini@edilcentro.it".to_string()),
            ..MaterialPatch::default()
        };

        patch.apply_to(&mut material);

        assert_eq!(material.available_quantity, 40.0);
        assert_eq!(material.average_daily_consumption, 10.0);
        let supplier = material.supplier.expect("supplier should be created");
        assert_eq!(supplier.email.as_deref(), Some("ordini@edilcentro.it"));
        assert_eq!(supplier.name, None);
    }

    #[test]
    fn test_empty_patch() {
        assert!(MaterialPatch::default().is_empty());
        assert!(!MaterialPatch::quantity(1.0).is_empty());
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_string(&StockStatus::OrderNow).unwrap();
        assert_eq!(json, "\"orderNow\"");
    }
}
