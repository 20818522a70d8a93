// ==========================================
// Scorte - inventory overview
// ==========================================
// Material -> MaterialView (status, remaining days, reorder advice,
// supplier contact) and the warehouse-wide summary built from the views.
// ==========================================

use crate::domain::material::{Material, MaterialView, StockStatus};
use crate::engine::reorder::ReorderCalculator;
use crate::engine::stock_status::{StockStatusClassifier, DEFAULT_SAFETY_BUFFER_DAYS};
use serde::Serialize;

/// Warehouse summary for the dashboard and critical-stock alerts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    pub total: usize,
    pub ok_count: usize,
    pub attention_count: usize,
    pub order_now_count: usize,
    /// `orderNow` materials, in list order.
    pub critical: Vec<MaterialView>,
    /// Sum of the critical materials' impact estimates.
    pub total_impact: f64,
}

impl InventoryOverview {
    pub fn has_critical(&self) -> bool {
        !self.critical.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InventoryAnalyzer {
    classifier: StockStatusClassifier,
    calculator: ReorderCalculator,
}

impl Default for InventoryAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_BUFFER_DAYS)
    }
}

impl InventoryAnalyzer {
    pub fn new(safety_buffer_days: u32) -> Self {
        Self {
            classifier: StockStatusClassifier::new(safety_buffer_days),
            calculator: ReorderCalculator::new(safety_buffer_days),
        }
    }

    /// Attach the derived fields to one material.
    pub fn view(&self, material: &Material) -> MaterialView {
        let status = self.classifier.classify(material);
        let remaining_days = StockStatusClassifier::remaining_days(
            material.available_quantity,
            material.average_daily_consumption,
        )
        .map(round_one_decimal);

        let contact = if status == StockStatus::OrderNow {
            material
                .supplier
                .as_ref()
                .and_then(|s| s.preferred_contact())
        } else {
            None
        };

        MaterialView {
            material: material.clone(),
            status,
            remaining_days,
            recommended_order_quantity: self.calculator.recommended_quantity(material, status),
            impact_estimate: self.calculator.impact_estimate(material, status),
            contact,
        }
    }

    pub fn views(&self, materials: &[Material]) -> Vec<MaterialView> {
        materials.iter().map(|m| self.view(m)).collect()
    }

    pub fn overview(&self, materials: &[Material]) -> InventoryOverview {
        let views = self.views(materials);

        let count = |status: StockStatus| views.iter().filter(|v| v.status == status).count();
        let ok_count = count(StockStatus::Ok);
        let attention_count = count(StockStatus::Attention);
        let order_now_count = count(StockStatus::OrderNow);

        let critical: Vec<MaterialView> = views
            .into_iter()
            .filter(|v| v.status == StockStatus::OrderNow)
            .collect();
        let total_impact = critical.iter().filter_map(|v| v.impact_estimate).sum();

        InventoryOverview {
            total: materials.len(),
            ok_count,
            attention_count,
            order_now_count,
            critical,
            total_impact,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
