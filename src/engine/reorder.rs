// ==========================================
// Scorte - reorder calculator
// ==========================================
// recommended = ceil(consumption * (lead + buffer) - available)
// impact      = consumption * lead * unit cost   (orderNow only)
// Both are advisory and never persisted.
// ==========================================

use crate::domain::material::{Material, StockStatus};
use crate::engine::stock_status::DEFAULT_SAFETY_BUFFER_DAYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderCalculator {
    safety_buffer_days: u32,
}

impl Default for ReorderCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_BUFFER_DAYS)
    }
}

impl ReorderCalculator {
    pub fn new(safety_buffer_days: u32) -> Self {
        Self { safety_buffer_days }
    }

    /// Quantity to order so stock covers lead time plus buffer.
    ///
    /// # Returns
    /// - `Some(n)` with n >= 1 for elevated materials that are short
    /// - `None` when not elevated, data is missing, or stock already covers the window
    pub fn recommended_quantity(&self, material: &Material, status: StockStatus) -> Option<u64> {
        if !status.is_elevated()
            || material.average_daily_consumption <= 0.0
            || material.supplier_lead_time_days == 0
        {
            return None;
        }

        let window_days =
            f64::from(material.supplier_lead_time_days) + f64::from(self.safety_buffer_days);
        let shortfall = material.average_daily_consumption * window_days - material.available_quantity;
        let qty = shortfall.ceil();

        if qty >= 1.0 && qty.is_finite() {
            Some(qty as u64)
        } else {
            None
        }
    }

    /// Money at risk if the stockout lasts the whole lead time.
    ///
    /// Present for every `orderNow` material with a unit cost, even when the
    /// product is 0 (no lead time or no consumption).
    pub fn impact_estimate(&self, material: &Material, status: StockStatus) -> Option<f64> {
        if status != StockStatus::OrderNow || material.unit_cost <= 0.0 {
            return None;
        }
        Some(
            material.average_daily_consumption
                * f64::from(material.supplier_lead_time_days)
                * material.unit_cost,
        )
    }
}
