// ==========================================
// Scorte - stock status classifier
// ==========================================
// Input: available quantity, daily consumption, supplier lead time
// Output: ok / attention / orderNow
// Pure and stateless; recomputed on every read.
// ==========================================

use crate::domain::material::{Material, StockStatus};

/// Days added to the lead time before a material counts as safe.
pub const DEFAULT_SAFETY_BUFFER_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockStatusClassifier {
    safety_buffer_days: u32,
}

impl Default for StockStatusClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_BUFFER_DAYS)
    }
}

impl StockStatusClassifier {
    pub fn new(safety_buffer_days: u32) -> Self {
        Self { safety_buffer_days }
    }

    pub fn safety_buffer_days(&self) -> u32 {
        self.safety_buffer_days
    }

    /// Days of stock left; `None` when there is no consumption data.
    pub fn remaining_days(available_quantity: f64, average_daily_consumption: f64) -> Option<f64> {
        if average_daily_consumption <= 0.0 || !average_daily_consumption.is_finite() {
            return None;
        }
        Some(available_quantity.max(0.0) / average_daily_consumption)
    }

    pub fn classify(&self, material: &Material) -> StockStatus {
        self.classify_values(
            material.available_quantity,
            material.average_daily_consumption,
            material.supplier_lead_time_days,
        )
    }

    /// # Rules
    /// - no consumption -> ok
    /// - remaining <= lead -> orderNow
    /// - lead < remaining <= lead + buffer -> attention
    /// - otherwise ok
    pub fn classify_values(
        &self,
        available_quantity: f64,
        average_daily_consumption: f64,
        supplier_lead_time_days: u32,
    ) -> StockStatus {
        let Some(remaining) = Self::remaining_days(available_quantity, average_daily_consumption)
        else {
            return StockStatus::Ok;
        };

        let lead = f64::from(supplier_lead_time_days);
        let buffered = lead + f64::from(self.safety_buffer_days);

        if remaining <= lead {
            StockStatus::OrderNow
        } else if remaining <= buffered {
            StockStatus::Attention
        } else {
            StockStatus::Ok
        }
    }
}
