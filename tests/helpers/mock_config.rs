// ==========================================
// Mock policy reader for integration tests
// ==========================================

use async_trait::async_trait;
use scorte::config::{ConfigResult, InventoryPolicy, PolicyReader};

#[derive(Debug, Clone)]
pub struct MockPolicy {
    pub policy: InventoryPolicy,
}

impl MockPolicy {
    pub fn new() -> Self {
        Self {
            policy: InventoryPolicy::default(),
        }
    }

    pub fn with_max_upload_bytes(mut self, max: u64) -> Self {
        self.policy.max_upload_bytes = max;
        self
    }

    pub fn with_safety_buffer_days(mut self, days: u32) -> Self {
        self.policy.safety_buffer_days = days;
        self
    }
}

#[async_trait]
impl PolicyReader for MockPolicy {
    async fn get_safety_buffer_days(&self) -> ConfigResult<u32> {
        Ok(self.policy.safety_buffer_days)
    }

    async fn get_max_upload_bytes(&self) -> ConfigResult<u64> {
        Ok(self.policy.max_upload_bytes)
    }

    async fn get_default_unit(&self) -> ConfigResult<String> {
        Ok(self.policy.default_unit.clone())
    }
}
