// ==========================================
// Scorte - policy reader trait
// ==========================================
// Read-only access to the inventory policy.
// Implementors: ConfigManager (config_kv table), test doubles.
// ==========================================

use crate::config::config_manager::ConfigResult;
use crate::config::inventory_policy::InventoryPolicy;
use async_trait::async_trait;

#[async_trait]
pub trait PolicyReader: Send + Sync {
    /// Days added to the lead time before stock counts as safe.
    ///
    /// # Default
    /// - 3
    async fn get_safety_buffer_days(&self) -> ConfigResult<u32>;

    /// Upload ceiling in bytes.
    ///
    /// # Default
    /// - 5 MiB
    async fn get_max_upload_bytes(&self) -> ConfigResult<u64>;

    /// Unit assigned to imported rows with a blank unit.
    ///
    /// # Default
    /// - "pz"
    async fn get_default_unit(&self) -> ConfigResult<String>;

    /// Whole policy in one call.
    async fn load_policy(&self) -> ConfigResult<InventoryPolicy> {
        Ok(InventoryPolicy {
            safety_buffer_days: self.get_safety_buffer_days().await?,
            max_upload_bytes: self.get_max_upload_bytes().await?,
            default_unit: self.get_default_unit().await?,
            ..InventoryPolicy::default()
        })
    }
}
