// ==========================================
// Scorte - configuration layer
// ==========================================
// Storage: config_kv table, defaults in InventoryPolicy
// ==========================================

pub mod config_manager;
pub mod inventory_policy;
pub mod policy_reader;

pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
pub use inventory_policy::{InventoryPolicy, DEFAULT_MAX_UPLOAD_BYTES};
pub use policy_reader::PolicyReader;
