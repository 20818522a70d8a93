// ==========================================
// Scorte - inventory policy
// ==========================================
// Tunables of the stock rules and the upload boundary.
// Defaults apply when config_kv holds no override.
// ==========================================

use crate::domain::material::DEFAULT_UNIT;
use crate::engine::stock_status::DEFAULT_SAFETY_BUFFER_DAYS;
use crate::importer::file_parser::FileKind;
use serde::{Deserialize, Serialize};

/// 5 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPolicy {
    pub safety_buffer_days: u32,
    pub max_upload_bytes: u64,
    pub default_unit: String,
    pub accepted_extensions: Vec<String>,
}

impl Default for InventoryPolicy {
    fn default() -> Self {
        Self {
            safety_buffer_days: DEFAULT_SAFETY_BUFFER_DAYS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            default_unit: DEFAULT_UNIT.to_string(),
            accepted_extensions: FileKind::ACCEPTED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}
