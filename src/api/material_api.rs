// ==========================================
// Scorte - material API
// ==========================================
// Material CRUD for the dashboard. Every read goes through the engine so
// status and reorder advice always reflect the current stored values.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::policy_reader::PolicyReader;
use crate::domain::material::{MaterialInput, MaterialPatch, MaterialView};
use crate::engine::overview::{InventoryAnalyzer, InventoryOverview};
use crate::importer::row_validator::{MSG_NAME_MISSING, MSG_QUANTITY_INVALID};
use crate::repository::material_store::MaterialStore;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct MaterialApi {
    store: Arc<dyn MaterialStore>,
    policy: Arc<dyn PolicyReader>,
}

impl MaterialApi {
    pub fn new(store: Arc<dyn MaterialStore>, policy: Arc<dyn PolicyReader>) -> Self {
        Self { store, policy }
    }

    async fn analyzer(&self) -> ApiResult<InventoryAnalyzer> {
        let buffer = self.policy.get_safety_buffer_days().await?;
        Ok(InventoryAnalyzer::new(buffer))
    }

    /// All materials with derived status, remaining days and reorder advice.
    pub async fn list_materials(&self) -> ApiResult<Vec<MaterialView>> {
        let materials = self.store.list_materials().await?;
        Ok(self.analyzer().await?.views(&materials))
    }

    pub async fn get_material(&self, id: &str) -> ApiResult<MaterialView> {
        let material = self.store.get_material(id).await?;
        Ok(self.analyzer().await?.view(&material))
    }

    /// Status counts plus the critical (`orderNow`) list.
    pub async fn get_overview(&self) -> ApiResult<InventoryOverview> {
        let materials = self.store.list_materials().await?;
        Ok(self.analyzer().await?.overview(&materials))
    }

    /// # Errors
    /// `InvalidInput` for a blank name or an unusable quantity.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn add_material(&self, input: MaterialInput) -> ApiResult<MaterialView> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidInput(MSG_NAME_MISSING.to_string()));
        }
        validate_quantity(input.available_quantity)?;

        let material = self.store.create_material(input).await?;
        info!(id = %material.id, "material added");
        Ok(self.analyzer().await?.view(&material))
    }

    /// Stock count correction.
    pub async fn update_quantity(&self, id: &str, available_quantity: f64) -> ApiResult<MaterialView> {
        validate_quantity(available_quantity)?;
        self.update_material(id, MaterialPatch::quantity(available_quantity))
            .await
    }

    /// # Errors
    /// - `InvalidInput`: empty patch ("Nessun campo da aggiornare")
    /// - `NotFound`: unknown id
    pub async fn update_material(&self, id: &str, patch: MaterialPatch) -> ApiResult<MaterialView> {
        let material = self.store.update_material(id, patch).await?;
        Ok(self.analyzer().await?.view(&material))
    }

    pub async fn delete_material(&self, id: &str) -> ApiResult<()> {
        self.store.delete_material(id).await?;
        info!(id, "material deleted");
        Ok(())
    }
}

fn validate_quantity(quantity: f64) -> ApiResult<()> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(MSG_QUANTITY_INVALID.to_string()))
    }
}
