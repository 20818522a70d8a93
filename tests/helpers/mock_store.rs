// ==========================================
// In-memory MaterialStore with failure injection
// ==========================================
// `fail_on` lists 1-based create-call numbers that return an error.
// ==========================================

use async_trait::async_trait;
use chrono::Utc;
use scorte::domain::{Material, MaterialInput, MaterialPatch};
use scorte::repository::{MaterialStore, RepositoryError, RepositoryResult};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockMaterialStore {
    fail_on: Vec<usize>,
    create_calls: Mutex<Vec<MaterialInput>>,
    materials: Mutex<Vec<Material>>,
}

impl MockMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            ..Self::default()
        }
    }

    /// Every create request received, in call order.
    pub fn create_calls(&self) -> Vec<MaterialInput> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Material> {
        self.materials.lock().unwrap().clone()
    }
}

#[async_trait]
impl MaterialStore for MockMaterialStore {
    async fn list_materials(&self) -> RepositoryResult<Vec<Material>> {
        Ok(self.stored())
    }

    async fn get_material(&self, id: &str) -> RepositoryResult<Material> {
        self.stored()
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| RepositoryError::material_not_found(id))
    }

    async fn create_material(&self, input: MaterialInput) -> RepositoryResult<Material> {
        let call_no = {
            let mut calls = self.create_calls.lock().unwrap();
            calls.push(input.clone());
            calls.len()
        };
        if self.fail_on.contains(&call_no) {
            return Err(RepositoryError::DatabaseConnectionError(format!(
                "injected failure on call {}",
                call_no
            )));
        }

        let input = input.normalized();
        let material = Material {
            id: format!("mat_{:012x}", call_no),
            name: input.name,
            available_quantity: input.available_quantity,
            unit: input.unit,
            average_daily_consumption: input.average_daily_consumption,
            supplier_lead_time_days: input.supplier_lead_time_days,
            unit_cost: input.unit_cost,
            supplier: input.supplier,
            created_at: Utc::now(),
        };
        self.materials.lock().unwrap().push(material.clone());
        Ok(material)
    }

    async fn update_material(&self, id: &str, patch: MaterialPatch) -> RepositoryResult<Material> {
        if patch.is_empty() {
            return Err(RepositoryError::EmptyPatch);
        }
        let mut materials = self.materials.lock().unwrap();
        let material = materials
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| RepositoryError::material_not_found(id))?;
        patch.apply_to(material);
        Ok(material.clone())
    }

    async fn delete_material(&self, id: &str) -> RepositoryResult<()> {
        let mut materials = self.materials.lock().unwrap();
        let before = materials.len();
        materials.retain(|m| m.id != id);
        if materials.len() == before {
            return Err(RepositoryError::material_not_found(id));
        }
        Ok(())
    }
}
