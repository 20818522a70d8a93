// ==========================================
// Scorte - material store trait
// ==========================================
// Persistence collaborator consumed by the import reconciler and the API.
// Implementors: MaterialRepository (rusqlite), test doubles.
// No business rules here: status/reorder are computed by the engine.
// ==========================================

use crate::domain::material::{Material, MaterialInput, MaterialPatch};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// All materials, oldest first.
    async fn list_materials(&self) -> RepositoryResult<Vec<Material>>;

    /// # Errors
    /// `NotFound` for an unknown id.
    async fn get_material(&self, id: &str) -> RepositoryResult<Material>;

    /// Persist a new material; the store assigns `id` and `created_at`.
    ///
    /// # Errors
    /// `InvalidInput` when the name is blank.
    async fn create_material(&self, input: MaterialInput) -> RepositoryResult<Material>;

    /// Apply a partial update and return the stored result.
    ///
    /// # Errors
    /// - `EmptyPatch`: nothing to change
    /// - `NotFound`: unknown id
    async fn update_material(&self, id: &str, patch: MaterialPatch) -> RepositoryResult<Material>;

    /// # Errors
    /// `NotFound` for an unknown id.
    async fn delete_material(&self, id: &str) -> RepositoryResult<()>;
}
