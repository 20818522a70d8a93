// ==========================================
// Scorte - repository layer
// ==========================================
// Rule: repositories hold no business logic
// Constraint: all queries are parameterized
// ==========================================

pub mod error;
pub mod material_repo;
pub mod material_store;

pub use error::{RepositoryError, RepositoryResult};
pub use material_repo::MaterialRepository;
pub use material_store::MaterialStore;
