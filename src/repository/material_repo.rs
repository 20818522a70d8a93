// ==========================================
// Scorte - material repository (SQLite)
// ==========================================
// Table: material
// Rule: no business logic here; entity invariants (numbers >= 0,
// default unit) are applied on write only.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::material::{Material, MaterialInput, MaterialPatch, Supplier};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::material_store::MaterialStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    id, name, available_quantity, unit, average_daily_consumption,
    supplier_lead_time_days, unit_cost,
    supplier_name, supplier_email, supplier_phone, supplier_website,
    created_at
"#;

/// `mat_` + 12 lowercase hex chars.
pub fn generate_material_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("mat_{}", &hex[..12])
}

fn corrupt_field(idx: usize, ty: Type, field: &str, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        ty,
        Box::new(RepositoryError::FieldValueError {
            field: field.to_string(),
            message,
        }),
    )
}

// ==========================================
// MaterialRepository
// ==========================================
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// # Parameters
    /// - db_path: database file path (schema must already exist)
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an already opened connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Stored values that cannot be turned back into a `Material` are
    /// reported as `FieldValueError`, never replaced.
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Material> {
        let lead_time: i64 = row.get(5)?;
        let supplier_lead_time_days = u32::try_from(lead_time).map_err(|_| {
            corrupt_field(
                5,
                Type::Integer,
                "supplier_lead_time_days",
                format!("fuori intervallo: {}", lead_time),
            )
        })?;

        let created_at_raw: String = row.get(11)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                corrupt_field(
                    11,
                    Type::Text,
                    "created_at",
                    format!("'{}' non è RFC 3339: {}", created_at_raw, e),
                )
            })?;

        let supplier = Supplier {
            name: row.get(7)?,
            email: row.get(8)?,
            phone: row.get(9)?,
            website: row.get(10)?,
        };

        Ok(Material {
            id: row.get(0)?,
            name: row.get(1)?,
            available_quantity: row.get(2)?,
            unit: row.get(3)?,
            average_daily_consumption: row.get(4)?,
            supplier_lead_time_days,
            unit_cost: row.get(6)?,
            supplier: supplier.normalized(),
            created_at,
        })
    }

    fn find_by_id(conn: &Connection, id: &str) -> RepositoryResult<Option<Material>> {
        let sql = format!("SELECT {} FROM material WHERE id = ?1", SELECT_COLUMNS);
        let material = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(material)
    }

    fn write_supplier(supplier: Option<&Supplier>) -> [Option<String>; 4] {
        match supplier {
            Some(s) => [
                s.name.clone(),
                s.email.clone(),
                s.phone.clone(),
                s.website.clone(),
            ],
            None => [None, None, None, None],
        }
    }
}

#[async_trait]
impl MaterialStore for MaterialRepository {
    async fn list_materials(&self) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM material ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let materials = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(materials)
    }

    async fn get_material(&self, id: &str) -> RepositoryResult<Material> {
        let conn = self.get_conn()?;
        Self::find_by_id(&conn, id)?.ok_or_else(|| RepositoryError::material_not_found(id))
    }

    async fn create_material(&self, input: MaterialInput) -> RepositoryResult<Material> {
        let input = input.normalized();
        if input.name.is_empty() {
            return Err(RepositoryError::InvalidInput("Nome mancante".to_string()));
        }

        let material = Material {
            id: generate_material_id(),
            name: input.name,
            available_quantity: input.available_quantity,
            unit: input.unit,
            average_daily_consumption: input.average_daily_consumption,
            supplier_lead_time_days: input.supplier_lead_time_days,
            unit_cost: input.unit_cost,
            supplier: input.supplier,
            created_at: Utc::now(),
        };
        let [s_name, s_email, s_phone, s_website] =
            Self::write_supplier(material.supplier.as_ref());

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO material (
                id, name, available_quantity, unit, average_daily_consumption,
                supplier_lead_time_days, unit_cost,
                supplier_name, supplier_email, supplier_phone, supplier_website,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                material.id,
                material.name,
                material.available_quantity,
                material.unit,
                material.average_daily_consumption,
                material.supplier_lead_time_days,
                material.unit_cost,
                s_name,
                s_email,
                s_phone,
                s_website,
                material.created_at.to_rfc3339(),
            ],
        )?;

        debug!(id = %material.id, name = %material.name, "material created");
        Ok(material)
    }

    async fn update_material(&self, id: &str, patch: MaterialPatch) -> RepositoryResult<Material> {
        if patch.is_empty() {
            return Err(RepositoryError::EmptyPatch);
        }

        let conn = self.get_conn()?;
        let mut material =
            Self::find_by_id(&conn, id)?.ok_or_else(|| RepositoryError::material_not_found(id))?;
        patch.apply_to(&mut material);

        let [s_name, s_email, s_phone, s_website] =
            Self::write_supplier(material.supplier.as_ref());
        conn.execute(
            r#"
            UPDATE material SET
                available_quantity = ?2,
                average_daily_consumption = ?3,
                supplier_lead_time_days = ?4,
                unit_cost = ?5,
                supplier_name = ?6,
                supplier_email = ?7,
                supplier_phone = ?8,
                supplier_website = ?9
            WHERE id = ?1
            "#,
            params![
                id,
                material.available_quantity,
                material.average_daily_consumption,
                material.supplier_lead_time_days,
                material.unit_cost,
                s_name,
                s_email,
                s_phone,
                s_website,
            ],
        )?;

        debug!(id, "material updated");
        Ok(material)
    }

    async fn delete_material(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM material WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::material_not_found(id));
        }
        debug!(id, "material deleted");
        Ok(())
    }
}
