// Reference-entity repository
//
// Machines, procedures, and users are external entities the engine treats as
// opaque foreign keys. Their business CRUD lives elsewhere; this repository
// exposes only the existence probes the engine needs, plus inserts used by
// bootstrap and tests.

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{Machine, Procedure, User};
use tracing::instrument;
use uuid::Uuid;

/// Repository for the entities schedules reference by id
#[derive(Clone)]
pub struct ReferenceRepository {
    pool: DbPool,
}

impl ReferenceRepository {
    /// Create a new ReferenceRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self))]
    pub async fn machine_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM machines WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.pool())
                .await?;
        Ok(exists)
    }

    #[instrument(skip(self))]
    pub async fn procedure_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM procedures WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.pool())
                .await?;
        Ok(exists)
    }

    #[instrument(skip(self))]
    pub async fn user_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool.pool())
            .await?;
        Ok(exists)
    }

    #[instrument(skip(self, machine))]
    pub async fn create_machine(&self, machine: &Machine) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO machines (id, name, is_active, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(machine.id)
        .bind(&machine.name)
        .bind(machine.is_active)
        .bind(machine.created_at)
        .execute(self.pool.pool())
        .await?;
        Ok(())
    }

    #[instrument(skip(self, procedure))]
    pub async fn create_procedure(&self, procedure: &Procedure) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO procedures (id, title, is_active, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(procedure.id)
        .bind(&procedure.title)
        .bind(procedure.is_active)
        .bind(procedure.created_at)
        .execute(self.pool.pool())
        .await?;
        Ok(())
    }

    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, username, is_active, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(self.pool.pool())
        .await?;
        Ok(())
    }
}
