//! PostgreSQL implementation of the write-through archive.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::{RequirementRow, SubscriberRow};
use crate::config::GatewayConfig;
use crate::domain::ids::{EventId, RequirementId, SubscriberId};
use crate::domain::model::{Event, JobRequirement, Subscriber};
use crate::error::GatewayError;

/// PostgreSQL-backed archive using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresArchive {
    pool: PgPool,
}

impl PostgresArchive {
    /// Creates an archive with an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the configured database settings and ensures the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] when the connection or
    /// schema setup fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        let archive = Self::new(pool);
        archive.ensure_schema().await?;
        Ok(archive)
    }

    /// Creates the archive tables when they do not exist yet. The unique
    /// index on (event_id, identity_number) mirrors the registry's
    /// uniqueness invariant at the storage level.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), GatewayError> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS events (\
                id UUID PRIMARY KEY,\
                title TEXT NOT NULL,\
                description TEXT NOT NULL,\
                date DATE NOT NULL,\
                location TEXT NOT NULL,\
                accepting_applications BOOLEAN NOT NULL,\
                published BOOLEAN NOT NULL,\
                completed BOOLEAN NOT NULL,\
                created_at TIMESTAMPTZ NOT NULL\
            )",
            "CREATE TABLE IF NOT EXISTS requirements (\
                id UUID PRIMARY KEY,\
                event_id UUID NOT NULL,\
                job_id TEXT NOT NULL,\
                job_name TEXT NOT NULL,\
                daily_rate DOUBLE PRECISION NOT NULL,\
                created_at TIMESTAMPTZ NOT NULL\
            )",
            "CREATE TABLE IF NOT EXISTS subscribers (\
                id UUID PRIMARY KEY,\
                event_id UUID NOT NULL,\
                requirement_id UUID,\
                name TEXT NOT NULL,\
                mobile TEXT NOT NULL,\
                email TEXT NOT NULL,\
                identity_number TEXT NOT NULL,\
                document_type TEXT NOT NULL,\
                id_expiry_date DATE,\
                birth_date DATE NOT NULL,\
                age INTEGER NOT NULL,\
                gender TEXT NOT NULL,\
                city TEXT NOT NULL,\
                nationality TEXT NOT NULL,\
                iban TEXT NOT NULL,\
                bank_name TEXT NOT NULL,\
                account_holder TEXT NOT NULL,\
                id_document_url TEXT NOT NULL,\
                photo_url TEXT NOT NULL,\
                accepted BOOLEAN NOT NULL DEFAULT FALSE,\
                registered_at TIMESTAMPTZ NOT NULL,\
                UNIQUE (event_id, identity_number)\
            )",
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        }
        Ok(())
    }

    /// Upserts an event row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn save_event(&self, event: &Event) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO events (id, title, description, date, location, \
             accepting_applications, published, completed, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
             title = EXCLUDED.title, description = EXCLUDED.description, \
             date = EXCLUDED.date, location = EXCLUDED.location, \
             accepting_applications = EXCLUDED.accepting_applications, \
             published = EXCLUDED.published, completed = EXCLUDED.completed",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.accepting_applications)
        .bind(event.published)
        .bind(event.completed)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Inserts a subscriber row. A violation of the unique
    /// (event_id, identity_number) index is remapped to
    /// [`GatewayError::DuplicateIdentity`] so the archive speaks the
    /// same error vocabulary as the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateIdentity`] on an identity
    /// collision, [`GatewayError::Persistence`] on other failures.
    pub async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), GatewayError> {
        let row = SubscriberRow::from(subscriber);
        sqlx::query(
            "INSERT INTO subscribers (id, event_id, requirement_id, name, mobile, email, \
             identity_number, document_type, id_expiry_date, birth_date, age, gender, city, \
             nationality, iban, bank_name, account_holder, id_document_url, photo_url, \
             accepted, registered_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21)",
        )
        .bind(row.id)
        .bind(row.event_id)
        .bind(row.requirement_id)
        .bind(&row.name)
        .bind(&row.mobile)
        .bind(&row.email)
        .bind(&row.identity_number)
        .bind(&row.document_type)
        .bind(row.id_expiry_date)
        .bind(row.birth_date)
        .bind(row.age)
        .bind(&row.gender)
        .bind(&row.city)
        .bind(&row.nationality)
        .bind(&row.iban)
        .bind(&row.bank_name)
        .bind(&row.account_holder)
        .bind(&row.id_document_url)
        .bind(&row.photo_url)
        .bind(row.accepted)
        .bind(row.registered_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    /// Applies one acceptance value to a batch of subscriber rows in a
    /// single statement. Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn set_accepted(
        &self,
        ids: &[SubscriberId],
        accepted: bool,
    ) -> Result<u64, GatewayError> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query("UPDATE subscribers SET accepted = $1 WHERE id = ANY($2)")
            .bind(accepted)
            .bind(&uuids)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Deletes a subscriber row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn delete_subscriber(&self, id: SubscriberId) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Upserts a requirement row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn save_requirement(
        &self,
        event_id: EventId,
        requirement: &JobRequirement,
    ) -> Result<(), GatewayError> {
        let row = RequirementRow::from_requirement(event_id, requirement);
        sqlx::query(
            "INSERT INTO requirements (id, event_id, job_id, job_name, daily_rate, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET daily_rate = EXCLUDED.daily_rate",
        )
        .bind(row.id)
        .bind(row.event_id)
        .bind(&row.job_id)
        .bind(&row.job_name)
        .bind(row.daily_rate)
        .bind(row.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Updates the daily rate of a requirement row.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn update_requirement_rate(
        &self,
        id: RequirementId,
        daily_rate: f64,
    ) -> Result<(), GatewayError> {
        sqlx::query("UPDATE requirements SET daily_rate = $1 WHERE id = $2")
            .bind(daily_rate)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Replaces all requirement rows of an event with the given set and
    /// clears subscriber references to requirements no longer present.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn sync_requirements(
        &self,
        event_id: EventId,
        requirements: &[JobRequirement],
    ) -> Result<(), GatewayError> {
        let keep: Vec<Uuid> = requirements.iter().map(|r| *r.id.as_uuid()).collect();
        sqlx::query(
            "UPDATE subscribers SET requirement_id = NULL \
             WHERE event_id = $1 AND requirement_id IS NOT NULL \
             AND NOT (requirement_id = ANY($2))",
        )
        .bind(event_id.as_uuid())
        .bind(&keep)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        sqlx::query("DELETE FROM requirements WHERE event_id = $1 AND NOT (id = ANY($2))")
            .bind(event_id.as_uuid())
            .bind(&keep)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        for requirement in requirements {
            self.save_requirement(event_id, requirement).await?;
        }
        Ok(())
    }

    /// Deletes a requirement row and clears references to it.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn delete_requirement(&self, id: RequirementId) -> Result<(), GatewayError> {
        sqlx::query("UPDATE subscribers SET requirement_id = NULL WHERE requirement_id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        sqlx::query("DELETE FROM requirements WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }
}

/// Maps a subscriber-insert failure, surfacing unique-index violations
/// as the duplicate-identity error.
fn map_insert_error(e: sqlx::Error) -> GatewayError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return GatewayError::DuplicateIdentity;
    }
    GatewayError::Persistence(e.to_string())
}
