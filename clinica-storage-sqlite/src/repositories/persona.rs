use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use clinica_core::{
    Error, Genero, NewPersona, Persona, PersonaId,
    error::{
        StorageError,
        utilities::{DatabaseResultExt, FoundExt},
    },
    repositories::PersonaRepository,
};
use sqlx::{Executor, Sqlite, SqlitePool};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqlitePersona {
    id: i64,
    nombre: String,
    apellido_paterno: String,
    apellido_materno: String,
    telefono: Option<String>,
    fecha_nacimiento: NaiveDate,
    genero: String,
    direccion: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqlitePersona> for Persona {
    type Error = Error;

    fn try_from(row: SqlitePersona) -> Result<Self, Self::Error> {
        let genero = row.genero.parse::<Genero>().map_err(|e| {
            StorageError::Database(format!("Corrupt genero in persona {}: {e}", row.id))
        })?;

        Persona::builder()
            .id(PersonaId::new(row.id))
            .data(NewPersona {
                nombre: row.nombre,
                apellido_paterno: row.apellido_paterno,
                apellido_materno: row.apellido_materno,
                telefono: row.telefono,
                fecha_nacimiento: row.fecha_nacimiento,
                genero,
                direccion: row.direccion,
            })
            .created_at(from_timestamp(row.created_at))
            .updated_at(from_timestamp(row.updated_at))
            .build()
    }
}

pub(crate) fn from_timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

/// Insert a persona through any executor, so the same statement serves the
/// pool and an open transaction
pub(crate) async fn insert_persona<'e, E>(
    executor: E,
    persona: NewPersona,
) -> Result<Persona, Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now().timestamp();

    let row = sqlx::query_as::<_, SqlitePersona>(
        r#"
        INSERT INTO personas (nombre, apellido_paterno, apellido_materno, telefono,
                              fecha_nacimiento, genero, direccion, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        RETURNING *
        "#,
    )
    .bind(&persona.nombre)
    .bind(&persona.apellido_paterno)
    .bind(&persona.apellido_materno)
    .bind(&persona.telefono)
    .bind(persona.fecha_nacimiento)
    .bind(persona.genero.as_str())
    .bind(&persona.direccion)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_db_err_with_context("Failed to create persona")?;

    row.try_into()
}

#[derive(Debug)]
pub struct SqlitePersonaRepository {
    pool: SqlitePool,
}

impl SqlitePersonaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonaRepository for SqlitePersonaRepository {
    async fn exists(&self, id: PersonaId) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM personas WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_db_err()?;

        Ok(count > 0)
    }

    async fn find_by_id(&self, id: PersonaId) -> Result<Option<Persona>, Error> {
        let row = sqlx::query_as::<_, SqlitePersona>("SELECT * FROM personas WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_db_err()?;

        row.map(Persona::try_from).transpose()
    }

    async fn create(&self, persona: NewPersona) -> Result<Persona, Error> {
        insert_persona(&self.pool, persona).await
    }

    async fn update(&self, id: PersonaId, persona: NewPersona) -> Result<Persona, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqlitePersona>(
            r#"
            UPDATE personas
            SET nombre = ?2, apellido_paterno = ?3, apellido_materno = ?4, telefono = ?5,
                fecha_nacimiento = ?6, genero = ?7, direccion = ?8, updated_at = ?9
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id.as_i64())
        .bind(&persona.nombre)
        .bind(&persona.apellido_paterno)
        .bind(&persona.apellido_materno)
        .bind(&persona.telefono)
        .bind(persona.fecha_nacimiento)
        .bind(persona.genero.as_str())
        .bind(&persona.direccion)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to update persona")?;

        row.or_not_found("Persona")?.try_into()
    }

    async fn delete(&self, id: PersonaId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM personas WHERE id = ?1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to delete persona")?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Persona"));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Persona>, Error> {
        let rows = sqlx::query_as::<_, SqlitePersona>("SELECT * FROM personas ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_db_err()?;

        rows.into_iter().map(Persona::try_from).collect()
    }
}
