use async_trait::async_trait;
use chrono::Utc;
use clinica_core::{
    Error, NewUsuario, PersonaId, Rol, Usuario, UsuarioId,
    error::{
        StorageError,
        utilities::{DatabaseResultExt, FoundExt},
    },
    repositories::UsuarioRepository,
};
use sqlx::{Executor, Sqlite, SqlitePool};

use super::persona::from_timestamp;

/// Every usuario column except the password hash
const USUARIO_COLUMNS: &str = "id, persona_id, rol, correo, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteUsuario {
    id: i64,
    persona_id: i64,
    rol: String,
    correo: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SqliteUsuario> for Usuario {
    type Error = Error;

    fn try_from(row: SqliteUsuario) -> Result<Self, Self::Error> {
        let rol = row.rol.parse::<Rol>().map_err(|e| {
            StorageError::Database(format!("Corrupt rol in usuario {}: {e}", row.id))
        })?;

        Usuario::builder()
            .id(UsuarioId::new(row.id))
            .persona_id(PersonaId::new(row.persona_id))
            .rol(rol)
            .correo(row.correo)
            .created_at(from_timestamp(row.created_at))
            .updated_at(from_timestamp(row.updated_at))
            .build()
    }
}

/// Map a failed usuario write, turning constraint violations into domain errors
pub(crate) fn map_usuario_write_err(error: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return if db.message().contains("persona_id") {
                Error::conflict("Persona already has a usuario")
            } else {
                Error::conflict("Email already registered")
            };
        }
        if db.is_foreign_key_violation() {
            return Error::not_found("Persona");
        }
    }
    StorageError::Database(format!("Failed to write usuario: {error}")).into()
}

pub(crate) async fn insert_usuario<'e, E>(
    executor: E,
    usuario: NewUsuario,
) -> Result<Usuario, Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now().timestamp();

    let row = sqlx::query_as::<_, SqliteUsuario>(&format!(
        r#"
        INSERT INTO usuarios (persona_id, rol, correo, password_hash, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        RETURNING {USUARIO_COLUMNS}
        "#
    ))
    .bind(usuario.persona_id.as_i64())
    .bind(usuario.rol.as_str())
    .bind(&usuario.correo)
    .bind(&usuario.password_hash)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(map_usuario_write_err)?;

    row.try_into()
}

#[derive(Debug)]
pub struct SqliteUsuarioRepository {
    pool: SqlitePool,
}

impl SqliteUsuarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepository for SqliteUsuarioRepository {
    async fn exists_by_correo(&self, correo: &str) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE correo = ?1")
            .bind(correo)
            .fetch_one(&self.pool)
            .await
            .map_db_err()?;

        Ok(count > 0)
    }

    async fn exists_by_persona_id(&self, persona_id: PersonaId) -> Result<bool, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE persona_id = ?1")
                .bind(persona_id.as_i64())
                .fetch_one(&self.pool)
                .await
                .map_db_err()?;

        Ok(count > 0)
    }

    async fn find_by_id(&self, id: UsuarioId) -> Result<Option<Usuario>, Error> {
        let row = sqlx::query_as::<_, SqliteUsuario>(&format!(
            "SELECT {USUARIO_COLUMNS} FROM usuarios WHERE id = ?1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_db_err()?;

        row.map(Usuario::try_from).transpose()
    }

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Usuario>, Error> {
        let row = sqlx::query_as::<_, SqliteUsuario>(&format!(
            "SELECT {USUARIO_COLUMNS} FROM usuarios WHERE correo = ?1"
        ))
        .bind(correo)
        .fetch_optional(&self.pool)
        .await
        .map_db_err()?;

        row.map(Usuario::try_from).transpose()
    }

    async fn get_password_hash(&self, id: UsuarioId) -> Result<Option<String>, Error> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM usuarios WHERE id = ?1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_db_err()
    }

    async fn create(&self, usuario: NewUsuario) -> Result<Usuario, Error> {
        insert_usuario(&self.pool, usuario).await
    }

    async fn update(&self, id: UsuarioId, usuario: NewUsuario) -> Result<Usuario, Error> {
        let now = Utc::now().timestamp();

        let row = sqlx::query_as::<_, SqliteUsuario>(&format!(
            r#"
            UPDATE usuarios
            SET persona_id = ?2, rol = ?3, correo = ?4, password_hash = ?5, updated_at = ?6
            WHERE id = ?1
            RETURNING {USUARIO_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(usuario.persona_id.as_i64())
        .bind(usuario.rol.as_str())
        .bind(&usuario.correo)
        .bind(&usuario.password_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_usuario_write_err)?;

        row.or_not_found("Usuario")?.try_into()
    }

    async fn delete(&self, id: UsuarioId) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = ?1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_db_err_with_context("Failed to delete usuario")?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Usuario"));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Usuario>, Error> {
        let rows = sqlx::query_as::<_, SqliteUsuario>(&format!(
            "SELECT {USUARIO_COLUMNS} FROM usuarios ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_db_err()?;

        rows.into_iter().map(Usuario::try_from).collect()
    }
}
