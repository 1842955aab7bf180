use async_trait::async_trait;
use chrono::Utc;
use clinica_migration::{
    Migration, MigrationError, MigrationManager, MigrationRecord, check_versions,
};
use sqlx::{Database, Sqlite, SqlitePool};

/// Every migration of the clinica schema, in version order
pub fn all() -> Vec<Box<dyn Migration<Sqlite>>> {
    vec![
        Box::new(CreatePersonasTable),
        Box::new(CreateUsuariosTable),
        Box::new(CreateIndexes),
    ]
}

pub struct SqliteMigrationManager {
    pool: SqlitePool,
}

impl SqliteMigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MigrationManager<Sqlite> for SqliteMigrationManager {
    async fn initialize(&self) -> Result<(), MigrationError> {
        sqlx::query(
            format!(
                r#"
            CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            );"#,
                self.get_migration_table_name()
            )
            .as_str(),
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn up(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        check_versions(migrations)?;
        let mut ordered: Vec<_> = migrations.iter().collect();
        ordered.sort_by_key(|m| m.version());

        for migration in ordered {
            if self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Applying migration"
            );

            migration
                .up(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(
                format!(
                    "INSERT INTO {} (version, name, applied_at) VALUES (?, ?, ?)",
                    self.get_migration_table_name()
                )
                .as_str(),
            )
            .bind(migration.version())
            .bind(migration.name())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    async fn down(&self, migrations: &[Box<dyn Migration<Sqlite>>]) -> Result<(), MigrationError> {
        check_versions(migrations)?;
        let mut ordered: Vec<_> = migrations.iter().collect();
        ordered.sort_by_key(|m| std::cmp::Reverse(m.version()));

        for migration in ordered {
            if !self.is_applied(migration.version()).await? {
                continue;
            }

            let mut tx = self.pool.begin().await?;

            tracing::info!(
                version = migration.version(),
                name = migration.name(),
                "Rolling back migration"
            );

            migration
                .down(&mut *tx as &mut <Sqlite as Database>::Connection)
                .await?;

            sqlx::query(
                format!(
                    "DELETE FROM {} WHERE version = ?",
                    self.get_migration_table_name()
                )
                .as_str(),
            )
            .bind(migration.version())
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }
        Ok(())
    }

    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>, MigrationError> {
        let records = sqlx::query_as::<_, MigrationRecord>(
            format!(
                "SELECT version, name, applied_at FROM {} ORDER BY version",
                self.get_migration_table_name()
            )
            .as_str(),
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn is_applied(&self, version: i64) -> Result<bool, MigrationError> {
        let result: bool = sqlx::query_scalar(
            format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE version = ?)",
                self.get_migration_table_name()
            )
            .as_str(),
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;
        Ok(result)
    }
}

pub struct CreatePersonasTable;

#[async_trait]
impl Migration<Sqlite> for CreatePersonasTable {
    fn version(&self) -> i64 {
        1
    }

    fn name(&self) -> &str {
        "CreatePersonasTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS personas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nombre TEXT NOT NULL,
                apellido_paterno TEXT NOT NULL,
                apellido_materno TEXT NOT NULL,
                telefono TEXT,
                fecha_nacimiento TEXT NOT NULL,
                genero TEXT NOT NULL CHECK (genero IN ('masculino', 'femenino', 'otro')),
                direccion TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS personas")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateUsuariosTable;

#[async_trait]
impl Migration<Sqlite> for CreateUsuariosTable {
    fn version(&self) -> i64 {
        2
    }

    fn name(&self) -> &str {
        "CreateUsuariosTable"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usuarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                persona_id INTEGER NOT NULL REFERENCES personas(id) ON DELETE CASCADE,
                rol TEXT NOT NULL DEFAULT 'paciente'
                    CHECK (rol IN ('paciente', 'medico', 'administrador')),
                correo TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(correo)
            );"#,
        )
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP TABLE IF EXISTS usuarios")
            .execute(conn)
            .await?;
        Ok(())
    }
}

pub struct CreateIndexes;

#[async_trait]
impl Migration<Sqlite> for CreateIndexes {
    fn version(&self) -> i64 {
        3
    }

    fn name(&self) -> &str {
        "CreateIndexes"
    }

    async fn up<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        // One account per persona
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_usuarios_persona_id ON usuarios(persona_id)",
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_personas_apellidos ON personas(apellido_paterno, apellido_materno)",
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn down<'a>(
        &'a self,
        conn: &'a mut <Sqlite as Database>::Connection,
    ) -> Result<(), MigrationError> {
        sqlx::query("DROP INDEX IF EXISTS idx_usuarios_persona_id")
            .execute(&mut *conn)
            .await?;
        sqlx::query("DROP INDEX IF EXISTS idx_personas_apellidos")
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_up_is_idempotent() {
        let manager = SqliteMigrationManager::new(pool().await);
        manager.initialize().await.unwrap();

        manager.up(&all()).await.unwrap();
        manager.up(&all()).await.unwrap();

        let applied = manager.get_applied_migrations().await.unwrap();
        let versions: Vec<_> = applied.iter().map(|r| r.version).collect();
        assert_eq!(versions, [1, 2, 3]);
        assert_eq!(applied[0].name, "CreatePersonasTable");
    }

    #[tokio::test]
    async fn test_down_reverts_everything() {
        let pool = pool().await;
        let manager = SqliteMigrationManager::new(pool.clone());
        manager.initialize().await.unwrap();
        manager.up(&all()).await.unwrap();

        manager.down(&all()).await.unwrap();
        assert!(manager.get_applied_migrations().await.unwrap().is_empty());

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('personas', 'usuarios')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 0);
    }

    #[tokio::test]
    async fn test_duplicate_versions_are_rejected() {
        let manager = SqliteMigrationManager::new(pool().await);
        manager.initialize().await.unwrap();

        let migrations: Vec<Box<dyn Migration<Sqlite>>> =
            vec![Box::new(CreatePersonasTable), Box::new(CreatePersonasTable)];
        assert!(manager.up(&migrations).await.is_err());
        assert!(!manager.is_applied(1).await.unwrap());
    }
}
