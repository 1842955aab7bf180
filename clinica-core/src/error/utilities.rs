//! Conversions shared by the stores, services and builders
//!
//! Store implementations surface driver errors of many shapes; these traits
//! fold them into [`StorageError`] so callers only ever see [`Error`].

use crate::{
    Error,
    error::{StorageError, ValidationError},
};

/// Fold a driver error into [`StorageError::Database`]
///
/// ```rust,ignore
/// use clinica_core::error::utilities::DatabaseResultExt;
///
/// sqlx::query("DELETE FROM personas WHERE id = ?1")
///     .bind(id)
///     .execute(&pool)
///     .await
///     .map_db_err_with_context("Failed to delete persona")?;
/// ```
pub trait DatabaseResultExt<T> {
    fn map_db_err(self) -> Result<T, Error>;

    /// Same as [`map_db_err`](Self::map_db_err), prefixing the message with `context`
    fn map_db_err_with_context(self, context: &str) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> DatabaseResultExt<T> for Result<T, E> {
    fn map_db_err(self) -> Result<T, Error> {
        self.map_err(|e| StorageError::Database(e.to_string()).into())
    }

    fn map_db_err_with_context(self, context: &str) -> Result<T, Error> {
        self.map_err(|e| StorageError::Database(format!("{context}: {e}")).into())
    }
}

/// Turn a missing record into [`StorageError::NotFound`] naming the entity
pub trait FoundExt<T> {
    fn or_not_found(self, entity: &str) -> Result<T, Error>;
}

impl<T> FoundExt<T> for Option<T> {
    fn or_not_found(self, entity: &str) -> Result<T, Error> {
        self.ok_or_else(|| Error::not_found(entity))
    }
}

/// Used by the builders: a field left unset becomes [`ValidationError::MissingField`]
pub trait RequiredFieldExt<T> {
    fn require_field(self, field_name: &str) -> Result<T, ValidationError>;
}

impl<T> RequiredFieldExt<T> for Option<T> {
    fn require_field(self, field_name: &str) -> Result<T, ValidationError> {
        self.ok_or_else(|| ValidationError::MissingField(format!("{field_name} is required")))
    }
}
