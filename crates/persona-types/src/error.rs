use thiserror::Error;

/// Errors from repository operations (used by trait definitions in persona-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors returned by the profile editor.
///
/// Validation failures are not errors: they live on the draft as
/// [`FieldError`](crate::draft::FieldError) values.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("storage failure: {0}")]
    Storage(#[source] RepositoryError),

    #[error("profile editor is closed")]
    Closed,

    #[error("profile write interrupted: {0}")]
    Interrupted(String),
}
