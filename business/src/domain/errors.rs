/// Local store errors for the domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository.not_found")]
    NotFound,
    #[error("repository.persistence")]
    Persistence,
    #[error("repository.database_error")]
    DatabaseError,
    /// A stored row could not be turned back into a valid cart line.
    #[error("repository.corrupted")]
    Corrupted,
}

impl RepositoryError {
    pub fn not_found() -> Self {
        RepositoryError::NotFound
    }
    pub fn persistence() -> Self {
        RepositoryError::Persistence
    }
    pub fn database_error() -> Self {
        RepositoryError::DatabaseError
    }
    pub fn corrupted() -> Self {
        RepositoryError::Corrupted
    }
}
