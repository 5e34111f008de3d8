use crate::contract::model::User;
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

/// Why an optimistic-lock check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockConflict {
    /// No stored entity carries the requested id.
    NoSuchId,
    /// The stored version differs from the one the writer read.
    VersionMismatch { expected: String, actual: String },
}

/// Failures a repository reports. Conditions are distinguishable so the
/// service can map them onto not-found / conflict / internal.
#[derive(Error, Debug)]
pub enum RepoError {
    /// Caller broke a precondition (e.g. `insert` with an id already set).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("optimistic lock failure for {id}: {reason:?}")]
    OptimisticLock { id: String, reason: LockConflict },

    #[error("duplicate {field}: {value}")]
    DuplicateKey { field: String, value: String },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Implementations must make the version check and the replace in `update`
/// one atomic step per id: of two concurrent updates carrying the same
/// version exactly one wins.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Stream every stored user. Each call starts a fresh pass; order is
    /// implementation-defined.
    fn find_all(&self) -> BoxStream<'static, Result<User, RepoError>>;

    /// Load a user by id. Absence is `Ok(None)`, never an error.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError>;

    /// Store a new user. Requires `id` and `version` unset; returns the
    /// stored entity with both assigned.
    async fn insert(&self, user: User) -> Result<User, RepoError>;

    /// Replace an existing user if its stored version equals `user.version`.
    /// Returns the stored entity carrying a fresh version.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<(), RepoError>;
}
