use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invite code collision")]
    InviteCodeCollision,

    #[error("could not generate a unique invite code")]
    GenerationExhausted,

    #[error("invite code already used")]
    AlreadyUsed,

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("membership request pending approval")]
    PendingApproval,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("rank does not allow this action")]
    InsufficientRank,

    #[error("join request removed but invite code {0} was not released")]
    OrphanedInvite(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
