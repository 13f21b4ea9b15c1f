use super::domain::{Profile, ScholarshipRecord, UserId};

/// Profile lookup backed by the portal's user store.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, user: &UserId) -> Result<Option<Profile>, StoreError>;
}

/// Catalog lookup. Implementations must return records in a stable order; the
/// ranker uses that order as its final tie-break.
pub trait ScholarshipCatalog: Send + Sync {
    fn list(&self) -> Result<Vec<ScholarshipRecord>, StoreError>;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is malformed: {0}")]
    Malformed(String),
}
