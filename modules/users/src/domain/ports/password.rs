use crate::domain::error::DomainError;

/// One-way password encoding.
pub trait PasswordEncoder: Send + Sync {
    /// Encode a plaintext password for storage.
    fn encode(&self, raw: &str) -> Result<String, DomainError>;

    /// Check a plaintext password against a stored encoding.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}
