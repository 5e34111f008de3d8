use crate::domain::error::DomainError;
use crate::domain::ports::PasswordEncoder;

const BCRYPT_ID: &str = "{bcrypt}";

/// bcrypt encoder. Stored values carry a `{bcrypt}` prefix so another
/// scheme can be introduced later without ambiguity.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, DomainError> {
        let hash = bcrypt::hash(raw, self.cost)
            .map_err(|e| DomainError::internal(format!("password encoding failed: {e}")))?;
        Ok(format!("{BCRYPT_ID}{hash}"))
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        match encoded.strip_prefix(BCRYPT_ID) {
            Some(hash) => bcrypt::verify(raw, hash).unwrap_or(false),
            None => false,
        }
    }
}
