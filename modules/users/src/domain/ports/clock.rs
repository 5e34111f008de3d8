use chrono::{DateTime, Utc};

/// Source of the current instant. Injected so permission grant dates and
/// birthdate checks are deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
