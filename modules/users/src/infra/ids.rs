use uuid::Uuid;

use crate::domain::ports::IdGenerator;

/// Random (v4) UUID tokens in hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
