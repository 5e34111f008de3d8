/// Produces unique opaque tokens, used for both user ids and versions.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}
