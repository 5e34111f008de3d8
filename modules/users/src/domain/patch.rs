//! Patch dispatch: handlers that each understand a slice of the patch space,
//! chained so the first one that recognizes a patch wins.

use std::sync::Arc;

use crate::contract::model::Patch;
use crate::domain::error::DomainError;

/// Result of offering a patch to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome<T> {
    /// The handler recognized the patch and produced the new target.
    Applied(T),
    /// The handler does not deal with this operation/path.
    Declined,
}

impl<T> PatchOutcome<T> {
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Declined => None,
        }
    }
}

/// A unit of patch logic. Handlers never mutate `target`; they return a
/// replacement value, decline, or fail when they recognize the patch but its
/// payload is unusable.
pub trait PatchHandler<T>: Send + Sync {
    fn try_apply(&self, patch: &Patch, target: &T) -> Result<PatchOutcome<T>, DomainError>;
}

/// Ordered chain of handlers. The first handler that applies or fails
/// short-circuits the rest; if all decline, the chain declines.
pub struct CompositePatchHandler<T> {
    handlers: Vec<Arc<dyn PatchHandler<T>>>,
}

impl<T> CompositePatchHandler<T> {
    pub fn new(handlers: Vec<Arc<dyn PatchHandler<T>>>) -> Self {
        Self { handlers }
    }

    /// Register another handler after the existing ones.
    pub fn with_handler(mut self, handler: Arc<dyn PatchHandler<T>>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for CompositePatchHandler<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> PatchHandler<T> for CompositePatchHandler<T> {
    fn try_apply(&self, patch: &Patch, target: &T) -> Result<PatchOutcome<T>, DomainError> {
        for handler in &self.handlers {
            if let PatchOutcome::Applied(new_target) = handler.try_apply(patch, target)? {
                return Ok(PatchOutcome::Applied(new_target));
            }
        }
        Ok(PatchOutcome::Declined)
    }
}

/// Fold `patches` over `target` in order, each against the previous result.
/// Any failure or decline aborts the whole sequence.
pub fn apply_all<T, H>(handler: &H, target: T, patches: &[Patch]) -> Result<T, DomainError>
where
    H: PatchHandler<T> + ?Sized,
{
    patches.iter().try_fold(target, |current, patch| {
        handler
            .try_apply(patch, &current)?
            .applied()
            .ok_or_else(|| DomainError::patch_declined(patch.operation, patch.path.clone()))
    })
}
