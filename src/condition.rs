//! Guards that decide whether rules run at all
//!
//! A [`Condition`] is a predicate over the whole target object. It can guard a
//! single primitive, a whole rule chain, or a group of chains declared inside
//! `ValidatorBuilder::when`. When a guard evaluates to `false` the guarded rules
//! record nothing.
//!
//! Asynchronous conditions are only usable through `validate_async`; the
//! synchronous entry point reports them as misuse.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

type SyncGuard<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type AsyncGuard<T> = Arc<dyn for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync>;

enum Guard<T> {
    Sync(SyncGuard<T>),
    Async(AsyncGuard<T>),
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        match self {
            Guard::Sync(f) => Guard::Sync(Arc::clone(f)),
            Guard::Async(f) => Guard::Async(Arc::clone(f)),
        }
    }
}

/// A predicate over the target object, optionally negated.
pub struct Condition<T> {
    guard: Guard<T>,
    negate: bool,
}

impl<T> Clone for Condition<T> {
    fn clone(&self) -> Self {
        Condition {
            guard: self.guard.clone(),
            negate: self.negate,
        }
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("async", &self.is_async())
            .field("negate", &self.negate)
            .field("predicate", &"<function>")
            .finish()
    }
}

impl<T> Condition<T> {
    /// Run guarded rules only when `predicate` holds.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Condition {
            guard: Guard::Sync(Arc::new(predicate)),
            negate: false,
        }
    }

    /// Run guarded rules only when `predicate` does not hold.
    pub fn unless<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Condition {
            negate: true,
            ..Condition::when(predicate)
        }
    }

    /// Asynchronous form of [`Condition::when`].
    pub fn when_async<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Condition {
            guard: Guard::Async(Arc::new(predicate)),
            negate: false,
        }
    }

    /// Asynchronous form of [`Condition::unless`].
    pub fn unless_async<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Condition {
            negate: true,
            ..Condition::when_async(predicate)
        }
    }

    /// Whether evaluating this condition requires awaiting.
    pub fn is_async(&self) -> bool {
        matches!(self.guard, Guard::Async(_))
    }

    /// Evaluate synchronously. `None` when the condition is asynchronous.
    pub fn evaluate_sync(&self, root: &T) -> Option<bool> {
        match &self.guard {
            Guard::Sync(f) => Some(f(root) != self.negate),
            Guard::Async(_) => None,
        }
    }

    /// Evaluate, awaiting asynchronous predicates.
    pub async fn evaluate(&self, root: &T) -> bool {
        let holds = match &self.guard {
            Guard::Sync(f) => f(root),
            Guard::Async(f) => f(root).await,
        };
        holds != self.negate
    }
}
