//! Deferred values resolved by the provisioning engine.
//!
//! An [`Output`] is a value that may not be known when a resource
//! specification is built: generated ARNs, physical names, anything the
//! engine only learns after a create call returns. Helpers combine outputs
//! with [`Output::map`], [`Output::zip`] and [`Output::all`] instead of
//! reading them, and the engine observes readiness through [`Output::poll`].
//!
//! Outputs are cheap handles (`Arc` inside) and never mutate after
//! resolution, so they can be cloned and shared across threads freely.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{CloudgraftError, CloudgraftResult};

type Thunk<T> = Arc<dyn Fn() -> Option<T> + Send + Sync>;

/// A value that becomes available once the provisioning engine resolves it.
pub struct Output<T> {
    thunk: Thunk<T>,
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.thunk)().is_some() {
            f.write_str("Output(resolved)")
        } else {
            f.write_str("Output(pending)")
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Output<T> {
    /// Wrap a value that is already known.
    pub fn resolved(value: T) -> Self {
        Self {
            thunk: Arc::new(move || Some(value.clone())),
        }
    }

    /// Create an unresolved output together with the [`Resolver`] the
    /// provisioning engine uses to fulfil it.
    pub fn pending() -> (Self, Resolver<T>) {
        let cell: Arc<OnceLock<T>> = Arc::new(OnceLock::new());
        let read = Arc::clone(&cell);
        let output = Self {
            thunk: Arc::new(move || read.get().cloned()),
        };
        (output, Resolver { cell })
    }
}

impl<T: 'static> Output<T> {
    /// Observe the current state without blocking. `None` means the engine
    /// has not resolved every source this output derives from yet.
    pub fn poll(&self) -> Option<T> {
        (self.thunk)()
    }

    /// Derive a new output by transforming this one once it resolves.
    pub fn map<U, F>(&self, f: F) -> Output<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        U: 'static,
    {
        let source = Arc::clone(&self.thunk);
        Output {
            thunk: Arc::new(move || source().map(&f)),
        }
    }

    /// Combine two outputs into one; pending until both resolve.
    pub fn zip<U: 'static>(&self, other: &Output<U>) -> Output<(T, U)> {
        let left = Arc::clone(&self.thunk);
        let right = Arc::clone(&other.thunk);
        Output {
            thunk: Arc::new(move || Some((left()?, right()?))),
        }
    }

    /// Sequence a vector of outputs; pending until every element resolves.
    pub fn all(outputs: Vec<Output<T>>) -> Output<Vec<T>> {
        Output {
            thunk: Arc::new(move || outputs.iter().map(Output::poll).collect()),
        }
    }

    /// Fall back to `default` when no value was supplied.
    pub fn if_undefined(value: Option<Output<T>>, default: Output<T>) -> Output<T> {
        value.unwrap_or(default)
    }
}

impl<T: Clone + Send + Sync + 'static> From<T> for Output<T> {
    fn from(value: T) -> Self {
        Self::resolved(value)
    }
}

/// Write side of a pending [`Output`]. Held by the provisioning engine.
#[derive(Debug)]
pub struct Resolver<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Resolver<T> {
    /// Fulfil the output. A second call is a contract violation.
    pub fn resolve(&self, value: T) -> CloudgraftResult<()> {
        self.cell
            .set(value)
            .map_err(|_| CloudgraftError::OutputAlreadyResolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_polls_immediately() {
        let output = Output::resolved("arn:aws:s3:::my-bucket".to_string());
        assert_eq!(output.poll(), Some("arn:aws:s3:::my-bucket".to_string()));
    }

    #[test]
    fn test_pending_polls_none_until_resolved() {
        let (output, resolver) = Output::pending();
        assert_eq!(output.poll(), None);
        resolver.resolve(42).expect("first resolve succeeds");
        assert_eq!(output.poll(), Some(42));
    }

    #[test]
    fn test_double_resolve_is_an_error() {
        let (_output, resolver) = Output::<i32>::pending();
        resolver.resolve(1).expect("first resolve succeeds");
        assert!(matches!(
            resolver.resolve(2),
            Err(CloudgraftError::OutputAlreadyResolved)
        ));
    }

    #[test]
    fn test_map_propagates_pending_state() {
        let (output, resolver) = Output::pending();
        let mapped = output.map(|n: i32| n * 2);
        assert_eq!(mapped.poll(), None);
        resolver.resolve(21).expect("resolve succeeds");
        assert_eq!(mapped.poll(), Some(42));
    }

    #[test]
    fn test_zip_waits_for_both_sides() {
        let (left, left_resolver) = Output::pending();
        let right = Output::resolved("suffix".to_string());
        let zipped = left.zip(&right);
        assert_eq!(zipped.poll(), None);
        left_resolver
            .resolve("prefix".to_string())
            .expect("resolve succeeds");
        assert_eq!(
            zipped.poll(),
            Some(("prefix".to_string(), "suffix".to_string()))
        );
    }

    #[test]
    fn test_all_waits_for_every_element() {
        let (pending, resolver) = Output::pending();
        let combined = Output::all(vec![Output::resolved(1), pending, Output::resolved(3)]);
        assert_eq!(combined.poll(), None);
        resolver.resolve(2).expect("resolve succeeds");
        assert_eq!(combined.poll(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_if_undefined_prefers_supplied_value() {
        let supplied = Output::if_undefined(
            Some(Output::resolved("given".to_string())),
            Output::resolved("default".to_string()),
        );
        assert_eq!(supplied.poll(), Some("given".to_string()));

        let defaulted =
            Output::if_undefined(None, Output::resolved("default".to_string()));
        assert_eq!(defaulted.poll(), Some("default".to_string()));
    }
}
