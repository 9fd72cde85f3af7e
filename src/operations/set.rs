//! # Named operation mapping.
//!
//! [`Operations`] maps unique names to [`OperationRef`]s. Inserting an existing name
//! replaces the previous operation (last write wins). Names are only used for
//! observability: they tag [`OperationFailure`](crate::OperationFailure)s and events.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use crate::error::OperationError;
use crate::operations::operation::OperationRef;
use crate::operations::operation_fn::OperationFn;
use crate::scope::Scope;

/// Mapping from operation name to operation.
///
/// ## Example
/// ```rust
/// use graceful::{OperationError, Operations, Scope};
///
/// let ops = Operations::new()
///     .with("http", |_scope: Scope| async { Ok::<(), OperationError>(()) })
///     .with("db", |scope: Scope| async move {
///         scope.err().map_or(Ok(()), Err::<(), OperationError>)
///     });
///
/// assert_eq!(ops.len(), 2);
/// assert_eq!(ops.names().collect::<Vec<_>>(), vec!["db", "http"]);
/// ```
#[derive(Clone, Default)]
pub struct Operations {
    inner: BTreeMap<Arc<str>, OperationRef>,
}

impl Operations {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a closure-backed operation under `name` (builder style).
    pub fn with<F, Fut>(mut self, name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Scope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), OperationError>> + Send + 'static,
    {
        self.insert(name, OperationFn::arc(f));
        self
    }

    /// Adds an existing operation under `name` (builder style).
    pub fn with_operation(mut self, name: impl Into<Arc<str>>, op: OperationRef) -> Self {
        self.insert(name, op);
        self
    }

    /// Inserts `op` under `name`, returning the operation it replaced.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, op: OperationRef) -> Option<OperationRef> {
        self.inner.insert(name.into(), op)
    }

    /// Removes the operation registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<OperationRef> {
        self.inner.remove(name)
    }

    /// Returns `true` if an operation is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no operations are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_ref())
    }
}

impl<K> FromIterator<(K, OperationRef)> for Operations
where
    K: Into<Arc<str>>,
{
    fn from_iter<I: IntoIterator<Item = (K, OperationRef)>>(iter: I) -> Self {
        let mut ops = Operations::new();
        ops.extend(iter);
        ops
    }
}

impl<K> Extend<(K, OperationRef)> for Operations
where
    K: Into<Arc<str>>,
{
    fn extend<I: IntoIterator<Item = (K, OperationRef)>>(&mut self, iter: I) {
        for (name, op) in iter {
            self.insert(name, op);
        }
    }
}

impl IntoIterator for Operations {
    type Item = (Arc<str>, OperationRef);
    type IntoIter = std::collections::btree_map::IntoIter<Arc<str>, OperationRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl std::fmt::Debug for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn failing(msg: &'static str) -> OperationRef {
        OperationFn::arc(move |_scope: Scope| async move { Err::<(), _>(OperationError::fail(msg)) })
    }

    #[tokio::test]
    async fn test_duplicate_name_last_write_wins() {
        let mut ops = Operations::new();
        assert!(ops.insert("cache", failing("first")).is_none());
        assert!(ops.insert("cache", failing("second")).is_some());
        assert_eq!(ops.len(), 1);

        let (_, op) = ops.into_iter().next().expect("one operation");
        let res = op.run(Scope::new(Duration::from_secs(1))).await;
        assert_eq!(res, Err(OperationError::fail("second")));
    }

    #[test]
    fn test_collect_from_pairs() {
        let ops: Operations = vec![("b", failing("b")), ("a", failing("a"))]
            .into_iter()
            .collect();
        assert_eq!(ops.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(ops.contains("a"));
        assert!(!ops.contains("c"));
        assert_eq!(format!("{ops:?}"), r#"{"a", "b"}"#);
    }

    #[test]
    fn test_remove() {
        let mut ops = Operations::new().with_operation("x", failing("x"));
        assert!(ops.remove("x").is_some());
        assert!(ops.is_empty());
    }
}
