/// Callbacks a pool uses to manage the values it holds

use crate::error::{Error, Result};

/// Lifecycle callbacks of the values held by a [`BoundedPool`](crate::pool::BoundedPool).
///
/// `C` is the context passed through from the pool operations (typically a
/// graphics context); `K` is the lookup key and `V` the pooled value.
pub trait PoolListener<K, V, C: ?Sized> {
    /// Bytes a value for `key` is expected to take, before creating it
    fn on_estimate_size(&mut self, context: &mut C, key: &K) -> u64;

    /// Create a value for `key`
    fn on_create(&mut self, context: &mut C, key: &K) -> Result<V>;

    /// Actual bytes taken by a freshly created value
    fn on_get_size(&mut self, context: &mut C, key: &K, value: &V) -> u64;

    /// Called when an idle value is handed out again
    fn on_reuse(&mut self, context: &mut C, key: &K, value: &mut V) -> Result<()>;

    /// Destroy a value evicted or released by the pool
    fn on_delete(&mut self, context: &mut C, key: &K, value: V) -> Result<()>;

    /// Called when `on_delete` fails. The pool carries on regardless.
    fn on_error(&mut self, context: &mut C, key: &K, error: &Error);
}
