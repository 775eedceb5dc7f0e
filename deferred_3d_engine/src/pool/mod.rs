//! Bounded object pools
//!
//! A pool hands out values keyed by a description, reusing idle values with
//! the same key and creating new ones through a [`PoolListener`]. Idle bytes
//! are trimmed down to a soft limit; total bytes never exceed a hard limit.

pub mod bounded_pool;
pub mod pool_listener;
pub mod render_target_pool;

pub use bounded_pool::{BoundedPool, PoolEntryKey, PooledValue};
pub use pool_listener::PoolListener;
pub use render_target_pool::{PoolGraphicsContext, RenderTargetListener, RenderTargetPool};
