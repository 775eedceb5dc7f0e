//! Generic pool with soft and hard byte limits
//!
//! Accounting:
//! - `used` bytes belong to values currently checked out;
//! - `free` bytes belong to idle values waiting for reuse;
//! - `used + free` never exceeds the hard limit;
//! - after every return, `free` is at or below the soft limit.
//!
//! Idle values are evicted oldest-return first. Reuse picks the most
//! recently returned idle value with a matching key.
//!
//! The pool keeps a copy of every checked-out value so that
//! [`BoundedPool::delete`] can destroy it. Pooled values are therefore
//! handles (`Clone`), not the resources themselves.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use slotmap::{new_key_type, SlotMap};
use crate::config::PoolLimits;
use crate::error::{Error, Result};
use crate::log::Logger;
use crate::pool::pool_listener::PoolListener;

const SOURCE: &str = "deferred3d::BoundedPool";

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

new_key_type! {
    /// Stable key of one pool entry
    pub struct PoolEntryKey;
}

struct PoolEntry<K, V> {
    key: K,
    /// Idle value, or a copy of the checked-out one
    value: V,
    size: u64,
    checked_out: bool,
}

/// A value checked out of a pool.
///
/// Hand it back with [`BoundedPool::return_value`].
#[derive(Debug)]
pub struct PooledValue<K, V> {
    pool: u64,
    entry: PoolEntryKey,
    key: K,
    value: V,
    size: u64,
}

impl<K, V> PooledValue<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Bytes accounted for this value
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Synchronous keyed object pool with soft/hard byte limits
pub struct BoundedPool<K, V, C: ?Sized, L> {
    id: u64,
    listener: L,
    limits: PoolLimits,
    entries: SlotMap<PoolEntryKey, PoolEntry<K, V>>,
    /// Idle entries, oldest return first
    free: VecDeque<PoolEntryKey>,
    used_bytes: u64,
    free_bytes: u64,
    deleted: bool,
    logger: Arc<dyn Logger>,
    _context: std::marker::PhantomData<fn(&mut C)>,
}

impl<K, V, C, L> BoundedPool<K, V, C, L>
where
    K: Clone + PartialEq + std::fmt::Debug,
    V: Clone,
    C: ?Sized,
    L: PoolListener<K, V, C>,
{
    /// Create a pool.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] unless `0 < hard_limit_bytes` and
    /// `soft_limit_bytes <= hard_limit_bytes`.
    pub fn new(
        listener: L,
        soft_limit_bytes: u64,
        hard_limit_bytes: u64,
        logger: Arc<dyn Logger>,
    ) -> Result<Self> {
        let limits = PoolLimits::new(soft_limit_bytes, hard_limit_bytes);
        limits.validate()?;
        Ok(Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            listener,
            limits,
            entries: SlotMap::with_key(),
            free: VecDeque::new(),
            used_bytes: 0,
            free_bytes: 0,
            deleted: false,
            logger,
            _context: std::marker::PhantomData,
        })
    }

    /// Check out a value for `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolDeleted`] after [`delete`](Self::delete).
    /// - [`Error::PoolHardLimitExceeded`] if the checked-out bytes plus the
    ///   new value would exceed the hard limit. Free and checked-out sets are
    ///   left unchanged when the estimate already exceeds it.
    /// - Any error from the listener's `on_create` or `on_reuse`.
    pub fn get(&mut self, context: &mut C, key: &K) -> Result<PooledValue<K, V>> {
        if self.deleted {
            engine_bail!(self.logger, SOURCE, Error::PoolDeleted);
        }

        if let Some(entry) = self.take_free(key) {
            return self.reuse(context, entry);
        }

        let estimate = self.listener.on_estimate_size(context, key);
        if self.used_bytes.saturating_add(estimate) > self.limits.hard_limit_bytes {
            return Err(self.hard_limit_error(estimate));
        }
        self.evict_until(context, |pool| {
            pool.used_bytes + pool.free_bytes + estimate <= pool.limits.hard_limit_bytes
        });

        let value = self.listener.on_create(context, key)?;
        let size = self.listener.on_get_size(context, key, &value);

        if self.used_bytes.saturating_add(size) > self.limits.hard_limit_bytes {
            let err = self.hard_limit_error(size);
            self.delete_value(context, key, value);
            return Err(err);
        }
        self.evict_until(context, |pool| {
            pool.used_bytes + pool.free_bytes + size <= pool.limits.hard_limit_bytes
        });

        let entry = self.entries.insert(PoolEntry {
            key: key.clone(),
            value: value.clone(),
            size,
            checked_out: true,
        });
        self.used_bytes += size;
        engine_debug!(self.logger, SOURCE, "Created {:?} ({} bytes, {} used)", key, size, self.used_bytes);
        Ok(PooledValue { pool: self.id, entry, key: key.clone(), value, size })
    }

    /// Return a value previously obtained from [`get`](Self::get), then trim
    /// idle values down to the soft limit.
    ///
    /// # Errors
    ///
    /// - [`Error::PoolDeleted`] after [`delete`](Self::delete); the value was
    ///   already destroyed by `delete`.
    /// - [`Error::InvalidResource`] if the value is not checked out of this
    ///   pool.
    pub fn return_value(&mut self, context: &mut C, pooled: PooledValue<K, V>) -> Result<()> {
        let PooledValue { pool, entry, key, value, size } = pooled;

        if pool != self.id {
            engine_bail!(self.logger, SOURCE, Error::InvalidResource(format!(
                "{:?} was checked out of another pool",
                key
            )));
        }
        if self.deleted {
            engine_bail!(self.logger, SOURCE, Error::PoolDeleted);
        }

        match self.entries.get_mut(entry) {
            Some(slot) if slot.checked_out && slot.key == key && slot.size == size => {
                slot.value = value;
                slot.checked_out = false;
            }
            _ => {
                engine_bail!(self.logger, SOURCE, Error::InvalidResource(format!(
                    "{:?} is not checked out of this pool",
                    key
                )));
            }
        }

        self.free.push_back(entry);
        self.used_bytes -= size;
        self.free_bytes += size;

        let soft = self.limits.soft_limit_bytes;
        self.evict_until(context, |pool| pool.free_bytes <= soft);
        Ok(())
    }

    /// Destroy every value, idle or checked out, and refuse further use.
    /// Idempotent.
    ///
    /// Checked-out values handed back afterwards are rejected with
    /// [`Error::PoolDeleted`] and not destroyed again.
    pub fn delete(&mut self, context: &mut C) {
        if self.deleted {
            return;
        }
        self.deleted = true;

        // Idle values oldest first, then checked-out ones
        while let Some(entry) = self.free.pop_front() {
            if let Some(PoolEntry { key, value, .. }) = self.entries.remove(entry) {
                self.delete_value(context, &key, value);
            }
        }
        let checked_out: Vec<PoolEntryKey> = self.entries.keys().collect();
        for entry in checked_out {
            if let Some(PoolEntry { key, value, .. }) = self.entries.remove(entry) {
                self.delete_value(context, &key, value);
            }
        }
        self.free_bytes = 0;
        self.used_bytes = 0;
        engine_debug!(self.logger, SOURCE, "Pool deleted");
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Bytes currently checked out
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Bytes held by idle values
    pub fn free_bytes(&self) -> u64 {
        self.free_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.used_bytes + self.free_bytes
    }

    /// Number of idle values
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of checked-out values
    pub fn used_count(&self) -> usize {
        self.entries.len() - self.free.len()
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    // ===== INTERNAL =====

    fn hard_limit_error(&self, requested: u64) -> Error {
        engine_err!(self.logger, SOURCE, Error::PoolHardLimitExceeded {
            requested,
            used: self.used_bytes,
            hard_limit: self.limits.hard_limit_bytes,
        })
    }

    /// Remove the most recently returned idle entry with `key`
    fn take_free(&mut self, key: &K) -> Option<PoolEntryKey> {
        let position = self
            .free
            .iter()
            .rposition(|&entry| self.entries.get(entry).map_or(false, |slot| &slot.key == key))?;
        self.free.remove(position)
    }

    fn reuse(&mut self, context: &mut C, entry: PoolEntryKey) -> Result<PooledValue<K, V>> {
        let Some(slot) = self.entries.get_mut(entry) else {
            return Err(Error::InvalidResource("unknown pool entry".to_string()));
        };
        let key = slot.key.clone();
        let size = slot.size;

        if let Err(err) = self.listener.on_reuse(context, &key, &mut slot.value) {
            // Leave the entry idle
            self.free.push_back(entry);
            return Err(err);
        }
        slot.checked_out = true;
        let value = slot.value.clone();

        self.free_bytes -= size;
        self.used_bytes += size;
        engine_debug!(self.logger, SOURCE, "Reused {:?} ({} bytes)", key, size);
        Ok(PooledValue { pool: self.id, entry, key, value, size })
    }

    /// Evict oldest idle values until `done` holds or nothing is idle
    fn evict_until(&mut self, context: &mut C, done: impl Fn(&Self) -> bool) {
        while !done(self) {
            let Some(entry) = self.free.pop_front() else {
                break;
            };
            if let Some(PoolEntry { key, value, size, .. }) = self.entries.remove(entry) {
                self.free_bytes -= size;
                engine_debug!(self.logger, SOURCE, "Evicting {:?} ({} bytes)", key, size);
                self.delete_value(context, &key, value);
            }
        }
    }

    fn delete_value(&mut self, context: &mut C, key: &K, value: V) {
        if let Err(err) = self.listener.on_delete(context, key, value) {
            engine_warn!(self.logger, SOURCE, "Failed to delete {:?}: {}", key, err);
            self.listener.on_error(context, key, &err);
        }
    }
}

#[cfg(test)]
#[path = "bounded_pool_tests.rs"]
mod tests;
