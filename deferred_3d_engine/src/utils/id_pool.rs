use std::fmt;

/// Identifier assigned to a shader at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderId(u64);

impl ShaderId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing shader identifiers.
///
/// Identifiers are never recycled: a deleted shader keeps its id so that
/// log lines and stale handles stay unambiguous.
///
/// # Example
///
/// ```ignore
/// let mut ids = IdPool::new();
/// let a = ids.fresh_id();  // #0
/// let b = ids.fresh_id();  // #1
/// assert!(a < b);
/// ```
pub struct IdPool {
    next_id: u64,
}

impl IdPool {
    /// Create a pool starting at 0
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Create a pool whose first identifier is `first`
    pub fn starting_at(first: u64) -> Self {
        Self { next_id: first }
    }

    /// Take the next identifier
    pub fn fresh_id(&mut self) -> ShaderId {
        let id = self.next_id;
        self.next_id += 1;
        ShaderId(id)
    }

    /// Identifier the next call to `fresh_id` returns
    pub fn peek_next(&self) -> u64 {
        self.next_id
    }
}

impl Default for IdPool {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "id_pool_tests.rs"]
mod tests;
