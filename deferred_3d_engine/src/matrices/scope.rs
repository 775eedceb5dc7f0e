/// Scope kinds, their flags and the guard that closes them

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use bitflags::bitflags;
use crate::error::{Error, Result};

/// Kind of matrix scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Observer,
    Instance,
    ProjectiveLight,
    VolumeLight,
}

impl Scope {
    pub fn flag(&self) -> ScopeFlags {
        match self {
            Scope::Observer => ScopeFlags::OBSERVER,
            Scope::Instance => ScopeFlags::INSTANCE,
            Scope::ProjectiveLight => ScopeFlags::PROJECTIVE_LIGHT,
            Scope::VolumeLight => ScopeFlags::VOLUME_LIGHT,
        }
    }

    /// Error raised when this scope is opened while already open
    pub fn already_active_error(&self) -> Error {
        match self {
            Scope::Observer => Error::ObserverAlreadyActive,
            Scope::Instance => Error::InstanceAlreadyActive,
            Scope::ProjectiveLight => Error::ProjectiveAlreadyActive,
            Scope::VolumeLight => Error::VolumeLightAlreadyActive,
        }
    }

    fn index(&self) -> usize {
        match self {
            Scope::Observer => 0,
            Scope::Instance => 1,
            Scope::ProjectiveLight => 2,
            Scope::VolumeLight => 3,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Observer => write!(f, "Observer"),
            Scope::Instance => write!(f, "Instance"),
            Scope::ProjectiveLight => write!(f, "Projective light"),
            Scope::VolumeLight => write!(f, "Volume light"),
        }
    }
}

bitflags! {
    /// Set of currently open scopes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScopeFlags: u8 {
        const OBSERVER = 1 << 0;
        const INSTANCE = 1 << 1;
        const PROJECTIVE_LIGHT = 1 << 2;
        const VOLUME_LIGHT = 1 << 3;
        /// Scopes that are mutually exclusive inside an observer
        const NESTED = Self::INSTANCE.bits() | Self::PROJECTIVE_LIGHT.bits() | Self::VOLUME_LIGHT.bits();
    }
}

/// Open/closed bookkeeping shared by a [`Matrices`](crate::matrices::Matrices)
/// and every handle it gives out.
///
/// Each opening of a scope bumps that scope's generation, so a handle kept
/// past its scope never matches a later scope of the same kind.
#[derive(Debug, Default)]
pub(crate) struct ScopeState {
    active: Cell<ScopeFlags>,
    generations: [Cell<u64>; 4],
}

impl ScopeState {
    pub(crate) fn active(&self) -> ScopeFlags {
        self.active.get()
    }

    pub(crate) fn is_active(&self, scope: Scope) -> bool {
        self.active.get().contains(scope.flag())
    }

    /// Whether `scope` is open and was opened as `generation`
    pub(crate) fn is_current(&self, scope: Scope, generation: u64) -> bool {
        self.is_active(scope) && self.generations[scope.index()].get() == generation
    }

    pub(crate) fn require(&self, scope: Scope, generation: u64) -> Result<()> {
        if self.is_current(scope, generation) {
            Ok(())
        } else {
            Err(Error::ScopeNotActive(scope))
        }
    }

    /// Force a flag on or off without a guard
    pub(crate) fn set_active(&self, scope: Scope, active: bool) {
        let mut flags = self.active.get();
        flags.set(scope.flag(), active);
        self.active.set(flags);
    }
}

/// Marks one scope open for as long as it lives
pub(crate) struct ScopeGuard {
    state: Rc<ScopeState>,
    scope: Scope,
    generation: u64,
}

impl ScopeGuard {
    /// Open `scope`, failing if it is already open
    pub(crate) fn open(state: &Rc<ScopeState>, scope: Scope) -> Result<Self> {
        if state.is_active(scope) {
            return Err(scope.already_active_error());
        }
        let counter = &state.generations[scope.index()];
        let generation = counter.get() + 1;
        counter.set(generation);
        state.set_active(scope, true);
        Ok(Self { state: Rc::clone(state), scope, generation })
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.state.set_active(self.scope, false);
    }
}
