//! Shader identity, the activation contract and its two building blocks
//!
//! - [`ProtocolShader`] owns a compiled program, a protocol state machine and
//!   a hook table. Every public call first takes the matching transition,
//!   then forwards to the hook.
//! - [`ShaderVerifier`] wraps any shader with an independent copy of the same
//!   state machine and checks calls before delegating.

use std::sync::Arc;
use crate::config::ShaderStateChecking;
use crate::error::{Error, Result};
use crate::graphics::{GraphicsContext, ProgramDesc, ProgramHandle};
use crate::log::Logger;
use crate::protocol::{ProtocolState, StateMachine};
use crate::utils::{IdPool, ShaderId};

const SOURCE: &str = "deferred3d::Shader";

// ============================================================================
// Traits
// ============================================================================

/// State space of one shader kind
pub trait ShaderState: ProtocolState {
    const DEACTIVATED: Self;
    const ACTIVATED: Self;
    const VALIDATED: Self;

    /// A fresh machine positioned at `DEACTIVATED`
    fn protocol() -> StateMachine<Self>;
}

/// Identity and activation contract shared by every shader kind
pub trait Shader {
    fn shader_id(&self) -> ShaderId;

    fn shader_name(&self) -> &str;

    fn shader_program(&self) -> ProgramHandle;

    fn is_deleted(&self) -> bool;

    /// Release the program. Idempotent.
    fn delete(&mut self, g: &mut dyn GraphicsContext) -> Result<()>;

    /// `DEACTIVATED -> ACTIVATED`, then make the program current
    fn on_activate(&mut self, g: &mut dyn GraphicsContext) -> Result<()>;

    /// `* -> VALIDATED` once every required value has been received
    fn on_validate(&mut self) -> Result<()>;

    /// Return to `DEACTIVATED` from any state and unbind the program.
    ///
    /// Deactivating a shader that is already deactivated does nothing.
    fn on_deactivate(&mut self, g: &mut dyn GraphicsContext) -> Result<()>;
}

// ============================================================================
// ProtocolShader
// ============================================================================

/// Shader driven by a protocol state machine over `S`, forwarding received
/// values to the hook table `H`
pub struct ProtocolShader<S: ShaderState, H> {
    id: ShaderId,
    name: String,
    program: ProgramHandle,
    state: StateMachine<S>,
    deleted: bool,
    hooks: H,
    logger: Arc<dyn Logger>,
}

impl<S: ShaderState, H> ProtocolShader<S, H> {
    /// Compile `desc` and take a fresh identifier from `ids`
    pub fn new(
        g: &mut dyn GraphicsContext,
        ids: &mut IdPool,
        desc: &ProgramDesc,
        hooks: H,
        logger: Arc<dyn Logger>,
    ) -> Result<Self> {
        let program = g
            .program_compile(desc)
            .map_err(|err| engine_err!(logger, SOURCE, err))?;
        let id = ids.fresh_id();
        engine_debug!(logger, SOURCE, "Created {} shader '{}' {}", S::MACHINE, desc.name, id);
        Ok(Self {
            id,
            name: desc.name.clone(),
            program,
            state: S::protocol(),
            deleted: false,
            hooks,
            logger,
        })
    }

    /// Current protocol state
    pub fn state(&self) -> S {
        self.state.current()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Take the transition to `target` and hand out what a hook needs
    pub(crate) fn step(&mut self, target: S) -> Result<(&mut H, ProgramHandle)> {
        if let Err(err) = self.state.transition(target) {
            engine_bail!(self.logger, SOURCE, err);
        }
        Ok((&mut self.hooks, self.program))
    }

    fn check_alive(&self) -> Result<()> {
        if self.deleted {
            engine_bail!(self.logger, SOURCE, Error::InvalidResource(format!(
                "shader '{}' {} has been deleted",
                self.name, self.id
            )));
        }
        Ok(())
    }
}

impl<S: ShaderState, H> Shader for ProtocolShader<S, H> {
    fn shader_id(&self) -> ShaderId {
        self.id
    }

    fn shader_name(&self) -> &str {
        &self.name
    }

    fn shader_program(&self) -> ProgramHandle {
        self.program
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn delete(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        if self.deleted {
            return Ok(());
        }
        let result = g.program_delete(self.program);
        self.deleted = true;
        match &result {
            Ok(()) => engine_debug!(self.logger, SOURCE, "Deleted shader '{}' {}", self.name, self.id),
            Err(err) => engine_warn!(self.logger, SOURCE, "Deleting shader '{}' failed: {}", self.name, err),
        }
        result
    }

    fn on_activate(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        self.check_alive()?;
        self.step(S::ACTIVATED)?;
        g.program_activate(self.program)
    }

    fn on_validate(&mut self) -> Result<()> {
        self.step(S::VALIDATED)?;
        Ok(())
    }

    fn on_deactivate(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        if self.state.current() == S::DEACTIVATED {
            return Ok(());
        }
        self.step(S::DEACTIVATED)?;
        g.program_deactivate(self.program)
    }
}

// ============================================================================
// ShaderVerifier
// ============================================================================

/// Checks the call order of a wrapped shader with its own state machine.
///
/// The wrapped shader keeps its own machine too; the verifier catches
/// misuse before anything reaches the shader or the GPU.
pub struct ShaderVerifier<T, S: ShaderState> {
    shader: T,
    state: StateMachine<S>,
    checking: ShaderStateChecking,
}

impl<T: Shader, S: ShaderState> ShaderVerifier<T, S> {
    pub fn new(shader: T) -> Self {
        Self::with_checking(shader, ShaderStateChecking::Enabled)
    }

    /// Wrap `shader`; with [`ShaderStateChecking::Disabled`] every call is
    /// delegated unchecked
    pub fn with_checking(shader: T, checking: ShaderStateChecking) -> Self {
        Self { shader, state: S::protocol(), checking }
    }

    /// Verifier's own view of the protocol state
    pub fn state(&self) -> S {
        self.state.current()
    }

    pub fn checking(&self) -> ShaderStateChecking {
        self.checking
    }

    pub fn inner(&self) -> &T {
        &self.shader
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.shader
    }

    pub fn into_inner(self) -> T {
        self.shader
    }

    /// Take the verifier's transition to `target` and hand out the shader
    pub(crate) fn check(&mut self, target: S) -> Result<&mut T> {
        if self.checking == ShaderStateChecking::Enabled {
            self.state.transition(target)?;
        }
        Ok(&mut self.shader)
    }
}

impl<T: Shader, S: ShaderState> Shader for ShaderVerifier<T, S> {
    fn shader_id(&self) -> ShaderId {
        self.shader.shader_id()
    }

    fn shader_name(&self) -> &str {
        self.shader.shader_name()
    }

    fn shader_program(&self) -> ProgramHandle {
        self.shader.shader_program()
    }

    fn is_deleted(&self) -> bool {
        self.shader.is_deleted()
    }

    fn delete(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        self.shader.delete(g)
    }

    fn on_activate(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        self.check(S::ACTIVATED)?.on_activate(g)
    }

    fn on_validate(&mut self) -> Result<()> {
        self.check(S::VALIDATED)?.on_validate()
    }

    fn on_deactivate(&mut self, g: &mut dyn GraphicsContext) -> Result<()> {
        if self.state.current() == S::DEACTIVATED {
            return self.shader.on_deactivate(g);
        }
        self.check(S::DEACTIVATED)?.on_deactivate(g)
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
