//! Scoped texture unit allocation
//!
//! Texture units are handed out from a stack of contexts. A child context
//! starts allocating after the last unit of its parent and inherits the
//! parent's bindings; finishing it unbinds exactly the units it bound and
//! makes the parent current again.
//!
//! Only the top of the stack may bind or open a child. Using any other
//! context fails with [`Error::TextureUnitContextNotActive`].

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics::{GraphicsContext, Texture2D, TextureUnit};
use crate::log::Logger;

const SOURCE: &str = "deferred3d::TextureUnitAllocator";

/// Handle to one context of a [`TextureUnitAllocator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureUnitContext {
    depth: u32,
    serial: u64,
}

impl TextureUnitContext {
    /// Nesting depth (the root context is 0)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

struct Frame {
    serial: u64,
    /// First unit owned by this context
    first: u32,
    /// Next unit this context will hand out
    next: u32,
    /// Bindings visible to this context, inherited ones included
    bindings: Vec<(TextureUnit, Texture2D)>,
}

/// Stack allocator for texture units
pub struct TextureUnitAllocator {
    unit_count: u32,
    stack_depth: u32,
    frames: Vec<Frame>,
    next_serial: u64,
    logger: Arc<dyn Logger>,
}

impl TextureUnitAllocator {
    /// Create an allocator over `unit_count` units, allowing `stack_depth`
    /// nested contexts (the root context included).
    pub fn new(stack_depth: u32, unit_count: u32, logger: Arc<dyn Logger>) -> Result<Self> {
        if stack_depth < 2 {
            return Err(Error::InvalidConfiguration(format!(
                "texture unit stack depth must be at least 2, got {}",
                stack_depth
            )));
        }
        Ok(Self {
            unit_count,
            stack_depth,
            frames: vec![Frame { serial: 0, first: 0, next: 0, bindings: Vec::new() }],
            next_serial: 1,
            logger,
        })
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    pub fn stack_depth(&self) -> u32 {
        self.stack_depth
    }

    /// Context at the bottom of the stack, never finished
    pub fn root_context(&self) -> TextureUnitContext {
        TextureUnitContext { depth: 0, serial: 0 }
    }

    /// Context currently at the top of the stack
    pub fn current_context(&self) -> TextureUnitContext {
        let depth = (self.frames.len() - 1) as u32;
        TextureUnitContext { depth, serial: self.frames[depth as usize].serial }
    }

    /// Units currently in use across the whole stack
    pub fn units_in_use(&self) -> u32 {
        self.frames.last().map_or(0, |frame| frame.next)
    }

    /// Open a child of `parent`, which must be the current context
    pub fn unit_context_new(&mut self, parent: TextureUnitContext) -> Result<TextureUnitContext> {
        self.unit_context_new_with_reserved(parent, 0)
    }

    /// Open a child of `parent`, failing unless at least `reserved` units are
    /// still free for it to bind.
    pub fn unit_context_new_with_reserved(
        &mut self,
        parent: TextureUnitContext,
        reserved: u32,
    ) -> Result<TextureUnitContext> {
        self.check_current(parent)?;
        if self.frames.len() as u32 >= self.stack_depth {
            engine_bail!(self.logger, SOURCE, Error::TextureUnitContextLimitReached(self.stack_depth));
        }

        let (start, bindings) = {
            let top = self.top();
            (top.next, top.bindings.clone())
        };
        let required = start.saturating_add(reserved);
        if required > self.unit_count {
            engine_bail!(self.logger, SOURCE, Error::TextureUnitExhausted {
                required,
                available: self.unit_count,
            });
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        self.frames.push(Frame { serial, first: start, next: start, bindings });

        let context = TextureUnitContext { depth: parent.depth + 1, serial };
        engine_trace!(self.logger, SOURCE, "Opened context depth {} at unit {}", context.depth, start);
        Ok(context)
    }

    /// Bind `texture` to a unit owned by `context` and return the unit.
    ///
    /// A texture already visible to the context (bound by it or by an
    /// ancestor) is not bound again; its unit is returned.
    pub fn unit_context_bind_texture_2d(
        &mut self,
        g: &mut dyn GraphicsContext,
        context: TextureUnitContext,
        texture: Texture2D,
    ) -> Result<TextureUnit> {
        self.check_current(context)?;

        if let Some(&(unit, _)) = self.top().bindings.iter().find(|(_, bound)| *bound == texture) {
            return Ok(unit);
        }

        let next = self.top().next;
        if next >= self.unit_count {
            engine_bail!(self.logger, SOURCE, Error::TextureUnitExhausted {
                required: next + 1,
                available: self.unit_count,
            });
        }

        let unit = TextureUnit(next);
        g.texture_2d_bind(unit, texture)?;

        let top = self.top_mut();
        top.next += 1;
        top.bindings.push((unit, texture));
        Ok(unit)
    }

    /// Close `context`, unbinding every unit it bound.
    ///
    /// The context is popped before the units are unbound, so the stack is
    /// consistent even if the graphics context reports an error.
    pub fn unit_context_finish(
        &mut self,
        g: &mut dyn GraphicsContext,
        context: TextureUnitContext,
    ) -> Result<()> {
        if context.is_root() {
            engine_bail!(self.logger, SOURCE, Error::InvalidResource(
                "the root texture unit context cannot be finished".to_string()
            ));
        }
        self.check_current(context)?;

        let (first, next) = match self.frames.pop() {
            Some(frame) => (frame.first, frame.next),
            None => return Err(Error::TextureUnitContextNotActive),
        };
        for index in first..next {
            g.texture_unit_unbind(TextureUnit(index))?;
        }
        engine_trace!(self.logger, SOURCE, "Finished context depth {}, released {} units", context.depth, next - first);
        Ok(())
    }

    /// Borrowed view over the root context
    pub fn root_scope(&mut self) -> TextureUnitScope<'_> {
        let context = self.root_context();
        TextureUnitScope { allocator: self, context }
    }

    fn check_current(&self, context: TextureUnitContext) -> Result<()> {
        let is_current = self
            .frames
            .last()
            .map_or(false, |top| top.serial == context.serial)
            && self.frames.len() as u32 == context.depth + 1;
        if !is_current {
            engine_bail!(self.logger, SOURCE, Error::TextureUnitContextNotActive);
        }
        Ok(())
    }

    fn top(&self) -> &Frame {
        // The root frame is never popped
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

/// Borrowed view over one allocator context, handed to shader hooks
pub struct TextureUnitScope<'a> {
    allocator: &'a mut TextureUnitAllocator,
    context: TextureUnitContext,
}

impl<'a> TextureUnitScope<'a> {
    pub fn context(&self) -> TextureUnitContext {
        self.context
    }

    pub fn bind_texture_2d(&mut self, g: &mut dyn GraphicsContext, texture: Texture2D) -> Result<TextureUnit> {
        self.allocator.unit_context_bind_texture_2d(g, self.context, texture)
    }

    /// Run `f` in a new child context and finish the child afterwards, even
    /// when `f` fails. An error from `f` takes precedence over an error from
    /// finishing.
    pub fn with_child<R>(
        &mut self,
        g: &mut dyn GraphicsContext,
        f: impl FnOnce(&mut TextureUnitScope<'_>, &mut dyn GraphicsContext) -> Result<R>,
    ) -> Result<R> {
        self.with_child_reserved(g, 0, f)
    }

    /// [`with_child`](Self::with_child) with `reserved` units guaranteed free
    pub fn with_child_reserved<R>(
        &mut self,
        g: &mut dyn GraphicsContext,
        reserved: u32,
        f: impl FnOnce(&mut TextureUnitScope<'_>, &mut dyn GraphicsContext) -> Result<R>,
    ) -> Result<R> {
        let child = self.allocator.unit_context_new_with_reserved(self.context, reserved)?;
        let result = {
            let mut scope = TextureUnitScope { allocator: &mut *self.allocator, context: child };
            f(&mut scope, &mut *g)
        };
        let finished = self.allocator.unit_context_finish(g, child);
        let value = result?;
        finished?;
        Ok(value)
    }
}

#[cfg(test)]
#[path = "texture_unit_allocator_tests.rs"]
mod tests;
