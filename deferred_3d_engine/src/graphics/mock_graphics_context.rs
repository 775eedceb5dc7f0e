/// Mock GraphicsContext for unit tests (no GPU required)
///
/// Every call is recorded as a string in `commands`, so tests can assert the
/// exact order of GPU-visible operations.

use crate::error::{Error, Result};
use crate::graphics::{
    GraphicsContext, ProgramDesc, ProgramHandle, RenderTarget, RenderTargetDescription,
    RenderTargetHandle, Texture2D, TextureUnit, UniformValue,
};

pub struct MockGraphicsContext {
    pub commands: Vec<String>,
    pub texture_units: u32,
    /// Make the next `program_compile` calls fail
    pub fail_program_compile: bool,
    /// Make the next `render_target_create` calls fail
    pub fail_render_target_create: bool,
    /// Make the next `render_target_delete` calls fail
    pub fail_render_target_delete: bool,
    next_handle: u64,
}

impl MockGraphicsContext {
    pub fn new() -> Self {
        Self::with_texture_units(16)
    }

    pub fn with_texture_units(texture_units: u32) -> Self {
        Self {
            commands: Vec::new(),
            texture_units,
            fail_program_compile: false,
            fail_render_target_create: false,
            fail_render_target_delete: false,
            next_handle: 1,
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Commands starting with `prefix`
    pub fn commands_matching(&self, prefix: &str) -> Vec<String> {
        self.commands
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl GraphicsContext for MockGraphicsContext {
    fn program_compile(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle> {
        if self.fail_program_compile {
            return Err(Error::BackendError(format!("compile failed: {}", desc.name)));
        }
        let handle = ProgramHandle(self.next_handle());
        self.commands.push(format!("program_compile {} {}", desc.name, handle.0));
        Ok(handle)
    }

    fn program_activate(&mut self, program: ProgramHandle) -> Result<()> {
        self.commands.push(format!("program_activate {}", program.0));
        Ok(())
    }

    fn program_deactivate(&mut self, program: ProgramHandle) -> Result<()> {
        self.commands.push(format!("program_deactivate {}", program.0));
        Ok(())
    }

    fn program_delete(&mut self, program: ProgramHandle) -> Result<()> {
        self.commands.push(format!("program_delete {}", program.0));
        Ok(())
    }

    fn uniform_set(&mut self, program: ProgramHandle, name: &str, _value: UniformValue) -> Result<()> {
        self.commands.push(format!("uniform_set {} {}", program.0, name));
        Ok(())
    }

    fn texture_unit_count(&self) -> u32 {
        self.texture_units
    }

    fn texture_2d_bind(&mut self, unit: TextureUnit, texture: Texture2D) -> Result<()> {
        self.commands.push(format!("texture_2d_bind {} {}", unit.0, texture.0));
        Ok(())
    }

    fn texture_unit_unbind(&mut self, unit: TextureUnit) -> Result<()> {
        self.commands.push(format!("texture_unit_unbind {}", unit.0));
        Ok(())
    }

    fn render_target_create(&mut self, desc: &RenderTargetDescription) -> Result<RenderTarget> {
        if self.fail_render_target_create {
            return Err(Error::BackendError("render target allocation failed".to_string()));
        }
        let handle = self.next_handle();
        self.commands.push(format!("render_target_create {} {}x{}", handle, desc.width, desc.height));
        Ok(RenderTarget {
            handle: RenderTargetHandle(handle),
            description: *desc,
            color_texture: Texture2D(handle),
            byte_size: desc.estimate_size(),
        })
    }

    fn render_target_delete(&mut self, target: &RenderTarget) -> Result<()> {
        if self.fail_render_target_delete {
            return Err(Error::BackendError("render target delete failed".to_string()));
        }
        self.commands.push(format!("render_target_delete {}", target.handle.0));
        Ok(())
    }
}
