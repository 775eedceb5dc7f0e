pub mod texture_unit_allocator;

pub use texture_unit_allocator::{TextureUnitAllocator, TextureUnitContext, TextureUnitScope};
