//! Post-processing effect passes.
//!
//! Every effect is a [`PassMaterial`] drawn by a generic [`MaterialPass`]
//! that recompiles its pipeline lazily when the material's defines change.

pub mod material_pass;
pub mod screen_pass;

pub use material_pass::{
    MaterialPass, PassMaterial, PipelineBuilder, TextureBinding, TextureViews,
};
pub use screen_pass::ScreenPass;
