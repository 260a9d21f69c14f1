//! Common interface of full-screen passes.

use crate::error::LucentError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

use super::material_pass::TextureViews;

/// Uniform interface for fullscreen post-processing passes.
pub trait ScreenPass {
    /// Bring GPU state up to date with the pass's material: rebuild the
    /// pipeline if stale, upload uniforms and rebind textures.
    ///
    /// Returns `false` when the pass cannot draw this frame.
    ///
    /// # Errors
    ///
    /// Propagates shader composition and uniform encoding failures.
    fn prepare(
        &mut self,
        context: &RenderContext,
        composer: &mut ShaderComposer,
        views: &dyn TextureViews,
    ) -> Result<bool, LucentError>;

    /// Encode GPU commands for this pass into `target`.
    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    );
}
