//! Fixed render-state flags of a material.

/// Fixed pipeline flags of a material.
///
/// Full-screen post-processing passes overwrite their target, ignore the
/// scene depth buffer and must not apply tone mapping a second time, so the
/// only public constructor is [`RenderState::post_processing`]. The flags
/// cannot change after a material is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    blending: bool,
    depth_write: bool,
    depth_test: bool,
    tone_mapped: bool,
}

impl RenderState {
    /// No blending, no depth test or write, excluded from tone mapping.
    #[must_use]
    pub const fn post_processing() -> Self {
        Self {
            blending: false,
            depth_write: false,
            depth_test: false,
            tone_mapped: false,
        }
    }

    /// Whether the output is blended with the target.
    #[must_use]
    pub const fn blending(&self) -> bool {
        self.blending
    }

    /// Whether fragments write depth.
    #[must_use]
    pub const fn depth_write(&self) -> bool {
        self.depth_write
    }

    /// Whether fragments are depth tested.
    #[must_use]
    pub const fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Whether the output goes through the tone-mapping curve.
    #[must_use]
    pub const fn tone_mapped(&self) -> bool {
        self.tone_mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_processing_state_disables_everything() {
        let state = RenderState::post_processing();
        assert!(!state.blending());
        assert!(!state.depth_write());
        assert!(!state.depth_test());
        assert!(!state.tone_mapped());
    }
}
