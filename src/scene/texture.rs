use std::fmt;

/// Opaque identifier for a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

/// Material texture slots a mesh can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Albedo / base color map.
    BaseColor,
    /// Tangent-space normal map.
    Normal,
    /// Emissive color map.
    Emissive,
    /// Packed metallic-roughness map.
    MetallicRoughness,
    /// Ambient occlusion map.
    Occlusion,
}

impl TextureSlot {
    /// Every slot, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::BaseColor,
        Self::Normal,
        Self::Emissive,
        Self::MetallicRoughness,
        Self::Occlusion,
    ];

    /// Short lowercase name used in log output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseColor => "map",
            Self::Normal => "normal_map",
            Self::Emissive => "emissive_map",
            Self::MetallicRoughness => "metalness_roughness_map",
            Self::Occlusion => "ao_map",
        }
    }
}

/// Per-texture sampling parameters attached to a scene material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    handle: TextureHandle,
    /// Requested anisotropic filtering level (1 = off).
    pub anisotropy: u16,
}

impl Texture {
    /// A texture with anisotropic filtering disabled.
    #[must_use]
    pub fn new(handle: TextureHandle) -> Self {
        Self {
            handle,
            anisotropy: 1,
        }
    }

    /// Renderer-side identifier.
    #[must_use]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }
}
