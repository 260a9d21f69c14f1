//! Asset loading, prewarming and publication.
//!
//! Loading itself belongs to the caller's [`SceneLoader`]. This module turns
//! a successful load into a GPU-resident scene stored in an [`AssetSink`].

pub mod prewarm;
pub mod sink;
pub mod source;
pub mod sponza;

pub use prewarm::{
    clamp_anisotropy, AssetPrewarmer, PrewarmReport, TextureUploader,
    DEFAULT_ANISOTROPY,
};
pub use sink::AssetSink;
pub use source::{Environment, ModelSource};

use crate::error::LucentError;
use crate::scene::SceneNode;

/// Fetches and parses a scene graph from a URL.
pub trait SceneLoader {
    /// Root node type produced by this loader.
    type Scene: SceneNode;

    /// Load the scene at `url`.
    fn load(&mut self, url: &str) -> Result<Self::Scene, LucentError>;
}
