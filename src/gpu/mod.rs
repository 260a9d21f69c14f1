//! GPU resource management utilities.
//!
//! Provides headless wgpu device initialization, WGSL composition of
//! material programs, pipeline boilerplate and the texture cache used for
//! eager uploads.

/// Shared wgpu boilerplate helpers for full-screen material pipelines.
pub mod pipeline_helpers;
/// wgpu device and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` and define support via naga-oil.
pub mod shader_composer;
/// CPU texture registry with idempotent GPU upload.
pub mod texture_cache;
