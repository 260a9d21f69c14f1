//! Rendering subsystems.
//!
//! Contains the full-screen pass that draws parametric shader materials.

pub mod postprocess;
