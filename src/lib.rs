// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Parametric post-processing materials, load-time asset prewarming and a
//! fixed demo light rig, built on wgpu.
//!
//! # Key entry points
//!
//! - [`material::ShaderMaterial`] - a shader program with typed defines,
//!   uniforms and fixed post-processing render state
//! - [`material::GodRaysMaterial`] and [`material::SmaaBlendMaterial`] - the
//!   bundled effect materials
//! - [`material::ProgramCache`] - lazy recompilation when defines change
//! - [`assets::AssetPrewarmer`] - shadow flags, anisotropy clamp and eager
//!   texture upload for freshly loaded scenes
//! - [`lighting::LightRig`] - ambient, shadow-casting key light and target
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Materials never talk to the GPU themselves. A [`material::ProgramBuilder`]
//! turns a material into a program: [`gpu::shader_composer::ShaderComposer`]
//! produces naga IR, and the post-processing
//! [`renderer::postprocess::MaterialPass`] wraps that into a wgpu pipeline.
//! Asset loading is owned by the caller; the prewarmer only runs on scenes
//! that loaded successfully and publishes them into a caller-owned
//! [`assets::AssetSink`].

pub mod assets;
pub mod error;
pub mod gpu;
pub mod lighting;
pub mod material;
pub mod options;
pub mod renderer;
pub mod scene;
