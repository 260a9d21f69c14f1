//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Which kind of identifier failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A preprocessor define symbol.
    Define,
    /// A uniform name.
    Uniform,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Define => f.write_str("define"),
            Self::Uniform => f.write_str("uniform"),
        }
    }
}

/// Errors produced by the lucent crate.
#[derive(Debug)]
pub enum LucentError {
    /// A define or uniform name is not a valid shader identifier.
    InvalidName {
        /// Whether the name belongs to a define or a uniform.
        kind: NameKind,
        /// The rejected name.
        name: String,
    },
    /// A paired integer/float define was given the same symbol twice.
    DefineConflict(String),
    /// Assignment to a uniform that the material never declared.
    UnknownUniform(String),
    /// A typed uniform accessor found a different value variant.
    UniformType {
        /// Uniform name.
        name: String,
        /// The variant the accessor expected.
        expected: &'static str,
        /// The variant actually stored.
        found: &'static str,
    },
    /// The shader compiler rejected a composed program.
    ShaderCompose(String),
    /// Failed to lay out a uniform block for upload.
    UniformEncode(String),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// The external scene loader reported a failure.
    AssetLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for LucentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { kind, name } => {
                write!(f, "invalid {kind} name: {name:?}")
            }
            Self::DefineConflict(symbol) => write!(
                f,
                "integer and float forms both use define {symbol}"
            ),
            Self::UnknownUniform(name) => {
                write!(f, "unknown uniform: {name}")
            }
            Self::UniformType {
                name,
                expected,
                found,
            } => write!(
                f,
                "uniform {name} holds {found}, expected {expected}"
            ),
            Self::ShaderCompose(msg) => {
                write!(f, "shader composition error: {msg}")
            }
            Self::UniformEncode(msg) => {
                write!(f, "uniform encoding error: {msg}")
            }
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::AssetLoad(msg) => write!(f, "asset load error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for LucentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for LucentError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for LucentError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
