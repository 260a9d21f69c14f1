//! Parametric shader materials.
//!
//! A [`ShaderMaterial`] owns one shader program's configurable surface:
//! a [`UniformRegistry`] (run-time constants, mutable without
//! recompilation), a [`DefineTable`] (compile-time constants, whose
//! mutation marks the program stale) and a fixed [`RenderState`].
//! Recompilation is lazy: a [`ProgramCache`] rebuilds the program the next
//! time the material is bound for drawing.

pub mod defines;
pub mod god_rays;
pub mod program;
pub mod render_state;
pub mod smaa_blend;
pub mod uniforms;

use std::borrow::Cow;

pub use defines::{DefineTable, DefineValue, SampleDefines};
pub use god_rays::GodRaysMaterial;
pub use program::{ProgramBuilder, ProgramCache};
pub use render_state::RenderState;
pub use smaa_blend::SmaaBlendMaterial;
pub use uniforms::{Uniform, UniformRegistry, UniformValue};

use crate::error::{LucentError, NameKind};

/// WGSL keywords and reserved words, sorted for binary search.
const RESERVED_WORDS: &[&str] = &[
    "NULL", "Self", "abstract", "active", "alias", "alignas", "alignof", "as",
    "asm", "asm_fragment", "async", "attribute", "auto", "await", "become",
    "binding_array", "break", "case", "cast", "catch", "class", "co_await",
    "co_return", "co_yield", "coherent", "column_major", "common", "compile",
    "compile_fragment", "concept", "const", "const_assert", "const_cast",
    "consteval", "constexpr", "constinit", "continue", "continuing", "crate",
    "debugger", "decltype", "default", "delete", "demote", "demote_to_helper",
    "diagnostic", "discard", "do", "dynamic_cast", "else", "enable", "enum",
    "explicit", "export", "extends", "extern", "external", "fallthrough",
    "false", "filter", "final", "finally", "fn", "for", "friend", "from",
    "fxgroup", "get", "goto", "groupshared", "highp", "if", "impl",
    "implements", "import", "inline", "instanceof", "interface", "layout",
    "let", "loop", "lowp", "macro", "macro_rules", "match", "mediump", "meta",
    "mod", "module", "move", "mut", "mutable", "namespace", "new", "nil",
    "noexcept", "noinline", "nointerpolation", "noperspective", "null",
    "nullptr", "of", "operator", "override", "package", "packoffset",
    "partition", "pass", "patch", "pixelfragment", "precise", "precision",
    "premerge", "priv", "protected", "pub", "public", "readonly", "ref",
    "regardless", "register", "reinterpret_cast", "require", "requires",
    "resource", "restrict", "return", "self", "set", "shared", "sizeof",
    "smooth", "snorm", "static", "static_assert", "static_cast", "std",
    "struct", "subroutine", "super", "switch", "target", "template", "this",
    "thread_local", "throw", "trait", "true", "try", "type", "typedef",
    "typeid", "typename", "typeof", "union", "unless", "unorm", "unsafe",
    "unsized", "use", "using", "var", "varying", "virtual", "volatile", "wgsl",
    "where", "while", "with", "writeonly", "yield",
];

/// Check that `name` is a usable WGSL identifier: `[A-Za-z_][A-Za-z0-9_]*`,
/// not `_`, not starting with `__`, and not a keyword or reserved word.
///
/// # Errors
///
/// Returns [`LucentError::InvalidName`] otherwise.
pub fn validate_identifier(
    kind: NameKind,
    name: &str,
) -> Result<(), LucentError> {
    let mut chars = name.chars();
    let well_formed = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid = well_formed
        && name != "_"
        && !name.starts_with("__")
        && RESERVED_WORDS.binary_search(&name).is_err();
    if valid {
        Ok(())
    } else {
        Err(LucentError::InvalidName {
            kind,
            name: name.to_owned(),
        })
    }
}

/// One shader stage's source text and the path it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSource {
    /// WGSL source. Not interpreted by the material.
    pub source: Cow<'static, str>,
    /// Path used in compiler diagnostics.
    pub file_path: Cow<'static, str>,
}

impl StageSource {
    /// Source embedded in the binary.
    #[must_use]
    pub const fn embedded(
        source: &'static str,
        file_path: &'static str,
    ) -> Self {
        Self {
            source: Cow::Borrowed(source),
            file_path: Cow::Borrowed(file_path),
        }
    }
}

/// Vertex and fragment sources of a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage; must export `vs_main`.
    pub vertex: StageSource,
    /// Fragment stage; must export `fs_main`.
    pub fragment: StageSource,
}

/// Shared full-screen triangle vertex stage.
pub const FULLSCREEN_VERTEX: StageSource = StageSource::embedded(
    include_str!("../../assets/shaders/common/fullscreen.wgsl"),
    "common/fullscreen.wgsl",
);

/// A shader program with typed defines, uniforms and fixed render state.
#[derive(Debug, Clone)]
pub struct ShaderMaterial {
    name: Cow<'static, str>,
    source: ShaderSource,
    defines: DefineTable,
    uniforms: UniformRegistry,
    render_state: RenderState,
    needs_update: bool,
}

impl ShaderMaterial {
    /// Build a material with post-processing render state.
    ///
    /// Every define symbol and uniform name is validated before anything
    /// reaches the GPU.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::InvalidName`] for the first malformed name.
    pub fn new<'a, D, U>(
        name: impl Into<Cow<'static, str>>,
        source: ShaderSource,
        defines: D,
        uniforms: U,
    ) -> Result<Self, LucentError>
    where
        D: IntoIterator<Item = (&'a str, String)>,
        U: IntoIterator<Item = (&'a str, UniformValue)>,
    {
        let mut define_table = DefineTable::new();
        for (symbol, value) in defines {
            define_table.set(symbol, value)?;
        }
        let mut registry = UniformRegistry::new();
        for (name, value) in uniforms {
            registry.declare(name, value)?;
        }
        Ok(Self {
            name: name.into(),
            source,
            defines: define_table,
            uniforms: registry,
            render_state: RenderState::post_processing(),
            needs_update: false,
        })
    }

    /// Material type name, used as a pipeline label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shader sources.
    #[must_use]
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    /// Fixed render-state flags.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    // -- Defines ------------------------------------------------------------

    /// Compile-time constants.
    #[must_use]
    pub fn defines(&self) -> &DefineTable {
        &self.defines
    }

    /// Set a define and mark the program stale.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::InvalidName`] for a malformed symbol; the
    /// material is left untouched.
    pub fn set_define(
        &mut self,
        symbol: &str,
        value: impl Into<String>,
    ) -> Result<(), LucentError> {
        self.defines.set(symbol, value)?;
        self.mark_stale();
        Ok(())
    }

    /// Remove a define, marking the program stale if it existed.
    pub fn remove_define(&mut self, symbol: &str) -> Option<String> {
        let removed = self.defines.remove(symbol);
        if removed.is_some() {
            self.mark_stale();
        }
        removed
    }

    /// Read an integer-valued define.
    #[must_use]
    pub fn int_define(&self, symbol: &str) -> Option<i64> {
        self.defines.get_int(symbol)
    }

    /// Floor `value` and store it under both an integer-form and a
    /// float-form symbol, marking the program stale. Returns the quantized
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::InvalidName`] if either symbol is malformed
    /// and [`LucentError::DefineConflict`] if both are the same; neither
    /// define is written in those cases.
    pub fn set_quantized_define(
        &mut self,
        int_symbol: &str,
        float_symbol: &str,
        value: f64,
    ) -> Result<i64, LucentError> {
        validate_identifier(NameKind::Define, int_symbol)?;
        validate_identifier(NameKind::Define, float_symbol)?;
        if int_symbol == float_symbol {
            return Err(LucentError::DefineConflict(int_symbol.to_owned()));
        }
        Ok(self.write_quantized(int_symbol, float_symbol, value))
    }

    /// Add or remove a valueless flag define for `#ifdef`, marking the
    /// program stale only when the flag actually changes.
    pub(crate) fn toggle_flag(&mut self, symbol: &str, on: bool) {
        match (on, self.defines.get(symbol).is_some()) {
            (true, false) => {
                self.defines.insert_known(symbol, String::new());
                self.mark_stale();
            }
            (false, true) => {
                let _ = self.remove_define(symbol);
            }
            _ => {}
        }
    }

    pub(crate) fn write_quantized(
        &mut self,
        int_symbol: &str,
        float_symbol: &str,
        value: f64,
    ) -> i64 {
        let SampleDefines {
            count,
            int_form,
            float_form,
        } = SampleDefines::quantize(value);
        self.defines.insert_known(int_symbol, int_form);
        self.defines.insert_known(float_symbol, float_form);
        self.mark_stale();
        count
    }

    // -- Uniforms -----------------------------------------------------------

    /// Run-time constants.
    #[must_use]
    pub fn uniforms(&self) -> &UniformRegistry {
        &self.uniforms
    }

    /// Current value of a uniform.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Assign a declared uniform. Never marks the program stale.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::UnknownUniform`] if `name` was not declared.
    pub fn set_uniform(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), LucentError> {
        self.uniforms.set(name, value)
    }

    // -- Program invalidation -----------------------------------------------

    /// Whether the compiled program no longer matches the defines.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Force a rebuild at the next bind.
    pub fn mark_stale(&mut self) {
        if !self.needs_update {
            log::debug!("{}: program marked stale", self.name);
        }
        self.needs_update = true;
    }

    pub(crate) fn clear_needs_update(&mut self) {
        self.needs_update = false;
    }
}
