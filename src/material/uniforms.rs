//! Named run-time shader constants.

use glam::{Vec2, Vec3, Vec4};

use super::validate_identifier;
use crate::error::{LucentError, NameKind};
use crate::scene::TextureHandle;

/// A GPU-visible uniform payload.
///
/// `Null` is a legal "not yet bound" placeholder; the consuming pass binds a
/// real resource before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UniformValue {
    /// Unbound placeholder.
    #[default]
    Null,
    /// Scalar float.
    Float(f32),
    /// Scalar signed integer.
    Int(i32),
    /// Two-component vector.
    Vec2(Vec2),
    /// Three-component vector.
    Vec3(Vec3),
    /// Four-component vector.
    Vec4(Vec4),
    /// Sampled texture.
    Texture(TextureHandle),
}

impl UniformValue {
    /// Variant name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Vec2(_) => "vec2",
            Self::Vec3(_) => "vec3",
            Self::Vec4(_) => "vec4",
            Self::Texture(_) => "texture",
        }
    }

    /// Whether this is the unbound placeholder.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<TextureHandle> for UniformValue {
    fn from(v: TextureHandle) -> Self {
        Self::Texture(v)
    }
}

impl From<Option<TextureHandle>> for UniformValue {
    fn from(v: Option<TextureHandle>) -> Self {
        v.map_or(Self::Null, Self::Texture)
    }
}

/// One declared uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    name: String,
    /// Current value.
    pub value: UniformValue,
}

impl Uniform {
    /// Uniform name as declared in the shader.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Uniforms owned by one material, in declaration order.
///
/// Assigning values never touches the compiled program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformRegistry {
    entries: Vec<Uniform>,
}

impl UniformRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with an initial value, replacing any earlier
    /// declaration of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::InvalidName`] if `name` is not a valid shader
    /// identifier.
    pub fn declare(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), LucentError> {
        validate_identifier(NameKind::Uniform, name)?;
        let value = value.into();
        match self.position(name) {
            Some(index) => self.entries[index].value = value,
            None => self.entries.push(Uniform {
                name: name.to_owned(),
                value,
            }),
        }
        Ok(())
    }

    /// Assign a new value to a declared uniform.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::UnknownUniform`] if `name` was never declared.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<UniformValue>,
    ) -> Result<(), LucentError> {
        let index = self
            .position(name)
            .ok_or_else(|| LucentError::UnknownUniform(name.to_owned()))?;
        self.entries[index].value = value.into();
        Ok(())
    }

    /// Current value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.entries
            .iter()
            .find(|u| u.name == name)
            .map(|u| &u.value)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Read a float uniform.
    ///
    /// # Errors
    ///
    /// Fails if the uniform is undeclared or holds another variant.
    pub fn float(&self, name: &str) -> Result<f32, LucentError> {
        match self.require(name)? {
            UniformValue::Float(v) => Ok(*v),
            other => Err(type_error(name, "float", other)),
        }
    }

    /// Read a vec2 uniform.
    ///
    /// # Errors
    ///
    /// Fails if the uniform is undeclared or holds another variant.
    pub fn vec2(&self, name: &str) -> Result<Vec2, LucentError> {
        match self.require(name)? {
            UniformValue::Vec2(v) => Ok(*v),
            other => Err(type_error(name, "vec2", other)),
        }
    }

    /// Read a texture uniform; `None` while it is still unbound.
    ///
    /// # Errors
    ///
    /// Fails if the uniform is undeclared or holds a non-texture value.
    pub fn texture(
        &self,
        name: &str,
    ) -> Result<Option<TextureHandle>, LucentError> {
        match self.require(name)? {
            UniformValue::Null => Ok(None),
            UniformValue::Texture(handle) => Ok(Some(*handle)),
            other => Err(type_error(name, "texture", other)),
        }
    }

    /// Names of uniforms still holding the null placeholder.
    pub fn unbound(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|u| u.value.is_null())
            .map(|u| u.name.as_str())
    }

    /// All uniforms in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Uniform> {
        self.entries.iter()
    }

    /// Number of declared uniforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no uniforms are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|u| u.name == name)
    }

    fn require(&self, name: &str) -> Result<&UniformValue, LucentError> {
        self.get(name)
            .ok_or_else(|| LucentError::UnknownUniform(name.to_owned()))
    }
}

fn type_error(
    name: &str,
    expected: &'static str,
    found: &UniformValue,
) -> LucentError {
    LucentError::UniformType {
        name: name.to_owned(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_rejects_malformed_names() {
        let mut uniforms = UniformRegistry::new();
        assert!(matches!(
            uniforms.declare("light position", 1.0_f32),
            Err(LucentError::InvalidName {
                kind: NameKind::Uniform,
                ..
            })
        ));
        assert!(uniforms.is_empty());
    }

    #[test]
    fn set_requires_a_declaration() {
        let mut uniforms = UniformRegistry::new();
        assert!(matches!(
            uniforms.set("density", 0.5_f32),
            Err(LucentError::UnknownUniform(name)) if name == "density"
        ));
    }

    #[test]
    fn redeclaring_keeps_one_entry() {
        let mut uniforms = UniformRegistry::new();
        uniforms.declare("decay", 1.0_f32).unwrap();
        uniforms.declare("decay", 0.9_f32).unwrap();
        assert_eq!(uniforms.len(), 1);
        assert_eq!(uniforms.float("decay").unwrap(), 0.9);
    }

    #[test]
    fn null_is_an_unbound_texture() {
        let mut uniforms = UniformRegistry::new();
        uniforms.declare("input_buffer", UniformValue::Null).unwrap();
        assert_eq!(uniforms.texture("input_buffer").unwrap(), None);
        assert_eq!(uniforms.unbound().collect::<Vec<_>>(), ["input_buffer"]);

        uniforms.set("input_buffer", TextureHandle(7)).unwrap();
        assert_eq!(
            uniforms.texture("input_buffer").unwrap(),
            Some(TextureHandle(7))
        );
        assert_eq!(uniforms.unbound().count(), 0);
    }

    #[test]
    fn typed_reads_report_the_stored_variant() {
        let mut uniforms = UniformRegistry::new();
        uniforms.declare("texel_size", Vec2::ZERO).unwrap();
        match uniforms.float("texel_size") {
            Err(LucentError::UniformType {
                expected, found, ..
            }) => {
                assert_eq!(expected, "float");
                assert_eq!(found, "vec2");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
