//! Lazy program compilation.
//!
//! Define mutations only flip [`ShaderMaterial::needs_update`]. The program
//! is rebuilt when the material is next bound, so several define writes in
//! one frame cost a single compile.

use super::ShaderMaterial;
use crate::error::LucentError;

/// Turns a material's sources, defines and render state into a program.
pub trait ProgramBuilder {
    /// The compiled artefact (naga IR, a wgpu pipeline, ...).
    type Program;

    /// Compile `material` as it currently stands.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying shader compiler reports.
    fn build(
        &mut self,
        material: &ShaderMaterial,
    ) -> Result<Self::Program, LucentError>;
}

/// The compiled program of one material, rebuilt on demand.
#[derive(Debug)]
pub struct ProgramCache<P> {
    program: Option<P>,
    builds: u32,
}

impl<P> Default for ProgramCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ProgramCache<P> {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            program: None,
            builds: 0,
        }
    }

    /// Return the program for `material`, building it first if nothing is
    /// cached or the material's defines changed since the last build.
    ///
    /// On a failed build the previous program stays cached and the material
    /// stays stale, so the next bind retries.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error.
    pub fn bind<B>(
        &mut self,
        material: &mut ShaderMaterial,
        builder: &mut B,
    ) -> Result<&P, LucentError>
    where
        B: ProgramBuilder<Program = P> + ?Sized,
    {
        let program = match self.program.take() {
            Some(program) if !material.needs_update() => program,
            previous => match builder.build(material) {
                Ok(program) => {
                    material.clear_needs_update();
                    self.builds += 1;
                    log::debug!(
                        "{}: program built (build #{})",
                        material.name(),
                        self.builds
                    );
                    program
                }
                Err(e) => {
                    self.program = previous;
                    return Err(e);
                }
            },
        };
        let program: &P = self.program.insert(program);
        Ok(program)
    }

    /// The cached program, without checking staleness.
    #[must_use]
    pub fn get(&self) -> Option<&P> {
        self.program.as_ref()
    }

    /// Whether a program has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.program.is_some()
    }

    /// How many times a program has been built.
    #[must_use]
    pub fn builds(&self) -> u32 {
        self.builds
    }

    /// Drop the cached program.
    pub fn clear(&mut self) {
        self.program = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{
        ShaderSource, UniformValue, FULLSCREEN_VERTEX,
    };

    /// Records the define table it was asked to compile.
    #[derive(Default)]
    struct SnapshotBuilder {
        calls: u32,
        fail: bool,
    }

    impl ProgramBuilder for SnapshotBuilder {
        type Program = Vec<(String, String)>;

        fn build(
            &mut self,
            material: &ShaderMaterial,
        ) -> Result<Self::Program, LucentError> {
            self.calls += 1;
            if self.fail {
                return Err(LucentError::ShaderCompose("boom".to_owned()));
            }
            Ok(material
                .defines()
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect())
        }
    }

    fn material() -> ShaderMaterial {
        ShaderMaterial::new(
            "Probe",
            ShaderSource {
                vertex: FULLSCREEN_VERTEX,
                fragment: FULLSCREEN_VERTEX,
            },
            [("N", "1".to_owned())],
            [("gain", UniformValue::Float(1.0))],
        )
        .unwrap()
    }

    #[test]
    fn first_bind_builds_once() {
        let mut cache = ProgramCache::new();
        let mut builder = SnapshotBuilder::default();
        let mut m = material();
        let _ = cache.bind(&mut m, &mut builder).unwrap();
        let _ = cache.bind(&mut m, &mut builder).unwrap();
        assert_eq!(builder.calls, 1);
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn several_define_writes_cost_one_rebuild() {
        let mut cache = ProgramCache::new();
        let mut builder = SnapshotBuilder::default();
        let mut m = material();
        let _ = cache.bind(&mut m, &mut builder).unwrap();

        m.set_define("N", "2").unwrap();
        m.set_define("N", "3").unwrap();
        m.set_define("M", "4").unwrap();
        assert_eq!(builder.calls, 1, "no compile until bind");

        let program = cache.bind(&mut m, &mut builder).unwrap();
        assert!(program.contains(&("N".to_owned(), "3".to_owned())));
        assert_eq!(builder.calls, 2);
        assert!(!m.needs_update());
    }

    #[test]
    fn uniform_writes_reuse_the_program() {
        let mut cache = ProgramCache::new();
        let mut builder = SnapshotBuilder::default();
        let mut m = material();
        let _ = cache.bind(&mut m, &mut builder).unwrap();
        m.set_uniform("gain", 0.5_f32).unwrap();
        let _ = cache.bind(&mut m, &mut builder).unwrap();
        assert_eq!(builder.calls, 1);
    }

    #[test]
    fn failed_rebuild_keeps_previous_program_and_stays_stale() {
        let mut cache = ProgramCache::new();
        let mut builder = SnapshotBuilder::default();
        let mut m = material();
        let _ = cache.bind(&mut m, &mut builder).unwrap();

        m.set_define("N", "9").unwrap();
        builder.fail = true;
        assert!(cache.bind(&mut m, &mut builder).is_err());
        assert!(m.needs_update());
        assert_eq!(
            cache.get().unwrap(),
            &vec![("N".to_owned(), "1".to_owned())]
        );

        builder.fail = false;
        let _ = cache.bind(&mut m, &mut builder).unwrap();
        assert_eq!(cache.builds(), 2);
    }
}
