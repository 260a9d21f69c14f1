//! The Sponza atrium demo asset.

use super::prewarm::{AssetPrewarmer, PrewarmReport, TextureUploader};
use super::sink::AssetSink;
use super::source::ModelSource;
use super::SceneLoader;
use crate::error::LucentError;
pub use crate::lighting::create_lights;

/// Sink key the prewarmed scene is published under.
pub const KEY: &str = "sponza";

/// Model path relative to the model root.
pub const MODEL_PATH: &str = "sponza/scene.gltf";

/// Fetchable URL of the model for `source`.
#[must_use]
pub fn url(source: &ModelSource) -> String {
    source.resolve(MODEL_PATH)
}

/// Load, prewarm and publish the scene under [`KEY`].
///
/// A failed load is returned unchanged; the sink is not touched and nothing
/// is prewarmed.
pub fn load<L, S>(
    loader: &mut L,
    source: &ModelSource,
    prewarmer: &AssetPrewarmer,
    sink: &mut S,
    uploader: &mut dyn TextureUploader,
) -> Result<PrewarmReport, LucentError>
where
    L: SceneLoader + ?Sized,
    S: AssetSink<L::Scene> + ?Sized,
{
    let url = url(source);
    log::debug!("loading {KEY} from {url}");
    let scene = loader.load(&url).inspect_err(|e| {
        log::warn!("failed to load {KEY} from {url}: {e}");
    })?;
    Ok(prewarmer.publish(KEY, scene, sink, uploader))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::assets::source::Environment;
    use crate::lighting::RigObject;
    use crate::scene::{MeshData, MeshMaterial, Node, Texture, TextureHandle};

    struct ScriptedLoader {
        result: Option<Result<Node, LucentError>>,
        requested: Vec<String>,
    }

    impl SceneLoader for ScriptedLoader {
        type Scene = Node;

        fn load(&mut self, url: &str) -> Result<Node, LucentError> {
            self.requested.push(url.to_owned());
            self.result
                .take()
                .unwrap_or_else(|| Err(LucentError::AssetLoad(url.to_owned())))
        }
    }

    #[derive(Default)]
    struct Uploads(Vec<TextureHandle>);

    impl TextureUploader for Uploads {
        fn max_anisotropy(&self) -> u16 {
            16
        }

        fn init_texture(&mut self, texture: &Texture) {
            self.0.push(texture.handle());
        }
    }

    fn source() -> ModelSource {
        ModelSource::new(Environment::Remote, "models", "https://cdn.test/m")
    }

    #[test]
    fn loaded_scene_is_prewarmed_and_published() {
        let material = MeshMaterial {
            map: Some(Texture::new(TextureHandle(7))),
            ..MeshMaterial::default()
        };
        let root = Node::group("root").with_child(Node::mesh(
            "floor",
            MeshData::with_material(material),
        ));
        let mut loader = ScriptedLoader {
            result: Some(Ok(root)),
            requested: Vec::new(),
        };
        let mut sink = HashMap::new();
        let mut uploads = Uploads::default();

        let report = load(
            &mut loader,
            &source(),
            &AssetPrewarmer::default(),
            &mut sink,
            &mut uploads,
        )
        .unwrap();

        assert_eq!(loader.requested, ["https://cdn.test/m/sponza/scene.gltf"]);
        assert_eq!(report.textures, 1);
        assert_eq!(uploads.0, [TextureHandle(7)]);
        assert!(sink.contains_key(KEY));
    }

    #[test]
    fn failed_load_leaves_the_sink_alone() {
        let mut loader = ScriptedLoader {
            result: Some(Err(LucentError::AssetLoad("404".to_owned()))),
            requested: Vec::new(),
        };
        let mut sink: HashMap<String, Node> = HashMap::new();
        let mut uploads = Uploads::default();

        let err = load(
            &mut loader,
            &source(),
            &AssetPrewarmer::default(),
            &mut sink,
            &mut uploads,
        )
        .unwrap_err();

        assert!(matches!(err, LucentError::AssetLoad(_)));
        assert!(sink.is_empty());
        assert!(uploads.0.is_empty());
    }

    #[test]
    fn lights_are_the_shared_rig() {
        assert_eq!(create_lights(false).len(), 3);
        assert!(matches!(create_lights(true)[3], RigObject::Helper(_)));
    }
}
