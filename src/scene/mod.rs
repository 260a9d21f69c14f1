//! Caller-side scene graph interface.
//!
//! Loaded scenes are owned by whatever produced them. The prewarming code
//! only needs to walk a tree, recognise meshes and touch their texture
//! slots, so that is all [`SceneNode`] and [`Mesh`] expose. [`Node`] is a
//! plain in-memory implementation for loaders that have no graph of their
//! own.

mod node;
mod texture;

pub use node::{MeshData, MeshMaterial, Node};
pub use texture::{Texture, TextureHandle, TextureSlot};

/// A renderable mesh as seen by the prewarmer.
pub trait Mesh {
    /// Whether the mesh renders into shadow maps.
    fn cast_shadow(&self) -> bool;
    /// Whether the mesh samples shadow maps.
    fn receive_shadow(&self) -> bool;
    /// Set both shadow participation flags.
    fn set_shadows(&mut self, cast: bool, receive: bool);
    /// The texture bound to `slot` on this mesh's material, if any.
    fn texture_mut(&mut self, slot: TextureSlot) -> Option<&mut Texture>;
}

/// A node in an externally owned scene tree.
pub trait SceneNode {
    /// Classify the node: `Some` when it is a renderable mesh.
    fn as_mesh_mut(&mut self) -> Option<&mut dyn Mesh> {
        None
    }

    /// Direct children of this node.
    fn children_mut(&mut self) -> Vec<&mut dyn SceneNode>;
}
