use super::{Mesh, SceneNode, Texture, TextureSlot};

// ---------------------------------------------------------------------------
// MeshMaterial / MeshData
// ---------------------------------------------------------------------------

/// Texture slots of a standard surface material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshMaterial {
    /// Base color map.
    pub map: Option<Texture>,
    /// Normal map.
    pub normal_map: Option<Texture>,
    /// Emissive map.
    pub emissive_map: Option<Texture>,
    /// Metallic-roughness map.
    pub metalness_roughness_map: Option<Texture>,
    /// Ambient occlusion map.
    pub ao_map: Option<Texture>,
}

impl MeshMaterial {
    /// Mutable access to the texture in `slot`.
    pub fn slot_mut(&mut self, slot: TextureSlot) -> Option<&mut Texture> {
        match slot {
            TextureSlot::BaseColor => self.map.as_mut(),
            TextureSlot::Normal => self.normal_map.as_mut(),
            TextureSlot::Emissive => self.emissive_map.as_mut(),
            TextureSlot::MetallicRoughness => {
                self.metalness_roughness_map.as_mut()
            }
            TextureSlot::Occlusion => self.ao_map.as_mut(),
        }
    }
}

/// Mesh payload of a [`Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshData {
    /// Renders into shadow maps.
    pub cast_shadow: bool,
    /// Samples shadow maps.
    pub receive_shadow: bool,
    /// Surface material.
    pub material: MeshMaterial,
}

impl MeshData {
    /// A mesh with the given material and shadows disabled.
    #[must_use]
    pub fn with_material(material: MeshMaterial) -> Self {
        Self {
            material,
            ..Self::default()
        }
    }
}

impl Mesh for MeshData {
    fn cast_shadow(&self) -> bool {
        self.cast_shadow
    }

    fn receive_shadow(&self) -> bool {
        self.receive_shadow
    }

    fn set_shadows(&mut self, cast: bool, receive: bool) {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
    }

    fn texture_mut(&mut self, slot: TextureSlot) -> Option<&mut Texture> {
        self.material.slot_mut(slot)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// An owned scene tree node: a group, or a mesh with optional children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Node name from the source file.
    pub name: String,
    /// Mesh payload; `None` for plain groups.
    pub mesh: Option<MeshData>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// An empty group node.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A mesh node without children.
    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    /// Builder-style child insertion.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search for the first node called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Number of mesh nodes in this subtree.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some())
            + self.children.iter().map(Node::mesh_count).sum::<usize>()
    }
}

impl SceneNode for Node {
    fn as_mesh_mut(&mut self) -> Option<&mut dyn Mesh> {
        let mesh: &mut dyn Mesh = self.mesh.as_mut()?;
        Some(mesh)
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SceneNode> {
        let mut children: Vec<&mut dyn SceneNode> =
            Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            children.push(child);
        }
        children
    }
}
