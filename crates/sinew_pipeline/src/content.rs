//! Authored scene content.
//!
//! A minimal tree of nodes, bones and meshes as produced by a model importer.
//! Only what the animation builder needs is modelled: names, local
//! transforms, per-node animation channels, opaque importer data and, for
//! meshes, vertex geometry with per-vertex bone weights.

use glam::{Affine3A, Vec2, Vec3};
use indexmap::IndexMap;
use sinew_core::{TimeSpan, normal_matrix};

/// One raw sample of an animation channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationKeyframe {
    pub time: TimeSpan,
    pub transform: Affine3A,
}

impl AnimationKeyframe {
    #[must_use]
    pub fn new(time: TimeSpan, transform: Affine3A) -> Self {
        Self { time, transform }
    }
}

/// Samples for a single bone, in authored order.
pub type AnimationChannel = Vec<AnimationKeyframe>;

/// One authored animation: a duration and channels keyed by bone name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationContent {
    pub duration: TimeSpan,
    pub channels: IndexMap<String, AnimationChannel>,
}

impl AnimationContent {
    #[must_use]
    pub fn new(duration: TimeSpan) -> Self {
        Self {
            duration,
            channels: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, bone: impl Into<String>, keyframes: AnimationChannel) -> Self {
        self.channels.insert(bone.into(), keyframes);
        self
    }
}

/// Influence of one named bone on a vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneWeight {
    pub bone: String,
    pub weight: f32,
}

impl BoneWeight {
    #[must_use]
    pub fn new(bone: impl Into<String>, weight: f32) -> Self {
        Self {
            bone: bone.into(),
            weight,
        }
    }
}

/// A batch of vertices sharing one material.
///
/// All present channels have one entry per position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryContent {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texture_coordinates: Option<Vec<Vec2>>,
    pub weights: Option<Vec<Vec<BoneWeight>>>,
}

impl GeometryContent {
    #[must_use]
    pub fn has_skin_weights(&self) -> bool {
        self.weights.is_some()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Moves the vertices into the space of `transform`.
    pub fn transform(&mut self, transform: &Affine3A) {
        for p in &mut self.positions {
            *p = transform.transform_point3(*p);
        }
        let normal_matrix = normal_matrix(transform);
        for n in &mut self.normals {
            *n = Vec3::from(normal_matrix * n.to_vec3a()).normalize_or_zero();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshContent {
    pub geometry: Vec<GeometryContent>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeKind {
    #[default]
    Node,
    Bone,
    Mesh(MeshContent),
}

/// A node of the authored scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeContent {
    pub name: String,
    pub kind: NodeKind,
    /// Transform relative to the parent node.
    pub transform: Affine3A,
    pub children: Vec<NodeContent>,
    pub animations: IndexMap<String, AnimationContent>,
    /// Importer-specific data carried through untouched.
    pub opaque_data: IndexMap<String, serde_json::Value>,
}

impl NodeContent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bone(name: impl Into<String>, transform: Affine3A) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Bone,
            transform,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: MeshContent) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Mesh(mesh),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Affine3A) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: NodeContent) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_animation(mut self, name: impl Into<String>, animation: AnimationContent) -> Self {
        self.animations.insert(name.into(), animation);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_bone(&self) -> bool {
        matches!(self.kind, NodeKind::Bone)
    }

    #[must_use]
    pub fn as_mesh(&self) -> Option<&MeshContent> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshContent> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Follows a path of child indices from this node.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&NodeContent> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut NodeContent> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Product of the local transforms along `path`: maps the space of the
    /// node at `path` into this node's space.
    #[must_use]
    pub fn path_transform(&self, path: &[usize]) -> Option<Affine3A> {
        let mut node = self;
        let mut transform = Affine3A::IDENTITY;
        for &i in path {
            node = node.children.get(i)?;
            transform = transform * node.transform;
        }
        Some(transform)
    }

    /// Visits this node and all descendants depth-first, parents first.
    pub fn visit(&self, f: &mut impl FnMut(&NodeContent)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}
