//! Skeleton discovery, transform baking and skeleton flattening.
//!
//! The skeleton root is addressed by its path of child indices from the
//! scene root, so the tree can be mutated between passes without holding
//! references into it.

use glam::Affine3A;
use sinew_core::{Result, SinewError};

use crate::content::NodeContent;

/// Path of child indices from the scene root to a node.
pub type NodePath = Vec<usize>;

/// One bone of a flattened skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBone {
    /// `None` for bones with an empty name.
    pub name: Option<String>,
    pub parent: Option<usize>,
    /// Local transform at rest.
    pub bind_pose: Affine3A,
    /// Rest transform in the scene root's space.
    pub absolute: Affine3A,
}

/// Finds the single skeleton root: a bone whose parent is not a bone.
pub fn find_skeleton(input: &NodeContent) -> Result<NodePath> {
    let mut roots = Vec::new();
    collect_skeleton_roots(input, false, &mut Vec::new(), &mut roots);

    let mut roots = roots.into_iter();
    let Some(first) = roots.next() else {
        return Err(SinewError::SkeletonNotFound);
    };
    if let Some(second) = roots.next() {
        let name = |path: &NodePath| {
            input
                .node_at(path)
                .map(|n| n.name.clone())
                .unwrap_or_default()
        };
        return Err(SinewError::MultipleSkeletons {
            first: name(&first),
            second: name(&second),
        });
    }
    Ok(first)
}

fn collect_skeleton_roots(
    node: &NodeContent,
    parent_is_bone: bool,
    path: &mut NodePath,
    roots: &mut Vec<NodePath>,
) {
    if roots.len() > 1 {
        return;
    }
    if node.is_bone() && !parent_is_bone {
        roots.push(path.clone());
    }
    for (i, child) in node.children.iter().enumerate() {
        path.push(i);
        collect_skeleton_roots(child, node.is_bone(), path, roots);
        path.pop();
    }
}

/// Bakes every non-skeleton local transform below the scene root into mesh
/// geometry, so all meshes end up in the scene root's space.
///
/// Each baked node passes its transform down to its direct children and is
/// reset to identity. The skeleton subtree is not entered, but the skeleton
/// root receives the transforms of its non-bone ancestors, together with the
/// animation channel that drives it.
pub fn flatten_transforms(input: &mut NodeContent, skeleton: &[usize]) {
    flatten_children(input, Some(skeleton));
}

fn flatten_children(node: &mut NodeContent, skeleton: Option<&[usize]>) {
    for (i, child) in node.children.iter_mut().enumerate() {
        let inner = match skeleton {
            Some([first, rest @ ..]) if *first == i => Some(rest),
            _ => None,
        };
        if inner.is_some_and(<[usize]>::is_empty) {
            continue;
        }

        let transform = child.transform;
        if transform != Affine3A::IDENTITY {
            if let Some(mesh) = child.as_mesh_mut() {
                for geometry in &mut mesh.geometry {
                    geometry.transform(&transform);
                }
            }
            for grandchild in &mut child.children {
                prepend_parent_transform(grandchild, &transform);
            }
            child.transform = Affine3A::IDENTITY;
        }

        flatten_children(child, inner);
    }
}

fn prepend_parent_transform(node: &mut NodeContent, parent: &Affine3A) {
    node.transform = *parent * node.transform;
    if node.is_bone() {
        for animation in node.animations.values_mut() {
            if let Some(channel) = animation.channels.get_mut(&node.name) {
                for keyframe in channel {
                    keyframe.transform = *parent * keyframe.transform;
                }
            }
        }
    }
}

/// Flattens the bone subtree at `skeleton` in depth-first pre-order.
///
/// Every bone's parent gets a smaller index than the bone itself; the root
/// is bone 0. Non-bone children of bones are not part of the skeleton.
pub fn flatten_skeleton(input: &NodeContent, skeleton: &[usize]) -> Result<Vec<FlatBone>> {
    let invalid = || SinewError::InvalidContent(format!("no skeleton root at path {skeleton:?}"));

    let root = input.node_at(skeleton).ok_or_else(invalid)?;
    let parent_path = skeleton.split_last().map_or(&[][..], |(_, rest)| rest);
    let parent_absolute = input.path_transform(parent_path).ok_or_else(invalid)?;

    let mut bones = Vec::new();
    push_bone(root, None, &parent_absolute, &mut bones);
    Ok(bones)
}

fn push_bone(
    node: &NodeContent,
    parent: Option<usize>,
    parent_absolute: &Affine3A,
    bones: &mut Vec<FlatBone>,
) {
    let absolute = *parent_absolute * node.transform;
    let index = bones.len();
    bones.push(FlatBone {
        name: (!node.name.is_empty()).then(|| node.name.clone()),
        parent,
        bind_pose: node.transform,
        absolute,
    });
    for child in node.children.iter().filter(|c| c.is_bone()) {
        push_bone(child, Some(index), &absolute, bones);
    }
}
