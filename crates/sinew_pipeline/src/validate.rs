use crate::content::{MeshContent, NodeContent};

/// Drops meshes that cannot be skinned and warns about meshes parented to
/// bones.
///
/// A mesh is skinnable when every one of its geometries carries bone
/// weights. Removed meshes take their subtree with them. The scene root
/// itself is never removed.
pub fn validate_meshes(input: &mut NodeContent) {
    validate_children(input, None);
}

fn validate_children(node: &mut NodeContent, parent_bone: Option<&str>) {
    let own_name = node.is_bone().then(|| node.name.clone());
    let parent_bone = own_name.as_deref().or(parent_bone);

    node.children.retain(|child| {
        let Some(mesh) = child.as_mesh() else {
            return true;
        };
        if let Some(bone) = parent_bone {
            log::warn!(
                "Mesh '{}' is a child of bone '{bone}'; meshes parented to bones are not \
                 handled correctly",
                child.name
            );
        }
        if mesh_has_skinning(mesh) {
            true
        } else {
            log::warn!(
                "Mesh '{}' has no skinning information, so it has been deleted",
                child.name
            );
            false
        }
    });

    for child in &mut node.children {
        validate_children(child, parent_bone);
    }
}

#[must_use]
pub fn mesh_has_skinning(mesh: &MeshContent) -> bool {
    mesh.geometry.iter().all(|g| g.has_skin_weights())
}
