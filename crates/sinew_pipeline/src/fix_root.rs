//! Importer root-bone repair.
//!
//! Some importers wrap the real root bone in an extra bone that sits at the
//! origin: a top-level bone with an identity absolute transform whose only
//! child is another identity bone. The wrapper then counts as part of the
//! skeleton and carries the animations meant for the real root.
//!
//! [`fix_real_bone_root`] detects exactly that shape among the direct
//! children of the scene root and rewrites it: the real root is detached and
//! re-attached to the scene root, it receives a copy of the wrapper's
//! animations, and the wrapper is demoted to a plain node keeping its name,
//! transform, animations and opaque data. Nothing else in the tree changes.

use glam::Affine3A;

use crate::content::{NodeContent, NodeKind};

/// Applies the repair to the first matching child, scanning from the last
/// child backwards. Returns `true` if the tree was changed.
pub fn fix_real_bone_root(input: &mut NodeContent) -> bool {
    let parent_absolute = input.transform;

    let found = input.children.iter().rposition(|node| {
        let absolute = parent_absolute * node.transform;
        node.is_bone()
            && absolute == Affine3A::IDENTITY
            && node.children.len() == 1
            && node.children[0].is_bone()
            && absolute * node.children[0].transform == Affine3A::IDENTITY
    });
    let Some(index) = found else {
        return false;
    };

    let wrapper = &mut input.children[index];
    let mut real_root = wrapper.children.remove(0);
    for (name, animation) in &wrapper.animations {
        real_root
            .animations
            .insert(name.clone(), animation.clone());
    }
    wrapper.kind = NodeKind::Node;

    log::debug!(
        "Promoted bone '{}' out of wrapper '{}'",
        real_root.name,
        wrapper.name
    );
    input.children.push(real_root);
    true
}
