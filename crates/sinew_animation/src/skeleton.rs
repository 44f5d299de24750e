//! Immutable bone hierarchy.
//!
//! Bones are stored in parent-before-child order: for every bone `i > 0`,
//! `parent(i) < i`, and bone 0 is the single root. This allows world
//! transforms to be accumulated in one forward pass.

use glam::Affine3A;
use rustc_hash::FxHashMap;
use sinew_core::{Result, SinewError};

#[derive(Debug, Clone)]
pub struct Skeleton {
    bind_pose: Vec<Affine3A>,
    inverse_bind_pose: Vec<Affine3A>,
    parents: Vec<Option<usize>>,
    bone_names: Vec<Option<String>>,
    bone_map: FxHashMap<String, usize>,
}

impl Skeleton {
    /// Builds a skeleton from parallel per-bone arrays.
    ///
    /// All arrays must have the same, non-zero length. Bone 0 must be the
    /// only bone without a parent and every other bone's parent index must
    /// be smaller than its own. Unnamed bones occupy an index but are not
    /// reachable through [`Skeleton::bone_index`]; when a name repeats, the
    /// first bone carrying it wins.
    pub fn new(
        bind_pose: Vec<Affine3A>,
        inverse_bind_pose: Vec<Affine3A>,
        parents: Vec<Option<usize>>,
        bone_names: Vec<Option<String>>,
    ) -> Result<Self> {
        let count = bind_pose.len();
        if count == 0 {
            return Err(SinewError::InvalidContent(
                "skeleton has no bones".to_string(),
            ));
        }
        if inverse_bind_pose.len() != count || parents.len() != count || bone_names.len() != count
        {
            return Err(SinewError::InvalidContent(format!(
                "mismatched skeleton arrays: {count} bind poses, {} inverse bind poses, \
                 {} parents, {} bone names",
                inverse_bind_pose.len(),
                parents.len(),
                bone_names.len()
            )));
        }

        for (i, parent) in parents.iter().enumerate() {
            match (i, parent) {
                (0, None) => {}
                (0, Some(p)) => {
                    return Err(SinewError::InvalidContent(format!(
                        "root bone has parent {p}"
                    )));
                }
                (_, None) => {
                    return Err(SinewError::InvalidContent(format!(
                        "bone {i} has no parent; only bone 0 may be a root"
                    )));
                }
                (_, Some(p)) if *p >= i => {
                    return Err(SinewError::InvalidContent(format!(
                        "bone {i} has parent {p}; parents must precede their children"
                    )));
                }
                _ => {}
            }
        }

        let mut bone_map = FxHashMap::default();
        for (i, name) in bone_names.iter().enumerate() {
            if let Some(name) = name {
                bone_map.entry(name.clone()).or_insert(i);
            }
        }

        Ok(Self {
            bind_pose,
            inverse_bind_pose,
            parents,
            bone_names,
            bone_map,
        })
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bind_pose.len()
    }

    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> &[Affine3A] {
        &self.bind_pose
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_pose(&self) -> &[Affine3A] {
        &self.inverse_bind_pose
    }

    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents.get(bone).copied().flatten()
    }

    #[inline]
    #[must_use]
    pub fn bone_names(&self) -> &[Option<String>] {
        &self.bone_names
    }

    #[must_use]
    pub fn bone_name(&self, bone: usize) -> Option<&str> {
        self.bone_names.get(bone).and_then(|n| n.as_deref())
    }

    /// Looks up a bone by name. Missing or unnamed bones yield `None`.
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_map.get(name).copied()
    }
}
