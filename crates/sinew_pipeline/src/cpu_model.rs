//! CPU-animated model building.
//!
//! Runs the animation builder, then converts every skinned mesh left in the
//! processed scene into [`SkinnedVertexData`] ready for
//! [`CpuSkinnedVertexBuffer`](sinew_skinning::CpuSkinnedVertexBuffer).

use glam::{Vec2, Vec4};
use sinew_animation::{AnimationSet, Skeleton};
use sinew_core::{Result, SinewError};
use sinew_skinning::{SkinVertex, SkinnedVertexData, VertexDeclaration};

use crate::content::{BoneWeight, GeometryContent, NodeContent};
use crate::processor::AnimationsProcessor;
use crate::settings::ProcessorSettings;

/// Bone influences kept per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// Vertex data of one mesh, one entry per geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedMeshContent {
    pub name: String,
    pub parts: Vec<SkinnedVertexData>,
}

#[derive(Debug, Clone)]
pub struct CpuAnimatedModelContent {
    pub animations: AnimationSet,
    pub meshes: Vec<SkinnedMeshContent>,
}

#[derive(Debug, Clone, Default)]
pub struct CpuAnimatedModelProcessor {
    settings: ProcessorSettings,
}

impl CpuAnimatedModelProcessor {
    #[must_use]
    pub fn new(settings: ProcessorSettings) -> Self {
        Self { settings }
    }

    pub fn process(&self, input: &mut NodeContent) -> Result<CpuAnimatedModelContent> {
        let animations = AnimationsProcessor::new(self.settings.clone()).process(input)?;
        let is_write_only = self.settings.vertex_buffer_type.is_write_only();

        let mut meshes = Vec::new();
        collect_meshes(input, animations.skeleton(), is_write_only, &mut meshes)?;

        Ok(CpuAnimatedModelContent { animations, meshes })
    }
}

fn collect_meshes(
    node: &NodeContent,
    skeleton: &Skeleton,
    is_write_only: bool,
    out: &mut Vec<SkinnedMeshContent>,
) -> Result<()> {
    if let Some(mesh) = node.as_mesh() {
        let parts = mesh
            .geometry
            .iter()
            .map(|g| convert_geometry(&node.name, g, skeleton, is_write_only))
            .collect::<Result<Vec<_>>>()?;
        out.push(SkinnedMeshContent {
            name: node.name.clone(),
            parts,
        });
    }
    for child in &node.children {
        collect_meshes(child, skeleton, is_write_only, out)?;
    }
    Ok(())
}

fn convert_geometry(
    mesh: &str,
    geometry: &GeometryContent,
    skeleton: &Skeleton,
    is_write_only: bool,
) -> Result<SkinnedVertexData> {
    let count = geometry.vertex_count();
    let weights = geometry
        .weights
        .as_ref()
        .ok_or_else(|| SinewError::InvalidContent(format!("mesh '{mesh}' has no bone weights")))?;

    let texture_coordinates = match &geometry.texture_coordinates {
        Some(uvs) => uvs.clone(),
        None => vec![Vec2::ZERO; count],
    };
    if geometry.normals.len() != count || weights.len() != count || texture_coordinates.len() != count
    {
        return Err(SinewError::InvalidContent(format!(
            "mesh '{mesh}' has mismatched vertex channels"
        )));
    }

    let vertices = geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .zip(weights)
        .map(|((&position, &normal), influences)| -> Result<SkinVertex> {
            let (blend_indices, blend_weights) = pack_influences(influences, skeleton)?;
            Ok(SkinVertex {
                position,
                normal,
                blend_indices,
                blend_weights,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    SkinnedVertexData::new(
        VertexDeclaration::skinned(),
        vertices,
        texture_coordinates,
        is_write_only,
    )
}

/// Keeps the strongest [`MAX_INFLUENCES`] weights, normalizes them to sum
/// to one and resolves bone names to indices.
pub fn pack_influences(influences: &[BoneWeight], skeleton: &Skeleton) -> Result<([u8; 4], Vec4)> {
    let mut sorted: Vec<&BoneWeight> = influences.iter().collect();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sorted.truncate(MAX_INFLUENCES);

    let total: f32 = sorted.iter().map(|w| w.weight).sum();
    let scale = if total > 0.0 { 1.0 / total } else { 0.0 };

    let mut indices = [0u8; 4];
    let mut weights = [0.0f32; 4];
    for (slot, influence) in sorted.iter().enumerate() {
        let bone = skeleton.bone_index(&influence.bone).ok_or_else(|| {
            SinewError::InvalidContent(format!(
                "vertex is weighted to bone '{}', which is not part of the skeleton",
                influence.bone
            ))
        })?;
        indices[slot] = u8::try_from(bone).map_err(|_| {
            SinewError::InvalidContent(format!("bone index {bone} does not fit a blend index"))
        })?;
        weights[slot] = influence.weight * scale;
    }

    Ok((indices, Vec4::from_array(weights)))
}
