//! CPU Skinning Tests
//!
//! Tests for:
//! - Linear blend skinning of positions and normals
//! - Range-scoped updates and uploads
//! - Bone range and vertex range validation
//! - Buffer duplication for per-instance skinning
//! - Player-to-skinner frame loop

use std::sync::Arc;

use glam::{Affine3A, Quat, Vec2, Vec3, Vec4};

use sinew::animation::{AnimationClip, AnimationPlayer, AnimationSet, Keyframe, Skeleton};
use sinew::core::{SinewError, TimeSpan};
use sinew::skinning::{
    BufferUsage, CpuSkinnedVertexBuffer, GpuVertexBuffer, HostVertexBuffer, SetDataOptions,
    SkinVertex, SkinnedVertexData, VertexDeclaration, VertexPositionNormalTexture,
    blend_transforms,
};

const EPSILON: f32 = 1e-5;
const STRIDE: usize = VertexPositionNormalTexture::STRIDE;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn host_buffer(vertices: usize) -> HostVertexBuffer {
    HostVertexBuffer::new(vertices * STRIDE, BufferUsage::WriteOnly, Some("skinned"))
}

fn rigid_strip(count: usize, bone: u8) -> SkinnedVertexData {
    let vertices = (0..count)
        .map(|i| SkinVertex::rigid(Vec3::new(i as f32, 0.0, 0.0), Vec3::Y, bone))
        .collect();
    let uvs = (0..count).map(|i| Vec2::new(i as f32 / count as f32, 0.0)).collect();
    SkinnedVertexData::new(VertexDeclaration::skinned(), vertices, uvs, true).unwrap()
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn single_bone_vertex_follows_its_bone() {
    let data = rigid_strip(4, 1);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(4)).unwrap();

    let bone = Affine3A::from_rotation_translation(Quat::from_rotation_z(0.7), Vec3::new(1.0, 2.0, 3.0));
    skinned
        .update_vertices(&[Affine3A::IDENTITY, bone], 0, 4)
        .unwrap();

    for (out, src) in skinned.vertices().iter().zip(&data.vertices) {
        assert!(approx_vec3(out.position, bone.transform_point3(src.position)));
        assert!(approx_vec3(out.normal, bone.transform_vector3(src.normal)));
    }
}

#[test]
fn weights_blend_bone_transforms_linearly() {
    let skin = [
        Affine3A::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        Affine3A::from_translation(Vec3::new(0.0, 4.0, 0.0)),
    ];
    let blended = blend_transforms(&skin, [0, 1, 0, 0], Vec4::new(0.5, 0.5, 0.0, 0.0));
    assert!(approx_vec3(Vec3::from(blended.translation), Vec3::new(1.0, 2.0, 0.0)));
    assert!(blended.matrix3.abs_diff_eq(glam::Mat3A::IDENTITY, EPSILON));
}

#[test]
fn normals_ignore_translation() {
    let data = rigid_strip(1, 0);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(1)).unwrap();
    skinned
        .update_vertices(&[Affine3A::from_translation(Vec3::splat(9.0))], 0, 1)
        .unwrap();
    assert_eq!(skinned.vertices()[0].normal, Vec3::Y);
    assert_eq!(skinned.vertices()[0].position, Vec3::splat(9.0));
}

#[test]
fn texture_coordinates_pass_through() {
    let data = rigid_strip(4, 0);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(4)).unwrap();
    skinned
        .update_vertices(&[Affine3A::from_rotation_x(1.0)], 0, 4)
        .unwrap();
    for (out, uv) in skinned.vertices().iter().zip(&data.texture_coordinates) {
        assert_eq!(out.texture_coordinate, *uv);
    }
}

// ============================================================================
// Ranges and Uploads
// ============================================================================

#[test]
fn construction_uploads_unskinned_vertices() {
    let data = rigid_strip(3, 0);
    let skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(3)).unwrap();

    let buffer = skinned.buffer();
    assert_eq!(buffer.version(), 1);
    assert_eq!(buffer.data(), bytemuck::cast_slice::<_, u8>(skinned.vertices()));
    assert_eq!(skinned.vertices()[2].position, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn update_touches_only_the_requested_range() {
    let data = rigid_strip(20, 0);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(20)).unwrap();
    let before = skinned.vertices().to_vec();

    let lift = [Affine3A::from_translation(Vec3::Y)];
    skinned.update_vertices(&lift, 10, 5).unwrap();

    for (i, (now, then)) in skinned.vertices().iter().zip(&before).enumerate() {
        if (10..15).contains(&i) {
            assert!(approx_vec3(now.position, then.position + Vec3::Y), "vertex {i}");
        } else {
            assert_eq!(now, then, "vertex {i} changed outside the range");
        }
    }

    let (range, options) = skinned.buffer().last_write().unwrap();
    assert_eq!(*range, 10 * STRIDE..15 * STRIDE);
    assert_eq!(*options, SetDataOptions::NoOverwrite);
    assert_eq!(
        &skinned.buffer().data()[range.clone()],
        bytemuck::cast_slice::<_, u8>(&skinned.vertices()[10..15])
    );
}

#[test]
fn empty_range_is_a_no_op() {
    let data = rigid_strip(4, 0);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(4)).unwrap();
    skinned.update_vertices(&[Affine3A::IDENTITY], 4, 0).unwrap();
    assert_eq!(skinned.buffer().version(), 1);
}

#[test]
fn range_past_the_end_is_rejected() {
    let data = rigid_strip(4, 0);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(4)).unwrap();
    assert!(matches!(
        skinned.update_vertices(&[Affine3A::IDENTITY], 2, 3),
        Err(SinewError::VertexRangeOutOfBounds { start: 2, end: 5, len: 4 })
    ));
    assert!(matches!(
        skinned.update_vertices(&[Affine3A::IDENTITY], usize::MAX, 2),
        Err(SinewError::VertexRangeOutOfBounds { .. })
    ));
}

#[test]
fn short_skin_array_is_rejected_before_any_work() {
    let data = rigid_strip(4, 3);
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(4)).unwrap();
    assert_eq!(skinned.max_bone_index(), Some(3));

    let before = skinned.vertices().to_vec();
    assert!(matches!(
        skinned.update_vertices(&[Affine3A::IDENTITY; 3], 0, 4),
        Err(SinewError::NotEnoughBoneTransforms { required: 3, provided: 3 })
    ));
    assert_eq!(skinned.vertices(), before.as_slice());
}

#[test]
fn undersized_buffer_is_rejected() {
    let data = rigid_strip(4, 0);
    assert!(matches!(
        CpuSkinnedVertexBuffer::new(&data, host_buffer(3)),
        Err(SinewError::BufferWriteOutOfBounds { .. })
    ));
}

// ============================================================================
// Duplication
// ============================================================================

#[test]
fn duplicates_share_input_but_skin_independently() {
    let data = rigid_strip(8, 0);
    let mut original = CpuSkinnedVertexBuffer::new(&data, host_buffer(8)).unwrap();
    original
        .update_vertices(&[Affine3A::from_translation(Vec3::Z)], 0, 8)
        .unwrap();

    let mut copy = original.duplicate(host_buffer(8)).unwrap();
    assert!(Arc::ptr_eq(original.source(), copy.source()));
    assert_eq!(copy.vertices(), original.vertices());
    assert_eq!(copy.buffer().data(), original.buffer().data());

    copy.update_vertices(&[Affine3A::from_translation(-Vec3::Z)], 0, 8)
        .unwrap();
    assert!(approx_vec3(original.vertices()[5].position, Vec3::new(5.0, 0.0, 1.0)));
    assert!(approx_vec3(copy.vertices()[5].position, Vec3::new(5.0, 0.0, -1.0)));
}

#[test]
fn shared_input_requires_matching_texture_coordinates() {
    let data = rigid_strip(4, 0);
    let source: Arc<[SkinVertex]> = Arc::from(data.vertices.as_slice());
    assert!(
        CpuSkinnedVertexBuffer::with_shared_input(source, &[Vec2::ZERO; 3], host_buffer(4))
            .is_err()
    );
}

// ============================================================================
// Frame Loop
// ============================================================================

#[test]
fn player_output_drives_the_skinner() -> anyhow::Result<()> {
    let skeleton = Skeleton::new(
        vec![Affine3A::IDENTITY, Affine3A::from_translation(Vec3::X)],
        vec![Affine3A::IDENTITY, Affine3A::from_translation(-Vec3::X)],
        vec![None, Some(0)],
        vec![Some("base".into()), Some("tip".into())],
    )?;
    let bend = AnimationClip::new(
        "bend",
        TimeSpan::from_secs_f64(1.0),
        vec![Keyframe::new(
            1,
            TimeSpan::from_secs_f64(0.5),
            Affine3A::from_rotation_translation(
                Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                Vec3::X,
            ),
        )],
    )?;
    let set = Arc::new(AnimationSet::new(skeleton, [bend])?);
    let mut player = AnimationPlayer::new(set)?;

    // One vertex one unit past the tip, bound to the tip
    let data = SkinnedVertexData::new(
        VertexDeclaration::skinned(),
        vec![SkinVertex::rigid(Vec3::new(2.0, 0.0, 0.0), Vec3::X, 1)],
        vec![Vec2::ZERO],
        true,
    )?;
    let mut skinned = CpuSkinnedVertexBuffer::new(&data, host_buffer(1))?;

    player.update(0.25, true, &Affine3A::IDENTITY)?;
    skinned.update_vertices(player.skin_transforms(), 0, 1)?;
    assert!(approx_vec3(skinned.vertices()[0].position, Vec3::new(2.0, 0.0, 0.0)));

    player.update(0.5, true, &Affine3A::IDENTITY)?;
    skinned.update_vertices(player.skin_transforms(), 0, 1)?;
    assert!(approx_vec3(skinned.vertices()[0].position, Vec3::new(1.0, 1.0, 0.0)));
    assert!(approx_vec3(skinned.vertices()[0].normal, Vec3::Y));
    assert_eq!(skinned.buffer().usage(), BufferUsage::WriteOnly);
    Ok(())
}
