//! CPU 蒙皮
//!
//! 蒙皮矩阵 = 当前全局变换 × 绑定姿态逆矩阵。顶点位置按缓冲中保存的
//! 4 个权重/骨骼索引混合。

use glam::{Mat4, Vec3};

use crate::animation::SkeletalAnimation;
use crate::model::SkeletalMesh;
use crate::skeleton::Skeleton;

/// 计算指定帧的蒙皮矩阵
///
/// 没有动画或骨骼没有轨道时使用绑定姿态的局部变换。
pub fn compute_skinning_matrices(
    skeleton: &Skeleton,
    animation: Option<&SkeletalAnimation>,
    frame: f32,
) -> Vec<Mat4> {
    let bone_count = skeleton.bone_count();
    let mut globals: Vec<Mat4> = Vec::with_capacity(bone_count);

    for (index, bone) in skeleton.bones().iter().enumerate() {
        let sampled = animation
            .and_then(|a| a.track(index))
            .and_then(|track| track.sample(frame));
        let local = match sampled {
            Some((position, rotation)) => Mat4::from_rotation_translation(rotation, position),
            None => bone.local_transform(),
        };

        // 父骨骼索引小于自身，已经计算过
        let global = match bone.parent_index {
            Some(parent) => globals[parent] * local,
            None => local,
        };
        globals.push(global);
    }

    globals
        .iter()
        .zip(skeleton.inverse_bind_matrices())
        .map(|(global, inverse_bind)| *global * *inverse_bind)
        .collect()
}

/// 混合顶点缓冲中的位置，返回每个角点的蒙皮后位置
pub fn skin_positions(mesh: &SkeletalMesh, matrices: &[Mat4]) -> Vec<Vec3> {
    let buffer = mesh.vertex_buffer();
    (0..buffer.len())
        .filter_map(|i| Some((buffer.position(i)?, buffer.blend(i)?)))
        .map(|(position, (weights, indices))| {
            skin_single_vertex(position, &weights, &indices, matrices)
        })
        .collect()
}

fn skin_single_vertex(
    position: Vec3,
    weights: &[f32; 4],
    indices: &[f32; 4],
    matrices: &[Mat4],
) -> Vec3 {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        // 刚性顶点
        return position;
    }

    let mut skinned = Vec3::ZERO;
    for (&w, &bone) in weights.iter().zip(indices) {
        if w == 0.0 {
            continue;
        }
        skinned += get_matrix(matrices, bone as usize).transform_point3(position) * w;
    }
    skinned
}

fn get_matrix(matrices: &[Mat4], index: usize) -> Mat4 {
    matrices.get(index).copied().unwrap_or(Mat4::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glam::Quat;

    use crate::animation::{AnimationTrack, KeyFrame};
    use crate::model::{assemble_mesh, BoundingBox};
    use crate::parser::{BoneRecord, MeshRecord, VertexWeightRecord};
    use crate::skinning::resolve_vertex_weights;

    fn bones() -> Vec<BoneRecord> {
        vec![
            BoneRecord {
                id: 0,
                name: "root".to_string(),
                parent_id: -1,
                start_position: [0.0; 3],
                start_rotation: [0.0, 0.0, 0.0, 1.0],
            },
            BoneRecord {
                id: 1,
                name: "arm".to_string(),
                parent_id: 0,
                start_position: [1.0, 0.0, 0.0],
                start_rotation: [0.0, 0.0, 0.0, 1.0],
            },
        ]
    }

    fn mesh() -> SkeletalMesh {
        let record = MeshRecord {
            name: "arm".to_string(),
            vertices_coordinates: vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 1.0, 0.0],
            coordinates_indices: vec![0, 1, 2],
            color_indices: vec![0, 0, 0],
            vertices_colors: vec![0],
            bones: bones(),
            vertices_weights: vec![
                VertexWeightRecord::new(1, 1, 1.0),
                VertexWeightRecord::new(2, 0, 1.0),
                VertexWeightRecord::new(2, 1, 1.0),
            ],
            ..Default::default()
        };
        let skeleton = Arc::new(Skeleton::from_records(&record.bones).unwrap());
        let weights = resolve_vertex_weights(3, &record.vertices_weights, &skeleton).unwrap();
        assemble_mesh(&record, skeleton, weights, None).unwrap()
    }

    #[test]
    fn test_bind_pose_is_identity() {
        let skeleton = Skeleton::from_records(&bones()).unwrap();
        let matrices = compute_skinning_matrices(&skeleton, None, 0.0);

        assert_eq!(matrices.len(), 2);
        for m in matrices {
            assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
        }
    }

    #[test]
    fn test_animated_child_moves_weighted_vertices() {
        let mesh = mesh();
        let track = AnimationTrack::new(vec![
            KeyFrame::new(0, Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY),
            KeyFrame::new(10, Vec3::new(1.0, 2.0, 0.0), Quat::IDENTITY),
        ]);
        let animation = SkeletalAnimation::new(
            "lift".to_string(),
            30,
            10,
            vec![None, Some(track)],
            Arc::new(BoundingBox::default()),
        );

        let matrices = compute_skinning_matrices(mesh.skeleton(), Some(&animation), 10.0);
        let positions = skin_positions(&mesh, &matrices);

        assert_eq!(positions.len(), 3);
        // 刚性顶点不动
        assert_eq!(positions[0], Vec3::ZERO);
        assert!((positions[1] - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
        // 两根骨骼各占一半
        assert!((positions[2] - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
    }
}
