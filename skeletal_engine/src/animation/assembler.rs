//! 动画装配：把逐骨骼关键帧记录绑定到网格骨骼数组

use std::sync::Arc;

use crate::model::{BoundingBox, SkeletalMesh};
use crate::parser::AnimationRecord;
use crate::{Result, SkeletalError};

use super::{AnimationTrack, KeyFrame, SkeletalAnimation};

/// 针对目标网格装配动画（不注册到网格）
///
/// 关键帧按源顺序追加，不重新排序。未给出包围盒时共享网格的包围盒。
pub fn assemble_animation(
    record: &AnimationRecord,
    mesh: &SkeletalMesh,
) -> Result<SkeletalAnimation> {
    let bone_count = mesh.bone_count();
    let mut bone_tracks: Vec<Option<AnimationTrack>> = vec![None; bone_count];

    for bone_frames in &record.bones_frames {
        let bone = bone_frames.id as usize;
        if bone >= bone_count {
            return Err(SkeletalError::Animation(format!(
                "Animation '{}' references bone {} but mesh '{}' has {} bones",
                record.name,
                bone,
                mesh.name(),
                bone_count
            )));
        }
        if bone_frames.key_frames.is_empty() {
            log::warn!(
                "Animation '{}': bone {} has an empty keyframe list",
                record.name,
                bone
            );
            // 没有关键帧的骨骼保持 None
            continue;
        }

        let track = bone_tracks[bone].get_or_insert_with(AnimationTrack::default);
        for key in &bone_frames.key_frames {
            track.push(KeyFrame::from(key));
        }
    }

    let bounding_box = match record.explicit_bounds() {
        Some((min, max)) => Arc::new(BoundingBox::from_arrays(min, max)),
        None => Arc::clone(mesh.bounding_box()),
    };

    log::debug!(
        "Animation '{}' assembled: {} frames at {} fps, {}/{} bones animated",
        record.name,
        record.frames_count,
        record.frame_rate,
        bone_tracks.iter().flatten().count(),
        bone_count
    );

    Ok(SkeletalAnimation::new(
        record.name.clone(),
        record.frame_rate,
        record.frames_count,
        bone_tracks,
        bounding_box,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assemble_mesh;
    use crate::parser::{BoneFramesRecord, BoneRecord, KeyFrameRecord, MeshRecord};
    use crate::skeleton::Skeleton;
    use crate::skinning::VertexWeight;

    fn mesh(bone_count: usize) -> SkeletalMesh {
        let record = MeshRecord {
            name: "tri".to_string(),
            vertices_coordinates: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0],
            coordinates_indices: vec![0, 1, 2],
            color_indices: vec![0, 0, 0],
            vertices_colors: vec![0],
            bones: (0..bone_count)
                .map(|i| BoneRecord {
                    id: i as i32,
                    name: format!("bone{}", i),
                    parent_id: i as i32 - 1,
                    start_position: [0.0; 3],
                    start_rotation: [0.0, 0.0, 0.0, 1.0],
                })
                .collect(),
            ..Default::default()
        };
        let skeleton = Arc::new(Skeleton::from_records(&record.bones).unwrap());
        assemble_mesh(&record, skeleton, vec![VertexWeight::default(); 3], None).unwrap()
    }

    fn key(frame: u32, x: f32) -> KeyFrameRecord {
        KeyFrameRecord {
            frame,
            position: [x, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    fn record(name: &str, bone_ids: &[u32]) -> AnimationRecord {
        AnimationRecord {
            name: name.to_string(),
            frame_rate: 30,
            frames_count: 20,
            bones_frames: bone_ids
                .iter()
                .map(|&id| BoneFramesRecord {
                    id,
                    key_frames: vec![key(0, 0.0), key(10, 1.0)],
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tracks_sized_to_bone_count() {
        let mesh = mesh(4);
        let animation = assemble_animation(&record("wave", &[1, 3]), &mesh).unwrap();

        assert_eq!(animation.bone_tracks().len(), 4);
        assert!(animation.track(0).is_none());
        assert_eq!(animation.track(1).unwrap().len(), 2);
        assert!(animation.track(2).is_none());
        assert_eq!(animation.animated_bone_count(), 2);
        // 没有给出包围盒时共享网格的
        assert!(Arc::ptr_eq(animation.bounding_box(), mesh.bounding_box()));
    }

    #[test]
    fn test_keyframes_keep_source_order() {
        let mesh = mesh(1);
        let mut rec = record("jump", &[]);
        rec.bones_frames.push(BoneFramesRecord {
            id: 0,
            key_frames: vec![key(10, 1.0), key(0, 0.0)],
        });
        rec.p_min = Some([-1.0; 3]);
        rec.p_max = Some([1.0; 3]);

        let animation = assemble_animation(&rec, &mesh).unwrap();
        let frames: Vec<u32> = animation
            .track(0)
            .unwrap()
            .keyframes()
            .iter()
            .map(|k| k.frame)
            .collect();
        assert_eq!(frames, vec![10, 0]);
        assert!(!Arc::ptr_eq(animation.bounding_box(), mesh.bounding_box()));
        assert_eq!(animation.bounding_box().max, glam::Vec3::ONE);
    }

    #[test]
    fn test_empty_keyframe_list_leaves_bone_absent() {
        let mesh = mesh(2);
        let mut rec = record("still", &[1]);
        rec.bones_frames.push(BoneFramesRecord {
            id: 0,
            key_frames: Vec::new(),
        });

        let animation = assemble_animation(&rec, &mesh).unwrap();

        assert!(animation.track(0).is_none());
        assert_eq!(animation.track(1).unwrap().len(), 2);
        assert_eq!(animation.animated_bone_count(), 1);
    }

    #[test]
    fn test_unknown_bone_fails() {
        let mesh = mesh(2);
        let err = assemble_animation(&record("bad", &[2]), &mesh).unwrap_err();
        assert!(matches!(err, SkeletalError::Animation(_)));
    }

    #[test]
    fn test_same_name_replaces() {
        let mut mesh = mesh(2);
        let first = assemble_animation(&record("walk", &[0]), &mesh).unwrap();
        let second = assemble_animation(&record("walk", &[0, 1]), &mesh).unwrap();

        assert!(mesh.add_animation(first).is_none());
        assert!(mesh.add_animation(second).is_some());
        assert_eq!(mesh.animation_count(), 1);
        assert_eq!(mesh.animation("walk").unwrap().animated_bone_count(), 2);
    }
}
