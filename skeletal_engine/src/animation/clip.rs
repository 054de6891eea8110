//! 骨骼动画

use std::sync::Arc;

use crate::model::BoundingBox;

use super::AnimationTrack;

/// 绑定到某个网格骨骼数组的动画
///
/// `bone_tracks` 长度等于网格骨骼数，没有运动的骨骼为 None。
#[derive(Clone, Debug)]
pub struct SkeletalAnimation {
    pub name: String,
    pub frame_rate: u32,
    pub frames_count: u32,
    pub(crate) bone_tracks: Vec<Option<AnimationTrack>>,
    pub(crate) bounding_box: Arc<BoundingBox>,
}

impl SkeletalAnimation {
    pub fn new(
        name: String,
        frame_rate: u32,
        frames_count: u32,
        bone_tracks: Vec<Option<AnimationTrack>>,
        bounding_box: Arc<BoundingBox>,
    ) -> Self {
        Self {
            name,
            frame_rate,
            frames_count,
            bone_tracks,
            bounding_box,
        }
    }

    /// 动画时长（秒），帧率为 0 时返回 0
    pub fn duration(&self) -> f32 {
        if self.frame_rate == 0 {
            return 0.0;
        }
        self.frames_count as f32 / self.frame_rate as f32
    }

    pub fn bone_tracks(&self) -> &[Option<AnimationTrack>] {
        &self.bone_tracks
    }

    pub fn track(&self, bone: usize) -> Option<&AnimationTrack> {
        self.bone_tracks.get(bone).and_then(Option::as_ref)
    }

    /// 有关键帧的骨骼数量
    pub fn animated_bone_count(&self) -> usize {
        self.bone_tracks.iter().flatten().count()
    }

    pub fn bounding_box(&self) -> &Arc<BoundingBox> {
        &self.bounding_box
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let bounds = Arc::new(BoundingBox::default());
        let clip = SkeletalAnimation::new("walk".into(), 30, 45, vec![None], Arc::clone(&bounds));
        assert!((clip.duration() - 1.5).abs() < 1e-6);

        let frozen = SkeletalAnimation::new("idle".into(), 0, 45, vec![None], bounds);
        assert_eq!(frozen.duration(), 0.0);
        assert!(frozen.track(0).is_none());
        assert!(frozen.track(7).is_none());
    }
}
