//! 单骨骼动画轨道

use glam::{Quat, Vec3};

use super::KeyFrame;

/// 单个骨骼的关键帧序列，保持源顺序
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationTrack {
    keyframes: Vec<KeyFrame>,
}

impl AnimationTrack {
    pub fn new(keyframes: Vec<KeyFrame>) -> Self {
        Self { keyframes }
    }

    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    pub fn push(&mut self, keyframe: KeyFrame) {
        self.keyframes.push(keyframe);
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// 获取最大帧索引
    pub fn max_frame_index(&self) -> u32 {
        self.keyframes.iter().map(|k| k.frame).max().unwrap_or(0)
    }

    /// 查找包围指定帧的前后关键帧
    fn search_closest(&self, frame: f32) -> (Option<&KeyFrame>, Option<&KeyFrame>) {
        let mut prev = None;
        let mut next = None;

        for kf in &self.keyframes {
            if kf.frame as f32 <= frame {
                prev = Some(kf);
            } else {
                next = Some(kf);
                break;
            }
        }

        (prev, next)
    }

    /// 求值指定帧（可为小数）
    ///
    /// 首帧之前取首帧，末帧之后取末帧；两帧之间位置线性插值、旋转球面插值。
    /// 空轨道返回 None。
    pub fn sample(&self, frame: f32) -> Option<(Vec3, Quat)> {
        match self.search_closest(frame) {
            (Some(prev), Some(next)) => {
                let span = next.frame.saturating_sub(prev.frame);
                if span == 0 {
                    return Some((prev.position, prev.rotation));
                }
                let t = ((frame - prev.frame as f32) / span as f32).clamp(0.0, 1.0);
                Some((
                    prev.position.lerp(next.position, t),
                    prev.rotation.slerp(next.rotation, t),
                ))
            }
            (Some(only), None) | (None, Some(only)) => Some((only.position, only.rotation)),
            (None, None) => None,
        }
    }
}
