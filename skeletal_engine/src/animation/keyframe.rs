//! 动画关键帧

use glam::{Quat, Vec3};

use crate::parser::KeyFrameRecord;

/// 骨骼关键帧（骨骼局部空间）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyFrame {
    pub frame: u32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl KeyFrame {
    pub fn new(frame: u32, position: Vec3, rotation: Quat) -> Self {
        Self { frame, position, rotation }
    }
}

impl From<&KeyFrameRecord> for KeyFrame {
    fn from(record: &KeyFrameRecord) -> Self {
        Self::new(
            record.frame,
            Vec3::from_array(record.position),
            Quat::from_array(record.rotation),
        )
    }
}
