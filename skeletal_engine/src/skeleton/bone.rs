//! 骨骼节点

use glam::{Mat4, Quat, Vec3};

use crate::parser::BoneRecord;

/// 骨骼节点（构建后不可变）
#[derive(Clone, Debug)]
pub struct Bone {
    /// 在骨骼数组中的索引（即源记录中的位置）
    pub index: usize,
    pub name: String,
    /// 绑定姿态下相对父骨骼的位置
    pub start_position: Vec3,
    /// 绑定姿态下相对父骨骼的旋转
    pub start_rotation: Quat,
    /// 父骨骼索引（总是小于自身索引），根骨骼为 None
    pub parent_index: Option<usize>,
}

impl Bone {
    pub fn new(index: usize, name: String, start_position: Vec3, start_rotation: Quat) -> Self {
        Self {
            index,
            name,
            start_position,
            start_rotation,
            parent_index: None,
        }
    }

    /// 从骨骼记录创建（父骨骼由 Skeleton 构建时解析）
    pub(crate) fn from_record(index: usize, record: &BoneRecord) -> Self {
        let position = Vec3::from_array(record.start_position);
        let rotation = Quat::from_array(record.start_rotation);
        Self::new(index, record.name.clone(), position, rotation)
    }

    pub fn is_root(&self) -> bool {
        self.parent_index.is_none()
    }

    /// 绑定姿态的局部变换
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.start_rotation, self.start_position)
    }
}
