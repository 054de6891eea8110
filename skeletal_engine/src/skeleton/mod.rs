//! 骨骼系统
//!
//! 骨骼保存在单一数组中，父子关系用索引表示。
//! 父骨骼必须先于子骨骼出现，因此层级无环，全局变换可一次正向遍历求出。

mod bone;

pub use bone::Bone;

use std::collections::HashMap;

use glam::Mat4;

use crate::parser::BoneRecord;
use crate::{Result, SkeletalError};

/// 骨骼层级
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
    bind_global_transforms: Vec<Mat4>,
    inverse_bind_matrices: Vec<Mat4>,
}

impl Skeleton {
    /// 从骨骼记录构建骨骼层级
    ///
    /// 父索引必须为 -1 或严格小于自身索引，否则返回 `SkeletalError::Skeleton`。
    pub fn from_records(records: &[BoneRecord]) -> Result<Self> {
        let bone_count = records.len();
        let mut bones: Vec<Bone> = Vec::with_capacity(bone_count);
        let mut name_to_index = HashMap::with_capacity(bone_count);

        for (i, record) in records.iter().enumerate() {
            let mut bone = Bone::from_record(i, record);
            bone.parent_index = resolve_parent(i, record, bone_count)?;

            // 重名时保留第一个
            name_to_index.entry(bone.name.clone()).or_insert(i);
            bones.push(bone);
        }

        // 父骨骼总在前面，一次正向遍历即可得到绑定姿态的全局变换
        let mut bind_global_transforms: Vec<Mat4> = Vec::with_capacity(bone_count);
        for bone in &bones {
            let local = bone.local_transform();
            let global = match bone.parent_index {
                Some(parent) => bind_global_transforms[parent] * local,
                None => local,
            };
            bind_global_transforms.push(global);
        }
        let inverse_bind_matrices = bind_global_transforms.iter().map(Mat4::inverse).collect();

        log::debug!("Skeleton built: {} bones", bone_count);

        Ok(Self {
            bones,
            name_to_index,
            bind_global_transforms,
            inverse_bind_matrices,
        })
    }

    /// 获取骨骼数量
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// 获取骨骼
    pub fn get_bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// 通过名称查找骨骼
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 父骨骼
    pub fn parent_of(&self, index: usize) -> Option<&Bone> {
        self.bones
            .get(index)
            .and_then(|b| b.parent_index)
            .and_then(|p| self.bones.get(p))
    }

    /// 直接子骨骼索引
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .filter(move |b| b.parent_index == Some(index))
            .map(|b| b.index)
    }

    /// 绑定姿态的全局变换
    pub fn bind_global_transforms(&self) -> &[Mat4] {
        &self.bind_global_transforms
    }

    /// 逆绑定矩阵
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }
}

fn resolve_parent(index: usize, record: &BoneRecord, bone_count: usize) -> Result<Option<usize>> {
    if record.parent_id == -1 {
        return Ok(None);
    }

    let parent = usize::try_from(record.parent_id).map_err(|_| {
        SkeletalError::Skeleton(format!(
            "Bone {} '{}' has invalid parent index {}",
            index, record.name, record.parent_id
        ))
    })?;

    if parent >= bone_count {
        return Err(SkeletalError::Skeleton(format!(
            "Bone {} '{}' references parent {} out of range (bone count {})",
            index, record.name, parent, bone_count
        )));
    }
    if parent >= index {
        return Err(SkeletalError::Skeleton(format!(
            "Bone {} '{}' references unresolved parent {}: parents must be declared before children",
            index, record.name, parent
        )));
    }

    Ok(Some(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn bone(name: &str, parent_id: i32, position: [f32; 3]) -> BoneRecord {
        BoneRecord {
            id: 0,
            name: name.to_string(),
            parent_id,
            start_position: position,
            start_rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_build_hierarchy() {
        let records = vec![
            bone("root", -1, [0.0, 1.0, 0.0]),
            bone("spine", 0, [0.0, 1.0, 0.0]),
            bone("head", 1, [0.0, 0.5, 0.0]),
            bone("arm", 1, [1.0, 0.0, 0.0]),
        ];
        let skeleton = Skeleton::from_records(&records).unwrap();

        assert_eq!(skeleton.bone_count(), 4);
        assert!(skeleton.get_bone(0).unwrap().is_root());
        assert_eq!(skeleton.parent_of(2).unwrap().name, "spine");
        assert_eq!(skeleton.find_bone_by_name("arm"), Some(3));
        assert_eq!(skeleton.children_of(1).collect::<Vec<_>>(), vec![2, 3]);

        for b in skeleton.bones() {
            if let Some(parent) = b.parent_index {
                assert!(parent < b.index);
            }
        }
    }

    #[test]
    fn test_bind_transforms_accumulate() {
        let records = vec![
            bone("root", -1, [0.0, 1.0, 0.0]),
            bone("child", 0, [0.0, 2.0, 0.0]),
        ];
        let skeleton = Skeleton::from_records(&records).unwrap();

        let child_global = skeleton.bind_global_transforms()[1];
        let origin = child_global.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);

        let identity = child_global * skeleton.inverse_bind_matrices()[1];
        assert!(identity.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_rotation_order_xyzw() {
        let mut record = bone("root", -1, [0.0, 0.0, 0.0]);
        record.start_rotation = [0.0, 0.0, 0.70710677, 0.70710677];
        let skeleton = Skeleton::from_records(&[record]).unwrap();

        let rotation = skeleton.get_bone(0).unwrap().start_rotation;
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 1e-5));
    }

    #[test]
    fn test_forward_parent_reference_fails() {
        let records = vec![
            bone("b0", -1, [0.0; 3]),
            bone("b1", 0, [0.0; 3]),
            bone("b2", 5, [0.0; 3]),
            bone("b3", 0, [0.0; 3]),
            bone("b4", 0, [0.0; 3]),
            bone("b5", 0, [0.0; 3]),
        ];
        let err = Skeleton::from_records(&records).unwrap_err();
        assert!(matches!(err, SkeletalError::Skeleton(_)));
    }

    #[test]
    fn test_self_and_out_of_range_parent_fail() {
        let self_parent = vec![bone("b0", 0, [0.0; 3])];
        assert!(matches!(
            Skeleton::from_records(&self_parent),
            Err(SkeletalError::Skeleton(_))
        ));

        let out_of_range = vec![bone("b0", -1, [0.0; 3]), bone("b1", 9, [0.0; 3])];
        assert!(matches!(
            Skeleton::from_records(&out_of_range),
            Err(SkeletalError::Skeleton(_))
        ));

        let negative = vec![bone("b0", -3, [0.0; 3])];
        assert!(matches!(
            Skeleton::from_records(&negative),
            Err(SkeletalError::Skeleton(_))
        ));
    }

    #[test]
    fn test_empty_skeleton() {
        let skeleton = Skeleton::from_records(&[]).unwrap();
        assert!(skeleton.is_empty());
        assert!(skeleton.inverse_bind_matrices().is_empty());
    }
}
