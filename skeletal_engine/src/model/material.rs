//! 材质解析
//!
//! 单材质解析为一个叶子；多材质解析为按源顺序排列的叶子数组，
//! 由每个三角形的材质索引选择。

use std::sync::Arc;

use glam::Vec4;

use crate::parser::{MaterialKind, MaterialRecord};
use crate::texture::{Texture, TextureCache, TextureLoader};
use crate::Result;

/// 叶子材质（颜色 + 可选纹理）
#[derive(Clone, Debug)]
pub struct MaterialLeaf {
    pub name: String,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub texture: Option<Arc<Texture>>,
}

impl MaterialLeaf {
    /// 由材质记录创建，纹理通过缓存加载
    pub fn resolve<L: TextureLoader + ?Sized>(
        record: &MaterialRecord,
        cache: &mut TextureCache<'_, L>,
    ) -> Result<Self> {
        let texture = match record.file_name.as_deref() {
            Some(file_name) if !file_name.is_empty() => Some(cache.get_or_load(file_name)?),
            _ => None,
        };

        Ok(Self {
            name: record.name.clone(),
            ambient: Vec4::from_array(record.ambient_color),
            diffuse: Vec4::from_array(record.diffuse_color),
            specular: Vec4::from_array(record.specular_color),
            texture,
        })
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

impl Default for MaterialLeaf {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec4::new(0.5, 0.5, 0.5, 1.0),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            texture: None,
        }
    }
}

/// 解析后的材质
#[derive(Clone, Debug)]
pub enum ResolvedMaterial {
    Leaf(MaterialLeaf),
    Multi(Vec<MaterialLeaf>),
}

impl ResolvedMaterial {
    /// 解析材质记录，纹理加载失败直接返回错误
    pub fn resolve<L: TextureLoader + ?Sized>(
        record: &MaterialRecord,
        cache: &mut TextureCache<'_, L>,
    ) -> Result<Self> {
        match record.kind {
            MaterialKind::Standard => {
                Ok(ResolvedMaterial::Leaf(MaterialLeaf::resolve(record, cache)?))
            }
            MaterialKind::Multi => {
                let mut leaves = Vec::with_capacity(record.sub_materials.len());
                for sub in &record.sub_materials {
                    if sub.kind == MaterialKind::Multi {
                        log::warn!(
                            "Nested multi-material '{}' inside '{}' is resolved as a single material",
                            sub.name,
                            record.name
                        );
                    }
                    leaves.push(MaterialLeaf::resolve(sub, cache)?);
                }
                Ok(ResolvedMaterial::Multi(leaves))
            }
        }
    }

    /// 子材质数量（单材质为 0）
    pub fn submaterial_count(&self) -> usize {
        match self {
            ResolvedMaterial::Leaf(_) => 0,
            ResolvedMaterial::Multi(leaves) => leaves.len(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ResolvedMaterial::Multi(_))
    }

    /// 每个绘制子集对应的叶子材质
    pub fn leaves(&self) -> &[MaterialLeaf] {
        match self {
            ResolvedMaterial::Leaf(leaf) => std::slice::from_ref(leaf),
            ResolvedMaterial::Multi(leaves) => leaves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::cache::tests::RecordingLoader;
    use crate::SkeletalError;

    fn leaf_record(file_name: Option<&str>) -> MaterialRecord {
        MaterialRecord {
            file_name: file_name.map(str::to_string),
            diffuse_color: [0.2, 0.4, 0.6, 1.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_leaf() {
        let loader = RecordingLoader::default();
        let mut cache = TextureCache::new(&loader, "tex");

        let material = ResolvedMaterial::resolve(&leaf_record(Some("a.png")), &mut cache).unwrap();

        assert!(!material.is_multi());
        assert_eq!(material.submaterial_count(), 0);
        let leaf = &material.leaves()[0];
        assert_eq!(leaf.diffuse, Vec4::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(leaf.texture.as_ref().unwrap().file_name, "a.png");
    }

    #[test]
    fn test_multi_shares_textures_by_file_name() {
        let loader = RecordingLoader::default();
        let mut cache = TextureCache::new(&loader, "tex");
        let record = MaterialRecord {
            kind: MaterialKind::Multi,
            sub_materials: vec![
                leaf_record(Some("a.png")),
                leaf_record(None),
                leaf_record(Some("a.png")),
            ],
            ..Default::default()
        };

        let material = ResolvedMaterial::resolve(&record, &mut cache).unwrap();
        let leaves = material.leaves();

        assert_eq!(material.submaterial_count(), 3);
        assert!(!leaves[1].has_texture());
        assert!(Arc::ptr_eq(
            leaves[0].texture.as_ref().unwrap(),
            leaves[2].texture.as_ref().unwrap()
        ));
        assert_eq!(loader.requests.borrow().len(), 1);
    }

    #[test]
    fn test_missing_texture_is_not_recovered() {
        let loader = RecordingLoader {
            missing: vec!["b.png".to_string()],
            ..Default::default()
        };
        let mut cache = TextureCache::new(&loader, "tex");
        let record = MaterialRecord {
            kind: MaterialKind::Multi,
            sub_materials: vec![leaf_record(Some("a.png")), leaf_record(Some("b.png"))],
            ..Default::default()
        };

        let err = ResolvedMaterial::resolve(&record, &mut cache).unwrap_err();
        assert!(matches!(err, SkeletalError::Material(_)));
    }
}
