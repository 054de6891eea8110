//! 装配完成的骨骼网格

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::SkeletalAnimation;
use crate::skeleton::Skeleton;
use crate::skinning::VertexWeight;
use crate::texture::Texture;

use super::{BoundingBox, MaterialLeaf, ResolvedMaterial, SubMesh, VertexBuffer};

/// 渲染类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshRenderType {
    /// 只有顶点色，无材质
    VertexColor,
    /// 一个或多个漫反射贴图
    DiffuseMap,
}

/// 骨骼网格
#[derive(Debug)]
pub struct SkeletalMesh {
    pub(crate) name: String,
    pub(crate) render_type: MeshRenderType,
    pub(crate) vertex_buffer: VertexBuffer,
    pub(crate) indices: Vec<u32>,
    pub(crate) skeleton: Arc<Skeleton>,
    pub(crate) vertex_weights: Vec<VertexWeight>,
    pub(crate) material: Option<ResolvedMaterial>,
    /// 每个三角形的子材质索引（仅多材质）
    pub(crate) attribute_buffer: Option<Vec<u32>>,
    pub(crate) bounding_box: Arc<BoundingBox>,
    pub(crate) animations: HashMap<String, Arc<SkeletalAnimation>>,
}

impl SkeletalMesh {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_type(&self) -> MeshRenderType {
        self.render_type
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 索引数据字节视图
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 获取顶点数量（按角点展开）
    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    pub fn bone_count(&self) -> usize {
        self.skeleton.bone_count()
    }

    /// 源顶点的骨骼权重（按原始顶点索引，不按角点）
    pub fn vertex_weights(&self) -> &[VertexWeight] {
        &self.vertex_weights
    }

    pub fn material(&self) -> Option<&ResolvedMaterial> {
        self.material.as_ref()
    }

    /// 每个绘制子集的材质（纯顶点色网格为空）
    pub fn materials(&self) -> &[MaterialLeaf] {
        self.material.as_ref().map(ResolvedMaterial::leaves).unwrap_or(&[])
    }

    /// 每个绘制子集的漫反射贴图
    pub fn diffuse_maps(&self) -> Vec<Option<Arc<Texture>>> {
        self.materials().iter().map(|m| m.texture.clone()).collect()
    }

    pub fn attribute_buffer(&self) -> Option<&[u32]> {
        self.attribute_buffer.as_deref()
    }

    /// 绘制子集数量
    pub fn subset_count(&self) -> usize {
        match self.render_type {
            MeshRenderType::VertexColor => 1,
            MeshRenderType::DiffuseMap => self.materials().len(),
        }
    }

    /// 按子材质划分三角形
    pub fn submeshes(&self) -> Vec<SubMesh> {
        let triangle_count = self.triangle_count() as u32;
        match &self.attribute_buffer {
            None => vec![SubMesh::new(0, (0..triangle_count).collect())],
            Some(attributes) => {
                let mut submeshes: Vec<SubMesh> = (0..self.subset_count())
                    .map(|id| SubMesh::new(id, Vec::new()))
                    .collect();
                for (triangle, &material_id) in attributes.iter().enumerate() {
                    submeshes[material_id as usize].triangles.push(triangle as u32);
                }
                submeshes
            }
        }
    }

    pub fn bounding_box(&self) -> &Arc<BoundingBox> {
        &self.bounding_box
    }

    // ========== 动画 ==========

    /// 注册动画，同名动画被覆盖，返回旧动画
    pub fn add_animation(
        &mut self,
        animation: SkeletalAnimation,
    ) -> Option<Arc<SkeletalAnimation>> {
        let name = animation.name.clone();
        let previous = self.animations.insert(name.clone(), Arc::new(animation));
        if previous.is_some() {
            log::debug!("Animation '{}' replaced on mesh '{}'", name, self.name);
        }
        previous
    }

    pub fn animation(&self, name: &str) -> Option<&Arc<SkeletalAnimation>> {
        self.animations.get(name)
    }

    pub fn animations(&self) -> &HashMap<String, Arc<SkeletalAnimation>> {
        &self.animations
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// 动画名称（排序后）
    pub fn animation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.animations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
