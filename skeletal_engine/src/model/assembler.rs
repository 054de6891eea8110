//! 网格装配
//!
//! 顶点缓冲按三角形角点展开（共享角点会重复），骨骼权重仍按原始顶点索引查找；
//! 索引缓冲因此是 j -> j 的平铺映射。

use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::parser::MeshRecord;
use crate::skeleton::Skeleton;
use crate::skinning::VertexWeight;
use crate::{Result, SkeletalError};

use super::{
    BoundingBox, ColorVertex, DiffuseMapVertex, MeshRenderType, ResolvedMaterial, SkeletalMesh,
    VertexBuffer,
};

/// 装配骨骼网格
///
/// `material` 必须与记录的 `material_id` 一致：-1 对应 None（纯顶点色布局），
/// 否则对应已解析的材质（漫反射贴图布局）。
pub fn assemble_mesh(
    record: &MeshRecord,
    skeleton: Arc<Skeleton>,
    vertex_weights: Vec<VertexWeight>,
    material: Option<ResolvedMaterial>,
) -> Result<SkeletalMesh> {
    let render_type = match (record.material_index(), &material) {
        (None, None) => MeshRenderType::VertexColor,
        (Some(_), Some(_)) => MeshRenderType::DiffuseMap,
        (Some(id), None) => {
            return Err(assembly_error(format!("Material {} was not resolved", id)));
        }
        (None, Some(_)) => {
            return Err(assembly_error(
                "Mesh has no material id but a material was supplied".to_string(),
            ));
        }
    };

    validate_geometry(record, render_type)?;

    if vertex_weights.len() != record.vertex_count() {
        return Err(assembly_error(format!(
            "Vertex weight count {} does not match vertex count {}",
            vertex_weights.len(),
            record.vertex_count()
        )));
    }

    let corners = CornerReader { record, weights: &vertex_weights };
    let corner_count = record.coordinates_indices.len();

    let vertex_buffer = match render_type {
        MeshRenderType::VertexColor => {
            VertexBuffer::VertexColor((0..corner_count).map(|j| corners.color_vertex(j)).collect())
        }
        MeshRenderType::DiffuseMap => {
            VertexBuffer::DiffuseMap((0..corner_count).map(|j| corners.diffuse_vertex(j)).collect())
        }
    };

    // 顶点缓冲已按角点展开，索引直接平铺
    let indices: Vec<u32> = (0..corner_count as u32).collect();

    let attribute_buffer = match &material {
        Some(ResolvedMaterial::Multi(leaves)) => {
            Some(build_attribute_buffer(record, leaves.len())?)
        }
        _ => None,
    };

    let bounding_box = match record.explicit_bounds() {
        Some((min, max)) => BoundingBox::from_arrays(min, max),
        None => BoundingBox::from_points(vertex_buffer.positions()),
    };

    log::debug!(
        "Mesh '{}' assembled: {:?}, {} corners, {} triangles",
        record.name,
        render_type,
        corner_count,
        record.triangle_count()
    );

    Ok(SkeletalMesh {
        name: record.name.clone(),
        render_type,
        vertex_buffer,
        indices,
        skeleton,
        vertex_weights,
        material,
        attribute_buffer,
        bounding_box: Arc::new(bounding_box),
        animations: Default::default(),
    })
}

/// 按角点读取源数据（调用前已完成校验）
struct CornerReader<'a> {
    record: &'a MeshRecord,
    weights: &'a [VertexWeight],
}

impl CornerReader<'_> {
    fn coord_index(&self, corner: usize) -> usize {
        self.record.coordinates_indices[corner] as usize
    }

    fn position(&self, corner: usize) -> Vec3 {
        vec3_at(&self.record.vertices_coordinates, self.coord_index(corner))
    }

    fn color(&self, corner: usize) -> u32 {
        let color_index = self.record.color_indices[corner] as usize;
        // 源格式为有符号 ARGB，按位重解释
        self.record.vertices_colors[color_index] as u32
    }

    fn tex_coord(&self, corner: usize) -> Vec2 {
        let i = self.record.tex_coordinates_indices[corner] as usize * 2;
        let uv = &self.record.texture_coordinates;
        Vec2::new(uv[i], uv[i + 1])
    }

    /// 缺失的通道填零向量
    fn channel(&self, channel: Option<&Vec<f32>>, corner: usize) -> Vec3 {
        channel.map_or(Vec3::ZERO, |data| vec3_at(data, self.coord_index(corner)))
    }

    fn blend(&self, corner: usize) -> ([f32; 4], [f32; 4]) {
        self.weights[self.coord_index(corner)].blend_weights_and_indices()
    }

    fn color_vertex(&self, corner: usize) -> ColorVertex {
        let (blend_weights, blend_indices) = self.blend(corner);
        ColorVertex {
            position: self.position(corner),
            color: self.color(corner),
            normal: self.channel(self.record.vertices_normals.as_ref(), corner),
            tangent: self.channel(self.record.vertices_tangents.as_ref(), corner),
            binormal: self.channel(self.record.vertices_binormals.as_ref(), corner),
            blend_weights,
            blend_indices,
        }
    }

    fn diffuse_vertex(&self, corner: usize) -> DiffuseMapVertex {
        let (blend_weights, blend_indices) = self.blend(corner);
        DiffuseMapVertex {
            position: self.position(corner),
            color: self.color(corner),
            tex_coord: self.tex_coord(corner),
            normal: self.channel(self.record.vertices_normals.as_ref(), corner),
            tangent: self.channel(self.record.vertices_tangents.as_ref(), corner),
            binormal: self.channel(self.record.vertices_binormals.as_ref(), corner),
            blend_weights,
            blend_indices,
        }
    }
}

fn vec3_at(data: &[f32], vertex: usize) -> Vec3 {
    let i = vertex * 3;
    Vec3::new(data[i], data[i + 1], data[i + 2])
}

fn assembly_error(message: String) -> SkeletalError {
    SkeletalError::MeshAssembly(message)
}

/// 校验各索引数组长度与取值范围
fn validate_geometry(record: &MeshRecord, render_type: MeshRenderType) -> Result<()> {
    let corner_count = record.coordinates_indices.len();
    if corner_count % 3 != 0 {
        return Err(assembly_error(format!(
            "Corner index count {} is not a multiple of 3",
            corner_count
        )));
    }
    if record.vertices_coordinates.len() % 3 != 0 {
        return Err(assembly_error(format!(
            "Vertex coordinate count {} is not a multiple of 3",
            record.vertices_coordinates.len()
        )));
    }

    check_indices("coordinatesIndices", &record.coordinates_indices, record.vertex_count())?;

    check_corner_count("colorIndices", record.color_indices.len(), corner_count)?;
    check_indices("colorIndices", &record.color_indices, record.vertices_colors.len())?;

    let channels = [
        ("verticesNormals", &record.vertices_normals),
        ("verticesTangents", &record.vertices_tangents),
        ("verticesBinormals", &record.vertices_binormals),
    ];
    for (name, channel) in channels {
        if let Some(data) = channel {
            if data.len() != record.vertices_coordinates.len() {
                return Err(assembly_error(format!(
                    "{} has {} values but verticesCoordinates has {}",
                    name,
                    data.len(),
                    record.vertices_coordinates.len()
                )));
            }
        }
    }

    if render_type == MeshRenderType::DiffuseMap {
        if record.texture_coordinates.len() % 2 != 0 {
            return Err(assembly_error(format!(
                "Texture coordinate count {} is not a multiple of 2",
                record.texture_coordinates.len()
            )));
        }
        check_corner_count(
            "texCoordinatesIndices",
            record.tex_coordinates_indices.len(),
            corner_count,
        )?;
        check_indices(
            "texCoordinatesIndices",
            &record.tex_coordinates_indices,
            record.texture_coordinates.len() / 2,
        )?;
    }

    Ok(())
}

fn check_corner_count(name: &str, len: usize, corner_count: usize) -> Result<()> {
    if len != corner_count {
        return Err(assembly_error(format!(
            "{} has {} entries but there are {} corners",
            name, len, corner_count
        )));
    }
    Ok(())
}

fn check_indices(name: &str, indices: &[u32], limit: usize) -> Result<()> {
    match indices.iter().position(|&i| i as usize >= limit) {
        Some(pos) => Err(assembly_error(format!(
            "{}[{}] = {} is out of range (limit {})",
            name, pos, indices[pos], limit
        ))),
        None => Ok(()),
    }
}

/// 多材质：逐三角形复制子材质索引
fn build_attribute_buffer(record: &MeshRecord, submaterial_count: usize) -> Result<Vec<u32>> {
    let triangle_count = record.triangle_count();
    if record.materials_ids.len() != triangle_count {
        return Err(assembly_error(format!(
            "materialsIds has {} entries but mesh has {} triangles",
            record.materials_ids.len(),
            triangle_count
        )));
    }
    check_indices("materialsIds", &record.materials_ids, submaterial_count)?;
    Ok(record.materials_ids.clone())
}
