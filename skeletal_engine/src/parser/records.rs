//! 解析后的中间记录
//!
//! 与文件格式无关的网格、材质、骨骼、动画数据，字段按源格式命名（camelCase）。

use serde::Deserialize;

/// 网格记录
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MeshRecord {
    pub name: String,
    /// 材质索引，-1 表示无材质（纯顶点色）
    #[serde(default = "no_material")]
    pub material_id: i32,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    /// 纹理子目录（相对于媒体目录）
    #[serde(default)]
    pub textures_dir: String,

    /// 顶点坐标（每 3 个 float 一个顶点）
    pub vertices_coordinates: Vec<f32>,
    #[serde(default)]
    pub vertices_normals: Option<Vec<f32>>,
    #[serde(default)]
    pub vertices_tangents: Option<Vec<f32>>,
    #[serde(default)]
    pub vertices_binormals: Option<Vec<f32>>,

    /// 每个三角形角点的坐标索引
    pub coordinates_indices: Vec<u32>,
    /// 纹理坐标（每 2 个 float 一组）
    #[serde(default)]
    pub texture_coordinates: Vec<f32>,
    #[serde(default)]
    pub tex_coordinates_indices: Vec<u32>,
    #[serde(default)]
    pub color_indices: Vec<u32>,
    /// 顶点色调色板（ARGB 打包，源格式为有符号 32 位）
    #[serde(default)]
    pub vertices_colors: Vec<i32>,
    /// 每个三角形的子材质索引
    #[serde(default)]
    pub materials_ids: Vec<u32>,

    #[serde(default)]
    pub bones: Vec<BoneRecord>,
    #[serde(default)]
    pub vertices_weights: Vec<VertexWeightRecord>,

    #[serde(default)]
    pub p_min: Option<[f32; 3]>,
    #[serde(default)]
    pub p_max: Option<[f32; 3]>,
}

impl MeshRecord {
    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices_coordinates.len() / 3
    }

    /// 三角形数量
    pub fn triangle_count(&self) -> usize {
        self.coordinates_indices.len() / 3
    }

    /// 材质索引（负数表示无材质）
    pub fn material_index(&self) -> Option<usize> {
        usize::try_from(self.material_id).ok()
    }

    /// 显式包围盒（min 与 max 必须同时存在）
    pub fn explicit_bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        self.p_min.zip(self.p_max)
    }
}

impl Default for MeshRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            material_id: no_material(),
            materials: Vec::new(),
            textures_dir: String::new(),
            vertices_coordinates: Vec::new(),
            vertices_normals: None,
            vertices_tangents: None,
            vertices_binormals: None,
            coordinates_indices: Vec::new(),
            texture_coordinates: Vec::new(),
            tex_coordinates_indices: Vec::new(),
            color_indices: Vec::new(),
            vertices_colors: Vec::new(),
            materials_ids: Vec::new(),
            bones: Vec::new(),
            vertices_weights: Vec::new(),
            p_min: None,
            p_max: None,
        }
    }
}

fn no_material() -> i32 {
    -1
}

/// 材质类型
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Standard,
    Multi,
}

/// 材质记录
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    #[serde(rename = "type", default)]
    pub kind: MaterialKind,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_ambient")]
    pub ambient_color: [f32; 4],
    #[serde(default = "default_diffuse")]
    pub diffuse_color: [f32; 4],
    #[serde(default = "default_specular")]
    pub specular_color: [f32; 4],
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub sub_materials: Vec<MaterialRecord>,
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Standard,
            name: String::new(),
            ambient_color: default_ambient(),
            diffuse_color: default_diffuse(),
            specular_color: default_specular(),
            file_name: None,
            sub_materials: Vec::new(),
        }
    }
}

fn default_ambient() -> [f32; 4] {
    [0.5, 0.5, 0.5, 1.0]
}

fn default_diffuse() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_specular() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// 骨骼记录
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoneRecord {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    /// 父骨骼索引，-1 表示根骨骼
    pub parent_id: i32,
    pub start_position: [f32; 3],
    /// 四元数 (x, y, z, w)
    pub start_rotation: [f32; 4],
}

/// 顶点权重三元组，JSON 中写作 `[vertex, bone, weight]`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VertexWeightRecord {
    pub vertex: u32,
    pub bone: u32,
    pub weight: f32,
}

impl VertexWeightRecord {
    pub fn new(vertex: u32, bone: u32, weight: f32) -> Self {
        Self { vertex, bone, weight }
    }
}

/// 动画记录
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnimationRecord {
    pub name: String,
    pub frame_rate: u32,
    pub frames_count: u32,
    #[serde(default)]
    pub bones_frames: Vec<BoneFramesRecord>,
    #[serde(default)]
    pub p_min: Option<[f32; 3]>,
    #[serde(default)]
    pub p_max: Option<[f32; 3]>,
}

impl AnimationRecord {
    pub fn explicit_bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        self.p_min.zip(self.p_max)
    }
}

/// 单个骨骼的关键帧记录
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoneFramesRecord {
    pub id: u32,
    #[serde(default)]
    pub key_frames: Vec<KeyFrameRecord>,
}

/// 关键帧记录
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct KeyFrameRecord {
    pub frame: u32,
    pub position: [f32; 3],
    /// 四元数 (x, y, z, w)
    pub rotation: [f32; 4],
}
