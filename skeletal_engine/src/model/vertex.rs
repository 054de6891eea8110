//! GPU 顶点布局
//!
//! 两种固定布局：纯顶点色（无材质）与漫反射贴图（带纹理坐标）。
//! 字段偏移与 `LAYOUT` 描述保持一致。

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// 顶点属性格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float2,
    Float3,
    Float4,
    /// 打包的 32 位 ARGB 颜色
    Color,
}

impl VertexFormat {
    pub const fn size(self) -> u32 {
        match self {
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Color => 4,
        }
    }
}

/// 顶点属性用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexUsage {
    Position,
    Color,
    TextureCoordinate,
    Normal,
    Tangent,
    Binormal,
    BlendWeight,
    BlendIndices,
}

/// 顶点属性描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexElement {
    pub offset: u32,
    pub format: VertexFormat,
    pub usage: VertexUsage,
}

impl VertexElement {
    const fn new(offset: u32, format: VertexFormat, usage: VertexUsage) -> Self {
        Self { offset, format, usage }
    }
}

/// 顶点缓冲布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u32,
    pub elements: &'static [VertexElement],
}

/// 纯顶点色布局的顶点
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: Vec3,
    pub color: u32,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub binormal: Vec3,
    pub blend_weights: [f32; 4],
    pub blend_indices: [f32; 4],
}

impl ColorVertex {
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: 84,
        elements: &[
            VertexElement::new(0, VertexFormat::Float3, VertexUsage::Position),
            VertexElement::new(12, VertexFormat::Color, VertexUsage::Color),
            VertexElement::new(16, VertexFormat::Float3, VertexUsage::Normal),
            VertexElement::new(28, VertexFormat::Float3, VertexUsage::Tangent),
            VertexElement::new(40, VertexFormat::Float3, VertexUsage::Binormal),
            VertexElement::new(52, VertexFormat::Float4, VertexUsage::BlendWeight),
            VertexElement::new(68, VertexFormat::Float4, VertexUsage::BlendIndices),
        ],
    };
}

/// 漫反射贴图布局的顶点
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DiffuseMapVertex {
    pub position: Vec3,
    pub color: u32,
    pub tex_coord: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub binormal: Vec3,
    pub blend_weights: [f32; 4],
    pub blend_indices: [f32; 4],
}

impl DiffuseMapVertex {
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: 92,
        elements: &[
            VertexElement::new(0, VertexFormat::Float3, VertexUsage::Position),
            VertexElement::new(12, VertexFormat::Color, VertexUsage::Color),
            VertexElement::new(16, VertexFormat::Float2, VertexUsage::TextureCoordinate),
            VertexElement::new(24, VertexFormat::Float3, VertexUsage::Normal),
            VertexElement::new(36, VertexFormat::Float3, VertexUsage::Tangent),
            VertexElement::new(48, VertexFormat::Float3, VertexUsage::Binormal),
            VertexElement::new(60, VertexFormat::Float4, VertexUsage::BlendWeight),
            VertexElement::new(76, VertexFormat::Float4, VertexUsage::BlendIndices),
        ],
    };
}

/// 按角点展开的顶点缓冲
#[derive(Debug, Clone, PartialEq)]
pub enum VertexBuffer {
    VertexColor(Vec<ColorVertex>),
    DiffuseMap(Vec<DiffuseMapVertex>),
}

impl VertexBuffer {
    pub fn len(&self) -> usize {
        match self {
            VertexBuffer::VertexColor(v) => v.len(),
            VertexBuffer::DiffuseMap(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layout(&self) -> VertexLayout {
        match self {
            VertexBuffer::VertexColor(_) => ColorVertex::LAYOUT,
            VertexBuffer::DiffuseMap(_) => DiffuseMapVertex::LAYOUT,
        }
    }

    /// 顶点数据字节视图
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VertexBuffer::VertexColor(v) => bytemuck::cast_slice(v),
            VertexBuffer::DiffuseMap(v) => bytemuck::cast_slice(v),
        }
    }

    /// 第 i 个顶点的位置
    pub fn position(&self, index: usize) -> Option<Vec3> {
        match self {
            VertexBuffer::VertexColor(v) => v.get(index).map(|v| v.position),
            VertexBuffer::DiffuseMap(v) => v.get(index).map(|v| v.position),
        }
    }

    /// 所有顶点位置
    pub fn positions(&self) -> Vec<Vec3> {
        match self {
            VertexBuffer::VertexColor(v) => v.iter().map(|v| v.position).collect(),
            VertexBuffer::DiffuseMap(v) => v.iter().map(|v| v.position).collect(),
        }
    }

    /// 第 i 个顶点的混合权重与骨骼索引
    pub fn blend(&self, index: usize) -> Option<([f32; 4], [f32; 4])> {
        match self {
            VertexBuffer::VertexColor(v) => {
                v.get(index).map(|v| (v.blend_weights, v.blend_indices))
            }
            VertexBuffer::DiffuseMap(v) => {
                v.get(index).map(|v| (v.blend_weights, v.blend_indices))
            }
        }
    }
}
