//! Skeletal Engine - 骨骼网格与关键帧动画装配
//!
//! 将解析后的网格/骨骼/动画记录装配为可直接渲染的网格对象：
//! - 骨骼层级构建（父骨骼索引必须先于子骨骼）
//! - 顶点骨骼权重裁剪（最多 4 个）与归一化
//! - 两种 GPU 顶点布局（纯顶点色 / 漫反射贴图）
//! - 单材质与多材质解析，纹理按文件名去重
//! - 关键帧动画轨道绑定到骨骼

pub mod animation;
pub mod config;
pub mod loader;
pub mod model;
pub mod parser;
pub mod skeleton;
pub mod skinning;
pub mod texture;

pub use animation::{AnimationTrack, KeyFrame, SkeletalAnimation};
pub use config::LoaderConfig;
pub use loader::SkeletalLoader;
pub use model::{
    BoundingBox, MaterialLeaf, MeshRenderType, ResolvedMaterial, SkeletalMesh, VertexBuffer,
};
pub use parser::{AnimationRecord, JsonRecordParser, MeshRecord, RecordParser};
pub use skeleton::{Bone, Skeleton};
pub use skinning::{BoneWeight, VertexWeight, MAX_INFLUENCES};
pub use texture::{ImageTextureLoader, Texture, TextureLoader};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkeletalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Skeleton error: {0}")]
    Skeleton(String),

    #[error("Weight error: {0}")]
    Weight(String),

    #[error("Material error: {0}")]
    Material(String),

    #[error("Mesh assembly error: {0}")]
    MeshAssembly(String),

    #[error("Animation error: {0}")]
    Animation(String),

    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: Box<SkeletalError>,
    },
}

impl SkeletalError {
    /// 附加来源文件路径
    pub fn with_path<P: Into<PathBuf>>(self, path: P) -> Self {
        SkeletalError::Load {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// 剥离所有路径包装，返回最内层错误
    pub fn root_cause(&self) -> &SkeletalError {
        match self {
            SkeletalError::Load { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkeletalError>;
