//! 记录解析
//!
//! 文本 -> 中间记录。装配流程只依赖 `RecordParser`，默认实现读取 JSON 文档。

mod records;

pub use records::{
    AnimationRecord, BoneFramesRecord, BoneRecord, KeyFrameRecord, MaterialKind,
    MaterialRecord, MeshRecord, VertexWeightRecord,
};

use std::fs;
use std::path::Path;

use crate::{Result, SkeletalError};

/// 记录解析器
pub trait RecordParser {
    /// 解析网格文档
    fn parse_mesh(&self, text: &str) -> Result<MeshRecord>;

    /// 解析动画文档
    fn parse_animation(&self, text: &str) -> Result<AnimationRecord>;
}

/// JSON 格式解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordParser;

impl RecordParser for JsonRecordParser {
    fn parse_mesh(&self, text: &str) -> Result<MeshRecord> {
        serde_json::from_str(text)
            .map_err(|e| SkeletalError::Parse(format!("Invalid mesh document: {}", e)))
    }

    fn parse_animation(&self, text: &str) -> Result<AnimationRecord> {
        serde_json::from_str(text)
            .map_err(|e| SkeletalError::Parse(format!("Invalid animation document: {}", e)))
    }
}

/// 读取整个文本文件
pub(crate) fn read_document<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path.as_ref()).map_err(SkeletalError::Io)
}
