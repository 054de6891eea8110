//! 加载器配置
//!
//! 所有参数扁平化，按值传入加载器，不使用全局状态。

use std::path::PathBuf;

/// 加载器配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// 纹理根目录，默认 None
    /// 为 None 时使用网格文件所在目录
    pub media_path: Option<PathBuf>,

    /// 加载纹理时是否垂直翻转图像，默认 true
    pub flip_textures_vertically: bool,

    /// 加载完成后是否输出汇总日志，默认 true
    pub log_summary: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            media_path: None,
            flip_textures_vertically: true,
            log_summary: true,
        }
    }
}

impl LoaderConfig {
    /// 指定纹理根目录
    pub fn with_media_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.media_path = Some(path.into());
        self
    }
}
