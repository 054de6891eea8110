//! 纹理加载和缓存

pub(crate) mod cache;
mod loader;

pub use cache::TextureCache;
pub use loader::{ImageTextureLoader, TextureLoader};

/// 纹理数据
#[derive(Clone, Debug)]
pub struct Texture {
    /// 源文件名（缓存键）
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub has_alpha: bool,
}

impl Texture {
    pub fn new(file_name: String, width: u32, height: u32, data: Vec<u8>, has_alpha: bool) -> Self {
        Self { file_name, width, height, data, has_alpha }
    }

    /// 获取纹理字节数
    pub fn byte_count(&self) -> usize {
        self.data.len()
    }

    /// 每像素字节数（RGB 为 3，RGBA 为 4）
    pub fn bytes_per_pixel(&self) -> usize {
        if self.has_alpha { 4 } else { 3 }
    }
}
