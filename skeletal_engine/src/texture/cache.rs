//! 单次加载内的纹理缓存
//!
//! 每次网格加载创建一个缓存，加载结束即丢弃。同名文件共享同一个 `Arc<Texture>`。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Texture, TextureLoader};
use crate::Result;

/// 纹理缓存（按文件名去重）
pub struct TextureCache<'a, L: TextureLoader + ?Sized> {
    loader: &'a L,
    textures_path: PathBuf,
    textures: HashMap<String, Arc<Texture>>,
}

impl<'a, L: TextureLoader + ?Sized> TextureCache<'a, L> {
    pub fn new<P: Into<PathBuf>>(loader: &'a L, textures_path: P) -> Self {
        Self {
            loader,
            textures_path: textures_path.into(),
            textures: HashMap::new(),
        }
    }

    /// 纹理目录
    pub fn textures_path(&self) -> &Path {
        &self.textures_path
    }

    /// 获取纹理，未加载时通过加载器读取
    pub fn get_or_load(&mut self, file_name: &str) -> Result<Arc<Texture>> {
        if let Some(texture) = self.textures.get(file_name) {
            log::debug!("Texture cache hit: {}", file_name);
            return Ok(Arc::clone(texture));
        }

        let path = self.textures_path.join(file_name);
        let texture = Arc::new(self.loader.load_texture(file_name, &path)?);
        log::debug!(
            "Texture loaded: {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        self.textures.insert(file_name.to_string(), Arc::clone(&texture));
        Ok(texture)
    }

    /// 已加载的不同纹理数量
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
