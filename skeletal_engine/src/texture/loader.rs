//! 纹理加载
//!
//! - 根据原始通道数选择 RGB 或 RGBA 格式
//! - 可选垂直翻转图像

use std::path::Path;

use image::{DynamicImage, GenericImageView};

use super::Texture;
use crate::{Result, SkeletalError};

/// 纹理加载器
pub trait TextureLoader {
    /// 按完整路径加载纹理，`file_name` 为材质中引用的文件名
    fn load_texture(&self, file_name: &str, path: &Path) -> Result<Texture>;
}

/// 基于 image crate 的默认纹理加载器
#[derive(Debug, Clone, Copy)]
pub struct ImageTextureLoader {
    pub flip_vertically: bool,
}

impl Default for ImageTextureLoader {
    fn default() -> Self {
        Self { flip_vertically: true }
    }
}

impl ImageTextureLoader {
    pub fn new(flip_vertically: bool) -> Self {
        Self { flip_vertically }
    }

    /// 从内存加载纹理
    pub fn load_from_memory(&self, file_name: &str, data: &[u8]) -> Result<Texture> {
        let img = image::load_from_memory(data).map_err(|e| {
            SkeletalError::Material(format!("Failed to decode texture '{}': {}", file_name, e))
        })?;
        Ok(self.convert(file_name, &img))
    }

    fn convert(&self, file_name: &str, img: &DynamicImage) -> Texture {
        let (width, height) = img.dimensions();
        let has_alpha = has_alpha_channel(img);

        let data = if has_alpha {
            let rgba = img.to_rgba8();
            if self.flip_vertically {
                image::imageops::flip_vertical(&rgba).into_raw()
            } else {
                rgba.into_raw()
            }
        } else {
            let rgb = img.to_rgb8();
            if self.flip_vertically {
                image::imageops::flip_vertical(&rgb).into_raw()
            } else {
                rgb.into_raw()
            }
        };

        Texture::new(file_name.to_string(), width, height, data, has_alpha)
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&self, file_name: &str, path: &Path) -> Result<Texture> {
        let img = image::open(path).map_err(|e| {
            SkeletalError::Material(format!(
                "Failed to load texture '{}' from {}: {}",
                file_name,
                path.display(),
                e
            ))
        })?;
        Ok(self.convert(file_name, &img))
    }
}

/// 检查图片是否有透明通道
fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        // 上黑下白的 1x2 图像
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 128]));
        img.put_pixel(0, 1, Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_from_memory_flips() {
        let texture = ImageTextureLoader::new(true)
            .load_from_memory("a.png", &png_bytes())
            .unwrap();

        assert_eq!((texture.width, texture.height), (1, 2));
        assert!(texture.has_alpha);
        assert_eq!(texture.byte_count(), 8);
        assert_eq!(&texture.data[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_load_from_memory_without_flip() {
        let texture = ImageTextureLoader::new(false)
            .load_from_memory("a.png", &png_bytes())
            .unwrap();
        assert_eq!(&texture.data[0..4], &[0, 0, 0, 128]);
    }

    #[test]
    fn test_missing_file_is_material_error() {
        let err = ImageTextureLoader::default()
            .load_texture("missing.png", Path::new("/nonexistent/missing.png"))
            .unwrap_err();
        assert!(matches!(err, SkeletalError::Material(_)));
    }
}
