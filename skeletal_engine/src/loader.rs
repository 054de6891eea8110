//! 骨骼网格加载器
//!
//! 解析 -> 骨骼 -> 权重 -> 材质/纹理 -> 网格；动画文件逐个解析后绑定到网格。
//! 任一步失败整体失败，错误附带来源文件路径。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::animation::assemble_animation;
use crate::config::LoaderConfig;
use crate::model::{assemble_mesh, ResolvedMaterial, SkeletalMesh};
use crate::parser::{read_document, AnimationRecord, JsonRecordParser, MeshRecord, RecordParser};
use crate::skeleton::Skeleton;
use crate::skinning::resolve_vertex_weights;
use crate::texture::{ImageTextureLoader, TextureCache, TextureLoader};
use crate::{Result, SkeletalError};

/// 骨骼网格加载器
///
/// 解析器与纹理加载器可替换，默认读取 JSON 文档并用 image crate 解码纹理。
#[derive(Debug, Clone)]
pub struct SkeletalLoader<P = JsonRecordParser, T = ImageTextureLoader> {
    parser: P,
    texture_loader: T,
    config: LoaderConfig,
}

impl SkeletalLoader {
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        let texture_loader = ImageTextureLoader::new(config.flip_textures_vertically);
        Self {
            parser: JsonRecordParser,
            texture_loader,
            config,
        }
    }
}

impl Default for SkeletalLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RecordParser, T: TextureLoader> SkeletalLoader<P, T> {
    pub fn with_parts(parser: P, texture_loader: T, config: LoaderConfig) -> Self {
        Self {
            parser,
            texture_loader,
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    // ========== 文件入口 ==========

    /// 加载网格文件，纹理根目录取配置或网格文件所在目录
    pub fn load_mesh_from_file<Q: AsRef<Path>>(&self, path: Q) -> Result<SkeletalMesh> {
        let path = path.as_ref();
        let media_path = match &self.config.media_path {
            Some(media_path) => media_path.clone(),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        self.load_mesh_from_file_with_media(path, media_path)
    }

    /// 加载网格文件并指定纹理根目录
    pub fn load_mesh_from_file_with_media<Q: AsRef<Path>, M: AsRef<Path>>(
        &self,
        path: Q,
        media_path: M,
    ) -> Result<SkeletalMesh> {
        let path = path.as_ref();
        log::debug!("Loading mesh: {}", path.display());

        read_document(path)
            .and_then(|text| self.load_mesh_from_str(&text, media_path))
            .map_err(|e| e.with_path(path))
    }

    /// 加载网格及其动画文件，任一文件失败则整体失败
    pub fn load_mesh_and_animations_from_file<Q: AsRef<Path>, A: AsRef<Path>>(
        &self,
        mesh_path: Q,
        animation_paths: &[A],
    ) -> Result<SkeletalMesh> {
        let mut mesh = self.load_mesh_from_file(mesh_path)?;
        for animation_path in animation_paths {
            self.load_animation_from_file(&mut mesh, animation_path)?;
        }
        Ok(mesh)
    }

    /// 加载动画文件并注册到网格（同名覆盖）
    pub fn load_animation_from_file<Q: AsRef<Path>>(
        &self,
        mesh: &mut SkeletalMesh,
        path: Q,
    ) -> Result<()> {
        let path = path.as_ref();
        log::debug!("Loading animation: {}", path.display());

        read_document(path)
            .and_then(|text| self.load_animation_from_str(mesh, &text))
            .map_err(|e| e.with_path(path))
    }

    // ========== 文本入口 ==========

    pub fn load_mesh_from_str<M: AsRef<Path>>(
        &self,
        text: &str,
        media_path: M,
    ) -> Result<SkeletalMesh> {
        let record = self.parser.parse_mesh(text)?;
        self.load_mesh(&record, media_path)
    }

    pub fn load_animation_from_str(&self, mesh: &mut SkeletalMesh, text: &str) -> Result<()> {
        let record = self.parser.parse_animation(text)?;
        self.load_animation(mesh, &record)
    }

    // ========== 记录入口 ==========

    /// 从网格记录装配网格
    pub fn load_mesh<M: AsRef<Path>>(
        &self,
        record: &MeshRecord,
        media_path: M,
    ) -> Result<SkeletalMesh> {
        let skeleton = Arc::new(Skeleton::from_records(&record.bones)?);
        let vertex_weights =
            resolve_vertex_weights(record.vertex_count(), &record.vertices_weights, &skeleton)?;
        let material = self.resolve_material(record, media_path.as_ref())?;
        let mesh = assemble_mesh(record, skeleton, vertex_weights, material)?;

        if self.config.log_summary {
            log::info!(
                "Mesh loaded: '{}', {:?}, {} vertices, {} triangles, {} bones, {} subsets",
                mesh.name(),
                mesh.render_type(),
                mesh.vertex_count(),
                mesh.triangle_count(),
                mesh.bone_count(),
                mesh.subset_count()
            );
        }

        Ok(mesh)
    }

    /// 装配动画并注册到网格
    pub fn load_animation(&self, mesh: &mut SkeletalMesh, record: &AnimationRecord) -> Result<()> {
        let animation = assemble_animation(record, mesh)?;

        if self.config.log_summary {
            log::info!(
                "Animation loaded: '{}' on '{}', {} frames at {} fps, {} bones animated",
                animation.name,
                mesh.name(),
                animation.frames_count,
                animation.frame_rate,
                animation.animated_bone_count()
            );
        }

        mesh.add_animation(animation);
        Ok(())
    }

    /// 只解析 `material_id` 引用的材质，纹理缓存仅在本次调用内有效
    fn resolve_material(
        &self,
        record: &MeshRecord,
        media_path: &Path,
    ) -> Result<Option<ResolvedMaterial>> {
        let Some(id) = record.material_index() else {
            return Ok(None);
        };
        let material = record.materials.get(id).ok_or_else(|| {
            SkeletalError::MeshAssembly(format!(
                "Material id {} is out of range ({} materials)",
                id,
                record.materials.len()
            ))
        })?;

        let textures_path: PathBuf = media_path.join(&record.textures_dir);
        let mut cache = TextureCache::new(&self.texture_loader, textures_path);
        let resolved = ResolvedMaterial::resolve(material, &mut cache)?;

        log::debug!(
            "Material '{}' resolved: {} subsets, {} textures from {}",
            material.name,
            resolved.leaves().len(),
            cache.len(),
            cache.textures_path().display()
        );

        Ok(Some(resolved))
    }
}
