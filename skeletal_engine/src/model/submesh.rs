//! 子网格定义

/// 子网格：使用同一材质的一组三角形
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubMesh {
    /// 子材质索引（单材质时为 0）
    pub material_id: usize,
    /// 三角形索引（第 t 个三角形对应索引缓冲中的 3t..3t+3）
    pub triangles: Vec<u32>,
}

impl SubMesh {
    pub fn new(material_id: usize, triangles: Vec<u32>) -> Self {
        Self { material_id, triangles }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// 该子网格在索引缓冲中的索引，超出缓冲的三角形被跳过
    pub fn indices<'a>(&'a self, index_buffer: &'a [u32]) -> impl Iterator<Item = u32> + 'a {
        self.triangles.iter().flat_map(move |&t| {
            let base = t as usize * 3;
            index_buffer.get(base..base + 3).into_iter().flatten().copied()
        })
    }
}
