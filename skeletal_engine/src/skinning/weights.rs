//! 顶点骨骼权重
//!
//! 每个顶点最多保留 4 个影响。超出部分按权重大小丢弃（不按距离重新分配），
//! 剩余权重重新归一化。

use std::cmp::Ordering;

use crate::parser::VertexWeightRecord;
use crate::skeleton::Skeleton;
use crate::{Result, SkeletalError};

/// 每个顶点最多的骨骼影响数
pub const MAX_INFLUENCES: usize = 4;

/// 单个骨骼影响
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneWeight {
    pub bone: usize,
    pub weight: f32,
}

/// 顶点权重（最多 4 个影响，归一化后和为 1）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexWeight {
    weights: Vec<BoneWeight>,
}

impl VertexWeight {
    pub fn weights(&self) -> &[BoneWeight] {
        &self.weights
    }

    /// 没有任何影响（刚性顶点）
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// 权重总和
    pub fn total(&self) -> f32 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    /// 生成 GPU 使用的 4 个权重与 4 个骨骼索引，未使用的槽位填 0
    pub fn blend_weights_and_indices(&self) -> ([f32; 4], [f32; 4]) {
        let mut blend_weights = [0.0f32; MAX_INFLUENCES];
        let mut blend_indices = [0.0f32; MAX_INFLUENCES];
        for (slot, w) in self.weights.iter().take(MAX_INFLUENCES).enumerate() {
            blend_weights[slot] = w.weight;
            blend_indices[slot] = w.bone as f32;
        }
        (blend_weights, blend_indices)
    }

    /// 裁剪到最大影响数并归一化
    fn prune_and_normalize(&mut self, vertex: usize) -> Result<()> {
        if self.weights.is_empty() {
            return Ok(());
        }

        if self.weights.len() > MAX_INFLUENCES {
            // 稳定排序：权重相同时保持源顺序
            self.weights
                .sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
            self.weights.truncate(MAX_INFLUENCES);
        }

        let mut total = self.total();
        if total.is_infinite() {
            // 有限权重之和溢出时先按最大值缩放
            let largest = self.weights.iter().map(|w| w.weight).fold(0.0f32, f32::max);
            for w in &mut self.weights {
                w.weight /= largest;
            }
            total = self.total();
        }
        if !(total > 0.0 && total.is_finite()) {
            return Err(SkeletalError::Weight(format!(
                "Vertex {} has {} influences summing to zero",
                vertex,
                self.weights.len()
            )));
        }

        for w in &mut self.weights {
            w.weight /= total;
        }
        Ok(())
    }
}

/// 由权重三元组构建每个顶点的权重
pub fn resolve_vertex_weights(
    vertex_count: usize,
    records: &[VertexWeightRecord],
    skeleton: &Skeleton,
) -> Result<Vec<VertexWeight>> {
    let bone_count = skeleton.bone_count();
    let mut weights = vec![VertexWeight::default(); vertex_count];

    for (i, record) in records.iter().enumerate() {
        let vertex = record.vertex as usize;
        let bone = record.bone as usize;

        if vertex >= vertex_count {
            return Err(SkeletalError::Weight(format!(
                "Weight entry {} targets vertex {} but mesh has {} vertices",
                i, vertex, vertex_count
            )));
        }
        if bone >= bone_count {
            return Err(SkeletalError::Weight(format!(
                "Weight entry {} references bone {} but skeleton has {} bones",
                i, bone, bone_count
            )));
        }
        if !record.weight.is_finite() || record.weight < 0.0 {
            return Err(SkeletalError::Weight(format!(
                "Weight entry {} has invalid weight {}",
                i, record.weight
            )));
        }

        weights[vertex].weights.push(BoneWeight {
            bone,
            weight: record.weight,
        });
    }

    for (vertex, weight) in weights.iter_mut().enumerate() {
        weight.prune_and_normalize(vertex)?;
    }

    let rigid = weights.iter().filter(|w| w.is_empty()).count();
    log::debug!(
        "Vertex weights resolved: {} vertices, {} entries, {} rigid",
        vertex_count,
        records.len(),
        rigid
    );

    Ok(weights)
}
