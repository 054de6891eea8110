//! 顶点骨骼权重与蒙皮计算

mod skinning;
mod weights;

pub use skinning::{compute_skinning_matrices, skin_positions};
pub use weights::{resolve_vertex_weights, BoneWeight, VertexWeight, MAX_INFLUENCES};
