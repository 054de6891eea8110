//! 骨骼网格数据与装配

mod assembler;
mod bounds;
mod material;
mod mesh;
mod submesh;
pub mod vertex;

pub use assembler::assemble_mesh;
pub use bounds::BoundingBox;
pub use material::{MaterialLeaf, ResolvedMaterial};
pub use mesh::{MeshRenderType, SkeletalMesh};
pub use submesh::SubMesh;
pub use vertex::{ColorVertex, DiffuseMapVertex, VertexBuffer, VertexLayout};
