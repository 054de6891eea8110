//! 骨骼关键帧动画

mod assembler;
mod clip;
mod keyframe;
mod track;

pub use assembler::assemble_animation;
pub use clip::SkeletalAnimation;
pub use keyframe::KeyFrame;
pub use track::AnimationTrack;
