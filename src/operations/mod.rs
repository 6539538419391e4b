pub mod clip;
pub mod creation;
pub mod query;

pub use clip::ClipDiagram;
