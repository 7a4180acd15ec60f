pub mod shape;

pub use shape::{ClassifiedCfg, ClassifiedEdge, ClassifiedNode, NodeKey, Shape};
