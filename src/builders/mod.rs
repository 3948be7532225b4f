pub mod layer;

pub use layer::RbfLayerBuilder;
