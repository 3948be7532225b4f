pub mod initialization;
pub mod rbf;
pub mod traits;

pub use initialization::CentreInit;
pub use rbf::{CentrePolicy, GradientMode, RbfLayer};
pub use traits::Layer as LayerTrait;
