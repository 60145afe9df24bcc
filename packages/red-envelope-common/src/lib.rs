pub mod entropy;
pub mod split;
pub mod types;

pub use entropy::{compute_entropy_seed, SeedInput};
pub use split::{next_share, ShareDraw, SplitError};
pub use types::SplitPolicy;
