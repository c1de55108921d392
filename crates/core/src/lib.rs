pub mod config;
pub mod error;
pub mod types;

pub use config::{AdTagsConfig, IdScope};
pub use error::{AdTagError, AdTagResult};
pub use types::{AdUnit, SizeMapping};
