//! Helpers shared across asset formats

pub mod hash;

pub use hash::{AssetHash, asset_guid};
