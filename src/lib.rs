pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};
pub use crate::config::TomlConfig;

pub use crate::core::{
    batch::{transform_all, transform_batch},
    client::{DataForSeoClient, KeywordEndpoint, KeywordQuery},
    envelope::{unwrap_all_tasks, unwrap_envelope},
    etl::EtlEngine,
    pipeline::KeywordPipeline,
    resolver::resolve,
    transformer::transform,
};
pub use crate::domain::model::{NormalizedKeywordRecord, RawApiItem, TransformResult};
pub use crate::utils::error::{EtlError, Result};

/// Normalize a full API envelope: unwrap the first task, then transform every item.
pub fn normalize_envelope(envelope: &serde_json::Value) -> Vec<NormalizedKeywordRecord> {
    transform_batch(&unwrap_envelope(envelope)).records
}
