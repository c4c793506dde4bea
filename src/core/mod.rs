pub mod batch;
pub mod client;
pub mod envelope;
pub mod etl;
pub mod pipeline;
pub mod resolver;
pub mod transformer;

pub use crate::domain::model::{NormalizedKeywordRecord, RawApiItem, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
