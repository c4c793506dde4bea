use crate::domain::model::{RawApiItem, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn login(&self) -> &str;
    fn password(&self) -> &str;
    fn endpoint(&self) -> crate::core::client::KeywordEndpoint;
    fn query(&self) -> crate::core::client::KeywordQuery;
    fn output_path(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    /// Flatten every task of the envelope instead of only the first.
    fn all_tasks(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawApiItem>>;
    async fn transform(&self, data: Vec<RawApiItem>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
