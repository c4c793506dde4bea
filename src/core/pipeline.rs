use crate::core::batch::transform_batch;
use crate::core::client::DataForSeoClient;
use crate::core::{ConfigProvider, Pipeline, RawApiItem, Storage, TransformResult};
use crate::utils::error::Result;
use std::time::Duration;

pub const RECORDS_FILENAME: &str = "keywords.json";
pub const METADATA_FILENAME: &str = "metadata.json";

/// Fetches one keyword endpoint, normalizes the items and writes them as JSON.
pub struct KeywordPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: DataForSeoClient,
}

impl<S: Storage, C: ConfigProvider> KeywordPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = DataForSeoClient::new(
            config.api_base(),
            config.login(),
            config.password(),
            Duration::from_secs(config.timeout_seconds()),
        )?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for KeywordPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawApiItem>> {
        let endpoint = self.config.endpoint();
        tracing::debug!("Extracting from {} ({})", endpoint, endpoint.path());

        let items = self
            .client
            .fetch_keywords(endpoint, &self.config.query(), self.config.all_tasks())
            .await?;

        if items.is_empty() {
            tracing::warn!("No keyword items in the API response");
        }
        Ok(items)
    }

    async fn transform(&self, data: Vec<RawApiItem>) -> Result<TransformResult> {
        Ok(transform_batch(&data))
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), RECORDS_FILENAME);

        let records_json = serde_json::to_vec_pretty(&result.records)?;
        tracing::debug!(
            "Writing {} records ({} bytes) to storage",
            result.records.len(),
            records_json.len()
        );
        self.storage.write_file(RECORDS_FILENAME, &records_json).await?;

        let metadata = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "endpoint": self.config.endpoint().to_string(),
            "records": result.records.len(),
            "degraded": result.degraded,
        });
        self.storage
            .write_file(METADATA_FILENAME, &serde_json::to_vec_pretty(&metadata)?)
            .await?;

        Ok(output_path)
    }
}
