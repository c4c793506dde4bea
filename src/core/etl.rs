use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting keyword ETL run");

        tracing::info!("Extracting keyword items...");
        let raw_items = self.pipeline.extract().await?;
        tracing::info!("Extracted {} raw items", raw_items.len());

        tracing::info!("Normalizing keyword items...");
        let result = self.pipeline.transform(raw_items).await?;
        tracing::info!(
            "Normalized {} records ({} degraded)",
            result.records.len(),
            result.degraded
        );

        tracing::info!("Loading records...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
