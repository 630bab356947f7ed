//! Extract handler

use sluice_core::domain::dataset::Dataset;
use tracing::{info, warn};

use crate::error::Result;
use crate::params::ExtractParams;
use crate::source::SourceConnector;

/// Produce a fresh dataset from the stage's source
pub async fn run(connector: &dyn SourceConnector, params: &ExtractParams) -> Result<Dataset> {
    match params {
        ExtractParams::Database { source_details } => {
            let records = connector.fetch(source_details).await?;
            info!("Extracted {} row(s) from {}", records.len(), source_details.db_url);
            Ok(Dataset::from(records))
        }
        ExtractParams::Unsupported => {
            warn!("Unsupported source_type, extract stage produced no rows");
            Ok(Dataset::new())
        }
    }
}
