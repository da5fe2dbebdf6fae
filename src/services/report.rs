//! Report export service implementation

use std::path::{Path, PathBuf};
use tracing::info;
use crate::api::ApiClient;
use crate::models::ExportRequest;
use crate::utils::errors::{LinguaDeskError, Result};

/// Report service for CSV/XLSX/PDF exports
#[derive(Clone)]
pub struct ReportService {
    api: ApiClient,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Generate a report and return its raw bytes
    pub async fn export(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        request.validate()?;
        let bytes = self.api.post_for_bytes("/reports/export", request).await?;
        if bytes.is_empty() {
            return Err(LinguaDeskError::Validation("the report is empty for the selected range".to_string()));
        }
        Ok(bytes)
    }

    /// Generate a report and write it into `directory`, returning the file path
    pub async fn export_to_dir(&self, request: &ExportRequest, directory: &Path) -> Result<PathBuf> {
        let bytes = self.export(request).await?;

        tokio::fs::create_dir_all(directory).await?;
        let path = directory.join(request.file_name());
        tokio::fs::write(&path, &bytes).await?;

        info!(
            report_type = ?request.report_type,
            format = ?request.format,
            bytes = bytes.len(),
            path = %path.display(),
            "Report exported"
        );
        Ok(path)
    }
}
