// file: src/exporter/notify.rs
// description: optional webhook notification after an export
// reference: https://docs.rs/reqwest

use crate::error::{PipelineError, Result};
use crate::models::ExportReport;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportNotification<'a> {
    event: &'static str,
    package_name: &'a str,
    package_version: &'a str,
    report: &'a ExportReport,
}

pub struct ExportNotifier {
    client: Client,
    url: Url,
}

impl ExportNotifier {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| PipelineError::Notify(format!("Invalid webhook URL {}: {}", url, e)))?;

        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Notify(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn send(&self, name: &str, version: &str, report: &ExportReport) -> Result<()> {
        let payload = ExportNotification {
            event: "export.completed",
            package_name: name,
            package_version: version,
            report,
        };

        debug!("Posting export notification to {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| PipelineError::Notify(format!("Failed to send notification: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Notify(format!(
                "Webhook responded with status {}: {}",
                status, error_text
            )));
        }

        info!("Export notification delivered to {}", self.url);
        Ok(())
    }

    /// Fire-and-forget: a failed delivery is logged and reported as `false`.
    pub async fn notify(&self, name: &str, version: &str, report: &ExportReport) -> bool {
        match self.send(name, version, report).await {
            Ok(()) => true,
            Err(err) => {
                warn!("{}", err);
                false
            }
        }
    }
}
