use crate::consent::ConsentRecord;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct ReportPayload<'a> {
    site: &'a str,
    #[serde(flatten)]
    record: &'a ConsentRecord,
}

/// Fire-and-forget notification of consent decisions to the backend. The
/// endpoint being unreachable never blocks banner dismissal or feature
/// operation; every failure is swallowed and logged at debug level.
pub struct ConsentReporter {
    endpoint: Url,
    site_id: String,
}

impl ConsentReporter {
    pub fn new(endpoint: Url, site_id: impl Into<String>) -> Self {
        Self { endpoint, site_id: site_id.into() }
    }

    pub fn report(&self, record: &ConsentRecord) {
        let body = match serde_json::to_string(&ReportPayload {
            site: &self.site_id,
            record,
        }) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize consent report");
                return;
            }
        };
        let endpoint = self.endpoint.clone();
        std::thread::spawn(move || {
            let client = match reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
            {
                Ok(client) => client,
                Err(e) => {
                    tracing::debug!(error = %e, "consent report client unavailable");
                    return;
                }
            };
            match client
                .post(endpoint)
                .header("content-type", "application/json")
                .body(body)
                .send()
            {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::debug!(status = %resp.status(), "consent report rejected");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "consent report failed");
                }
            }
        });
    }
}
