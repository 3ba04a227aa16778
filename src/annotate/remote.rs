use std::time::Duration;

use serde_json::json;

use super::{AnnotateError, Annotator, Doc};

/// HTTP client for the annotation sidecar.
///
/// The sidecar exposes `GET /health` and `POST /annotate` with a JSON body
/// `{"text": ...}`, answering with a serialized [`Doc`]. A blocking client
/// is fine here: extraction is blocking CPU-bound work and the web layer
/// already runs it on a blocking-capable thread.
pub struct RemoteAnnotator {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteAnnotator {
    /// Connects to the sidecar and probes its health endpoint. A sidecar
    /// that cannot be reached at startup is a fatal error for the process.
    pub fn connect(url: &str, timeout: Duration) -> Result<Self, AnnotateError> {
        let base_url = url.strip_suffix('/').unwrap_or(url).to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        let annotator = RemoteAnnotator { base_url, client };
        annotator.probe()?;
        Ok(annotator)
    }

    fn probe(&self) -> Result<(), AnnotateError> {
        let url = format!("{}/health", self.base_url);
        log::info!("probing annotator at {url}");

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(AnnotateError::Unavailable(format!(
                "health probe returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

impl Annotator for RemoteAnnotator {
    fn annotate(&self, text: &str) -> Result<Doc, AnnotateError> {
        let url = format!("{}/annotate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "text": text }))
            .send()?;

        if !response.status().is_success() {
            return Err(AnnotateError::Unavailable(format!(
                "annotate returned {}",
                response.status()
            )));
        }

        let doc: Doc = response.json()?;
        doc.check().map_err(AnnotateError::Malformed)?;
        Ok(doc)
    }
}
