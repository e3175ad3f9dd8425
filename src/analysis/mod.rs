//! Document submission to the external analysis service.
//!
//! Both entry points build a [`DocumentSource`] and hand it to the shared
//! [`DocumentAnalyzer::analyze`] call; the service response comes back as-is.

mod textract;

pub use textract::TextractAnalyzer;

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_textract::operation::analyze_document::AnalyzeDocumentOutput;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Service(#[from] aws_sdk_textract::Error),
}

/// What gets sent for analysis: inline bytes or a reference to an S3 object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Bytes(Vec<u8>),
    S3Object { bucket: String, key: String },
}

impl DocumentSource {
    pub fn s3(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::S3Object {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// The external analysis call. Requests always ask for form-field detection.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        document: DocumentSource,
    ) -> Result<AnalyzeDocumentOutput, AnalyzeError>;

    /// Reads the whole file and submits its bytes.
    async fn analyze_local_file(
        &self,
        path: &Path,
    ) -> Result<AnalyzeDocumentOutput, AnalyzeError> {
        let bytes = tokio::fs::read(path).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Submitting local document");
        self.analyze(DocumentSource::Bytes(bytes)).await
    }

    /// Submits a reference to a document stored in S3. No local I/O.
    async fn analyze_remote_file(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<AnalyzeDocumentOutput, AnalyzeError> {
        debug!(bucket = %bucket, key = %key, "Submitting S3 document");
        self.analyze(DocumentSource::s3(bucket, key)).await
    }
}
