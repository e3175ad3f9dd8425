//! AWS Textract implementation using the official AWS SDK.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_textract::operation::analyze_document::AnalyzeDocumentOutput;
use aws_sdk_textract::primitives::Blob;
use aws_sdk_textract::types::{Document, FeatureType, S3Object};
use tracing::{debug, info, warn};

use super::{AnalyzeError, DocumentAnalyzer, DocumentSource};
use crate::config::AnalyzerConfig;

pub struct TextractAnalyzer {
    client: aws_sdk_textract::Client,
}

impl TextractAnalyzer {
    /// Builds an SDK client for the configured region. Credentials come from
    /// the SDK's default provider chain.
    pub async fn new(config: &AnalyzerConfig) -> Self {
        info!(region = %config.region, "Initializing AWS Textract client");

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let client = aws_sdk_textract::Client::new(&sdk_config);
        debug!("AWS Textract client created");
        Self { client }
    }

    pub fn from_client(client: aws_sdk_textract::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentAnalyzer for TextractAnalyzer {
    async fn analyze(
        &self,
        document: DocumentSource,
    ) -> Result<AnalyzeDocumentOutput, AnalyzeError> {
        let output = self
            .client
            .analyze_document()
            .document(to_sdk_document(document))
            .feature_types(FeatureType::Forms)
            .send()
            .await
            .map_err(|e| {
                let err = aws_sdk_textract::Error::from(e);
                warn!(error = %err, "Textract AnalyzeDocument failed");
                err
            })?;

        info!(
            blocks = output.blocks().len(),
            "Textract: document analyzed"
        );
        Ok(output)
    }
}

fn to_sdk_document(document: DocumentSource) -> Document {
    match document {
        DocumentSource::Bytes(bytes) => Document::builder().bytes(Blob::new(bytes)).build(),
        DocumentSource::S3Object { bucket, key } => Document::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build(),
    }
}
