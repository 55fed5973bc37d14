//! Mock X-ray analysis
//!
//! Stands in for the inference backend: validates that an image was chosen,
//! waits the configured latency, and returns a fixed set of findings. The
//! findings have no relation to the uploaded bytes.

use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::AnalysisConfig,
    errors::AnalysisError,
    latency::Latency,
    notice::Notice,
    types::Timestamp,
    Result,
};

/// Probability above which a finding is highlighted
pub const ELEVATED_THRESHOLD: f64 = 0.5;

const CANNED_FINDINGS: [(&str, f64); 4] = [
    ("Pneumonia", 0.82),
    ("COVID-19", 0.12),
    ("Tuberculosis", 0.05),
    ("Normal", 0.01),
];

// ----------------------------------------------------------------------------
// Upload
// ----------------------------------------------------------------------------

/// An image chosen for analysis
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accept a file only if its media type names an image
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> core::result::Result<Self, AnalysisError> {
        let media_type = media_type.into();
        Self::check_media_type(&media_type)?;
        Ok(Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        })
    }

    /// Reject a media type that does not name an image, before any bytes
    /// are read
    pub fn check_media_type(media_type: &str) -> core::result::Result<(), AnalysisError> {
        if media_type.contains("image") {
            Ok(())
        } else {
            Err(AnalysisError::UnsupportedFileType {
                media_type: media_type.to_string(),
            })
        }
    }

    /// Size of the image in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Guess a media type from a file name's extension
pub fn media_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "dcm" | "dicom" => "image/dicom",
        _ => "application/octet-stream",
    }
}

// ----------------------------------------------------------------------------
// Findings
// ----------------------------------------------------------------------------

/// One labelled probability in an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Condition name
    #[serde(rename = "disease")]
    pub label: String,
    pub probability: f64,
}

impl Finding {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    /// Probability as a whole percentage
    pub fn percent(&self) -> u32 {
        (self.probability * 100.0).round() as u32
    }

    /// Whether the finding should be highlighted
    pub fn is_elevated(&self) -> bool {
        self.probability > ELEVATED_THRESHOLD
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub file_name: String,
    pub findings: Vec<Finding>,
    pub completed_at: Timestamp,
}

impl AnalysisReport {
    /// Finding with the highest probability
    pub fn primary(&self) -> Option<&Finding> {
        self.findings
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
    }

    /// Notice announcing completion
    pub fn notice(&self) -> Notice {
        Notice::success("X-ray has been successfully analyzed.").titled("Analysis complete")
    }
}

// ----------------------------------------------------------------------------
// Analyzer
// ----------------------------------------------------------------------------

/// Fixed-delay analyzer returning canned findings
#[derive(Debug, Clone)]
pub struct MockAnalyzer<L> {
    latency: L,
    config: AnalysisConfig,
}

impl<L: Latency> MockAnalyzer<L> {
    pub fn new(latency: L, config: AnalysisConfig) -> Self {
        Self { latency, config }
    }

    /// Analyze the selected image, if any
    pub async fn analyze(&self, upload: Option<&ImageUpload>) -> Result<AnalysisReport> {
        let upload = upload.ok_or(AnalysisError::NoImageSelected)?;
        debug!(?upload, "Analyzing X-ray");

        self.latency.pause(self.config.latency()).await;

        let report = AnalysisReport {
            id: Uuid::new_v4(),
            file_name: upload.file_name.clone(),
            findings: CANNED_FINDINGS
                .iter()
                .map(|(label, probability)| Finding::new(*label, *probability))
                .collect(),
            completed_at: Timestamp::now(),
        };
        info!(id = %report.id, file = %report.file_name, "Analysis complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{latency::NoLatency, XrayError};

    fn analyzer() -> MockAnalyzer<NoLatency> {
        MockAnalyzer::new(NoLatency, AnalysisConfig { latency_ms: 0 })
    }

    #[tokio::test]
    async fn test_canned_findings() {
        let upload = ImageUpload::new("chest.png", "image/png", vec![0x89, 0x50]).unwrap();
        let report = analyzer().analyze(Some(&upload)).await.unwrap();

        assert_eq!(report.file_name, "chest.png");
        let labels: Vec<_> = report.findings.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["Pneumonia", "COVID-19", "Tuberculosis", "Normal"]);
        assert_eq!(report.primary().unwrap().label, "Pneumonia");
        assert_eq!(report.notice().title.as_deref(), Some("Analysis complete"));
    }

    #[tokio::test]
    async fn test_no_image_selected() {
        let err = analyzer().analyze(None).await.unwrap_err();
        assert!(matches!(err, XrayError::Analysis(AnalysisError::NoImageSelected)));
    }

    #[test]
    fn test_rejects_non_images() {
        let err = ImageUpload::new("notes.txt", "text/plain", Vec::new()).unwrap_err();
        assert_eq!(err.title(), "Invalid file type");

        assert!(ImageUpload::check_media_type("image/png").is_ok());
        assert!(matches!(
            ImageUpload::check_media_type("application/pdf"),
            Err(AnalysisError::UnsupportedFileType { media_type }) if media_type == "application/pdf"
        ));
    }

    #[cfg(feature = "std")]
    #[tokio::test(start_paused = true)]
    async fn test_analysis_waits_for_configured_latency() {
        use crate::latency::TokioLatency;
        use std::time::Duration;
        use tokio::time::Instant;

        let config = AnalysisConfig::default();
        let expected = config.latency();
        assert!(expected >= Duration::from_millis(2000));

        let analyzer = MockAnalyzer::new(TokioLatency, config);
        let upload = ImageUpload::new("chest.png", "image/png", vec![1]).unwrap();

        let start = Instant::now();
        analyzer.analyze(Some(&upload)).await.unwrap();
        assert!(start.elapsed() >= expected);
    }

    #[cfg(feature = "std")]
    #[tokio::test(start_paused = true)]
    async fn test_missing_image_fails_without_waiting() {
        use crate::latency::TokioLatency;
        use tokio::time::Instant;

        let analyzer = MockAnalyzer::new(TokioLatency, AnalysisConfig::default());
        let start = Instant::now();
        assert!(analyzer.analyze(None).await.is_err());
        assert_eq!(start.elapsed(), std::time::Duration::ZERO);
    }

    #[test]
    fn test_percent_and_highlight() {
        let finding = Finding::new("Pneumonia", 0.82);
        assert_eq!(finding.percent(), 82);
        assert!(finding.is_elevated());

        let edge = Finding::new("Edge", 0.5);
        assert!(!edge.is_elevated());
        assert_eq!(Finding::new("Half", 0.125).percent(), 13);
    }

    #[test]
    fn test_media_type_guessing() {
        assert_eq!(media_type_for("scan.PNG"), "image/png");
        assert_eq!(media_type_for("scan.jpeg"), "image/jpeg");
        assert_eq!(media_type_for("study.dcm"), "image/dicom");
        assert_eq!(media_type_for("README"), "application/octet-stream");
        assert_eq!(media_type_for("report.pdf"), "application/octet-stream");
    }

    #[test]
    fn test_finding_json_shape() {
        let json = serde_json::to_string(&Finding::new("Normal", 0.01)).unwrap();
        assert_eq!(json, r#"{"disease":"Normal","probability":0.01}"#);
    }
}
