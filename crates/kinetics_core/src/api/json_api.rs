use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::stream_digest;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::models::PositionSample;
use crate::pipeline::{analyze_stream, StreamAnalysis};
use crate::{SCHEMA_VERSION, VERSION};

/// One stream to analyze. `subject_id` / `video_id` are echoed back and never
/// interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    pub samples: Vec<PositionSample>,
    /// Falls back to `AnalysisConfig::default()` when absent
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub schema_version: u8,
    pub engine_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Content digest of the sorted input samples
    pub stream_digest: String,
    pub analysis: StreamAnalysis,
}

/// Run the pipeline for an already decoded request.
pub fn analyze_request(request: AnalysisRequest) -> Result<AnalysisResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(AnalysisError::UnsupportedSchema { found: request.schema_version, expected: SCHEMA_VERSION });
    }
    if let Some(bad) = request.samples.iter().find(|s| !s.timestamp_ms.is_finite()) {
        return Err(AnalysisError::InvalidRequest(format!(
            "frame {} has a non-finite timestamp",
            bad.frame_index
        )));
    }

    let config = request.config.unwrap_or_default().validated()?;

    let analysis = analyze_stream(&request.samples, &config);
    info!(
        subject = request.subject_id.as_deref().unwrap_or("-"),
        samples = request.samples.len(),
        overall = analysis.performance.overall_score,
        "analysis complete"
    );

    Ok(AnalysisResponse {
        schema_version: SCHEMA_VERSION,
        engine_version: VERSION.to_string(),
        subject_id: request.subject_id,
        video_id: request.video_id,
        stream_digest: stream_digest(&request.samples),
        analysis,
    })
}

/// JSON in, JSON out.
pub fn analyze_json(request_json: &str) -> Result<String> {
    let request: AnalysisRequest = serde_json::from_str(request_json)?;
    let response = analyze_request(request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::*;
    use serde_json::json;

    fn request(schema_version: u8) -> serde_json::Value {
        json!({
            "schema_version": schema_version,
            "subject_id": "runner-7",
            "samples": linear_stream(8, 200.0, 10.0, 0.0),
        })
    }

    #[test]
    fn test_basic_analysis() {
        let out = analyze_json(&request(1).to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["subject_id"], "runner-7");
        assert!(parsed.get("video_id").is_none());
        assert_eq!(parsed["analysis"]["sample_count"], 8);
        assert!(parsed["analysis"]["performance"]["overall_score"].is_number());
        assert_eq!(parsed["stream_digest"].as_str().map(str::len), Some(64));
    }

    #[test]
    fn test_determinism() {
        let req = request(1).to_string();
        assert_eq!(analyze_json(&req).unwrap(), analyze_json(&req).unwrap());
    }

    #[test]
    fn test_unsupported_schema_version() {
        let err = analyze_json(&request(9).to_string()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedSchema { found: 9, expected: 1 }));
    }

    #[test]
    fn test_malformed_json() {
        let err = analyze_json("{\"schema_version\": 1, \"samples\": [").unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_invalid_embedded_config() {
        let mut req = request(1);
        req["config"] = json!({ "trajectory": { "confidence_decay": 3.0 } });
        let err = analyze_json(&req.to_string()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_samples_are_not_an_error() {
        let out = analyze_json(r#"{"schema_version": 1, "samples": []}"#).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["analysis"]["movement"]["status"], "insufficient_data");
    }
}
