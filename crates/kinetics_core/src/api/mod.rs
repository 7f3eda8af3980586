pub mod json_api;

pub use json_api::{analyze_json, analyze_request, AnalysisRequest, AnalysisResponse};
