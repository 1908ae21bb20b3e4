//! JSON reporter for machine-readable output

use crate::{AnalysisResponse, AnalysisResult};

/// Reporter for JSON output, using the same body as the HTTP API
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, result: &AnalysisResult) -> String {
        let body = AnalysisResponse::from(result.clone());
        serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::score_product;
    use crate::ProductInput;

    #[test]
    fn test_report_matches_api_body() {
        let result = score_product(&ProductInput::new("Disposable Plastic Fork"));
        let output = JsonReporter::new().report(&result);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["greenScore"], 23);
        assert_eq!(json["localAnalysis"], true);
        assert_eq!(json["negatives"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_report_is_single_line() {
        let result = score_product(&ProductInput::new("Mug"));
        let output = JsonReporter::new().report(&result);
        assert!(!output.contains('\n'));
    }
}
