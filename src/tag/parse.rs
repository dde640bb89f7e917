use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// One node of a nested label tree document. `children` is required:
/// a node without a children sequence is a malformed document and fails
/// the whole load.
#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawLabelNode {
    pub(super) index: Value,
    #[serde(default)]
    pub(super) label: Option<String>,
    pub(super) children: Vec<RawLabelNode>,
}

/// One step of a predicted path. `Confidence` arrives either as a number
/// or as a numeric string depending on the producer.
#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawPredictionStep {
    #[serde(rename = "Prediction")]
    pub(super) prediction: Value,
    #[serde(rename = "Concept")]
    pub(super) concept: String,
    #[serde(rename = "Confidence")]
    pub(super) confidence: Value,
}

pub(super) fn parse_label_tree(raw: &str) -> Result<RawLabelNode> {
    serde_json::from_str(raw).context("invalid label tree JSON")
}

pub(super) fn parse_prediction_paths(raw: &str) -> Result<Vec<Vec<RawPredictionStep>>> {
    serde_json::from_str(raw).context("invalid prediction path JSON")
}

/// Best-effort id coercion: strings pass through, numbers and anything
/// else keep their JSON rendering.
pub(super) fn value_to_id(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub(super) fn value_to_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Number(number) => number.as_f64().map(|number| number as f32),
        Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    }
}
