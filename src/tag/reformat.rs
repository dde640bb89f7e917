use std::collections::HashSet;

use crate::util::{stable_confidence, to_precision};

use super::parse::{RawLabelNode, RawPredictionStep, value_to_f32, value_to_id};

/// Flat parent-pointer record, the common shape both document kinds are
/// reduced to before the hierarchy is built.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRecord {
    pub id: String,
    pub parent: Option<String>,
    pub label: String,
    pub confidence: Option<f32>,
}

/// Flattens a nested label tree into pre-order records, carrying each
/// node's `index` forward as its children's parent id. Label trees carry
/// no scores, so every record gets a stable placeholder confidence.
pub(super) fn flatten_label_tree(root: &RawLabelNode) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    reconstruct(root, None, &mut records);
    records
}

fn reconstruct(node: &RawLabelNode, parent: Option<&str>, records: &mut Vec<FlatRecord>) {
    let id = value_to_id(&node.index);
    records.push(FlatRecord {
        parent: parent.map(str::to_owned),
        label: node.label.clone().unwrap_or_else(|| id.clone()),
        confidence: Some(stable_confidence(&id)),
        id: id.clone(),
    });

    for child in &node.children {
        reconstruct(child, Some(&id), records);
    }
}

/// Merges prediction paths into one shared-prefix record set. The first
/// path to introduce a prediction id wins; later occurrences of the same
/// id are skipped, so overlapping paths fold into a single trie.
pub(super) fn merge_prediction_paths(paths: &[Vec<RawPredictionStep>]) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        for (step_index, step) in path.iter().enumerate() {
            let id = value_to_id(&step.prediction);
            if !seen.insert(id.clone()) {
                continue;
            }

            let parent = if step_index == 0 {
                None
            } else {
                Some(value_to_id(&path[step_index - 1].prediction))
            };
            let confidence = value_to_f32(&step.confidence)
                .map(|confidence| to_precision(confidence, 4));

            records.push(FlatRecord {
                id,
                parent,
                label: step.concept.clone(),
                confidence,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::super::parse::{parse_label_tree, parse_prediction_paths};
    use super::*;

    fn tree_records(raw: &str) -> Vec<FlatRecord> {
        flatten_label_tree(&parse_label_tree(raw).expect("valid tree"))
    }

    fn path_records(raw: &str) -> Vec<FlatRecord> {
        merge_prediction_paths(&parse_prediction_paths(raw).expect("valid paths"))
    }

    #[test]
    fn nested_tree_yields_exactly_one_root() {
        let records = tree_records(
            r#"{ "index": 1, "label": "a", "children": [
                { "index": 2, "label": "b", "children": [
                    { "index": 4, "label": "d", "children": [] }
                ] },
                { "index": 3, "label": "c", "children": [] }
            ] }"#,
        );

        assert_eq!(records.len(), 4);
        let roots = records.iter().filter(|record| record.parent.is_none()).count();
        assert_eq!(roots, 1);

        // every non-root parent is the id of an earlier (pre-order) record
        for (index, record) in records.iter().enumerate() {
            if let Some(parent) = &record.parent {
                assert!(
                    records[..index].iter().any(|earlier| &earlier.id == parent),
                    "record {} names parent {parent} that was not emitted before it",
                    record.id
                );
            }
        }
    }

    #[test]
    fn nested_tree_records_get_placeholder_confidence() {
        let records = tree_records(r#"{ "index": 1, "children": [] }"#);
        let confidence = records[0].confidence.expect("placeholder confidence");
        assert!(confidence > 0.0 && confidence <= 100.0);
    }

    #[test]
    fn shared_prediction_prefixes_merge_first_seen_wins() {
        let records = path_records(
            r#"[
                [ { "Prediction": 1, "Concept": "A", "Confidence": "90.0" } ],
                [ { "Prediction": 1, "Concept": "A-again", "Confidence": "10.0" },
                  { "Prediction": 2, "Concept": "B", "Confidence": "50.0" } ]
            ]"#,
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].parent, None);
        assert_eq!(records[0].label, "A");
        assert_eq!(records[0].confidence, Some(90.0));
        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].parent, Some("1".to_owned()));
        assert_eq!(records[1].confidence, Some(50.0));
    }

    #[test]
    fn prediction_confidence_rounds_to_four_significant_digits() {
        let records = path_records(
            r#"[[ { "Prediction": 9, "Concept": "X", "Confidence": "33.33333" } ]]"#,
        );
        assert_eq!(records[0].confidence, Some(33.33));
    }

    #[test]
    fn unparseable_confidence_is_absent_not_zero() {
        let records =
            path_records(r#"[[ { "Prediction": 9, "Concept": "X", "Confidence": "n/a" } ]]"#);
        assert_eq!(records[0].confidence, None);
    }
}
