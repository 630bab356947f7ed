//! Transform handler

use serde_json::Value;
use sluice_core::domain::dataset::{Dataset, Record, text_form};
use tracing::warn;

use crate::params::{TransformOperation, TransformRule};

/// Apply the rules in order to every record
///
/// Takes the dataset by value and returns the transformed one.
pub fn apply(mut dataset: Dataset, rules: &[TransformRule]) -> Dataset {
    for rule in rules {
        match &rule.operation {
            TransformOperation::Uppercase => {
                for record in dataset.records_mut() {
                    uppercase(record, &rule.column);
                }
            }
            // TODO: add a strict mode that rejects unknown operations
            TransformOperation::Unknown(operation) => {
                warn!(
                    "Ignoring unknown transform operation '{}' on column '{}'",
                    operation, rule.column
                );
            }
        }
    }

    dataset
}

fn uppercase(record: &mut Record, column: &str) {
    if let Some(value) = record.get_mut(column) {
        if !value.is_null() {
            let upper = text_form(Some(&*value)).to_uppercase();
            *value = Value::String(upper);
        }
    }
}
