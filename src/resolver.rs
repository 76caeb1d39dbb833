//! List-reference resolution.
//!
//! Post-pass over the flattened policy rows: condition values that name a
//! known list are augmented with that list's rows. The original values are
//! never overwritten; resolution attaches a separate field so raw data
//! stays available for audit.

use tracing::{debug, warn};

use crate::lists::ListCatalog;
use crate::types::{ParamValue, PolicyRow, PropertyValues, ResolvedElement, ResolvedValues};

/// Resolve list references across all condition rows in place.
///
/// `property_values` is inspected first; when absent, a list reference in
/// the expression value is used instead. Unknown references resolve to
/// nothing and the raw value stays untouched.
pub fn resolve_lists(rows: &mut [PolicyRow], catalog: &ListCatalog) {
    let mut resolved = 0usize;
    for row in rows.iter_mut() {
        let Some(condition) = row.condition.as_mut() else {
            continue;
        };

        condition.lists_resolved = match &condition.property_values {
            Some(PropertyValues::Single(value)) => resolve_single(value, catalog),
            Some(PropertyValues::Many(values)) => resolve_many(values, catalog),
            None => condition
                .expression_value
                .as_ref()
                .and_then(ParamValue::scalar)
                .and_then(|value| resolve_single(value, catalog)),
        };
        if condition.lists_resolved.is_some() {
            resolved += 1;
        }
    }

    debug!(
        event = "ListResolver",
        phase = "Resolve",
        resolved,
        "attached resolved list entries"
    );
}

fn resolve_single(value: &str, catalog: &ListCatalog) -> Option<ResolvedValues> {
    match catalog.get(value) {
        Some(entries) => Some(ResolvedValues::Entries(entries.to_vec())),
        None => {
            warn!(
                event = "ListResolver",
                phase = "Resolve",
                reference = value,
                "condition value does not match any known list"
            );
            None
        }
    }
}

fn resolve_many(values: &[String], catalog: &ListCatalog) -> Option<ResolvedValues> {
    let mut any_resolved = false;
    let elements: Vec<ResolvedElement> = values
        .iter()
        .map(|value| match catalog.get(value) {
            Some(entries) => {
                any_resolved = true;
                ResolvedElement::Entries(entries.to_vec())
            }
            None => ResolvedElement::Value(value.clone()),
        })
        .collect();

    if any_resolved {
        Some(ResolvedValues::Mixed(elements))
    } else {
        if !values.is_empty() {
            warn!(
                event = "ListResolver",
                phase = "Resolve",
                references = values.len(),
                "no element of the value tuple matches a known list"
            );
        }
        None
    }
}
