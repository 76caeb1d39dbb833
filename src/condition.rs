//! Expression-set parsing.
//!
//! A condition arrives as a flat ordered sequence of expressions whose
//! nesting is encoded in per-expression open/close bracket counts. The
//! parser reconstructs tree positions by running a stack of open scopes
//! over the sequence: each row's `parent_index` is the index on top of the
//! stack when the row is appended, the row's own index is pushed once per
//! opening bracket and the stack popped once per closing bracket.
//!
//! Parsing is best-effort over a batch of independent rows. A single
//! malformed expression yields an error-marked row and the remaining
//! expressions still parse; bracket imbalance never fails, it only leaves
//! residual open scopes exposed for diagnostics.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::document::{NodeExt, as_text, ensure_sequence};
use crate::engine::ParseOptions;
use crate::types::{
    ConditionRow, DEFAULT_OPERATOR, NamedParameter, ParamValue, PropertyEval, PropertyValues,
    UNKNOWN_PROPERTY,
};

/// The parsed rows of one condition, plus any bracket scopes left open at
/// the end of the sequence (well-formed input leaves none).
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExpressionSet {
    pub rows: Vec<ConditionRow>,
    pub residual_scopes: Vec<u32>,
}

impl ExpressionSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Parse one item's condition substructure into ordered condition rows.
///
/// A missing or empty condition yields an empty set, not an error; "no
/// guard" is a valid state for both groups and rules.
pub fn parse_condition(condition: Option<&Value>, options: &ParseOptions) -> ExpressionSet {
    let Some(condition) = condition.filter(|c| c.is_object()) else {
        return ExpressionSet::default();
    };
    let Some(container) = condition.child("expressions").filter(|c| c.is_object()) else {
        return ExpressionSet::default();
    };

    let raw_exprs = ensure_sequence(container.child("conditionExpression"));

    let mut rows: Vec<ConditionRow> = Vec::with_capacity(raw_exprs.len());
    let mut stack: Vec<u32> = Vec::new();

    for raw in raw_exprs {
        let index = rows.len() as u32 + 1;
        let mut row = if raw.is_object() {
            parse_expression(raw, options)
        } else {
            warn!(
                event = "ExpressionSet",
                phase = "Parse",
                index,
                "expression entry is not an object, emitting error row"
            );
            ConditionRow::malformed("expression entry is not an object")
        };

        row.index = index;
        row.parent_index = stack.last().copied();

        for _ in 0..row.open_bracket {
            stack.push(index);
        }
        for _ in 0..row.close_bracket {
            // Pop on an empty stack is a no-op: imbalanced input is
            // tolerated, not rejected.
            stack.pop();
        }

        rows.push(row);
    }

    ExpressionSet {
        rows,
        residual_scopes: stack,
    }
}

fn parse_expression(expr: &Value, options: &ParseOptions) -> ConditionRow {
    let prop_instance = expr.child("propertyInstance");
    let has_prop_parameters = prop_instance.is_some_and(|p| p.has_key("parameters"));

    let parameters: Vec<NamedParameter> = match prop_instance {
        Some(instance) if has_prop_parameters => {
            parse_parameter_entries(instance.child("parameters"), 0, options)
        }
        _ => Vec::new(),
    };

    let mut expression = parse_expression_parameter(expr, options);
    if expression.is_none() {
        // Alternate encoding: the dedicated parameter hangs off the
        // property instance instead of the expression itself.
        if let Some(param) = prop_instance.and_then(|p| p.child("parameter")) {
            expression = Some(parse_single_parameter(param, 0, options));
        }
    }

    let mut values: Vec<String> = parameters
        .iter()
        .filter_map(|p| p.value.scalar().map(str::to_string))
        .collect();
    if let Some(value) = &expression
        && value.mode() == crate::types::ExpressionMode::Value
        && let Some(scalar) = value.scalar()
    {
        values.push(scalar.to_string());
    }

    ConditionRow {
        index: 0,
        parent_index: None,
        prefix: expr.attr("prefix"),
        open_bracket: expr.attr_count("openingBracketCount"),
        close_bracket: expr.attr_count("closingBracketCount"),
        property: prop_instance
            .and_then(|p| p.attr("propertyId"))
            .unwrap_or_else(|| UNKNOWN_PROPERTY.to_string()),
        operator: expr
            .attr("operatorId")
            .unwrap_or_else(|| DEFAULT_OPERATOR.to_string()),
        property_values: PropertyValues::from_values(values),
        expression_mode: expression.as_ref().map(ParamValue::mode),
        expression_value: expression,
        error: None,
        lists_resolved: None,
    }
}

/// The expression's own right-hand-side parameter, when present.
///
/// A parameter without a `value` wrapper degrades to `Meta`, carrying the
/// identifier attributes the source put on the parameter itself.
fn parse_expression_parameter(expr: &Value, options: &ParseOptions) -> Option<ParamValue> {
    // An empty parameter object counts as absent, so the alternate
    // property-instance encoding still gets its chance.
    let param = expr
        .child("parameter")
        .filter(|p| p.as_object().is_some_and(|map| !map.is_empty()))?;

    if let Some(value) = param.child("value").filter(|v| v.is_object()) {
        if let Some(nested) = value.child("propertyInstance") {
            return Some(parse_property_eval(nested, 0, options));
        }
        if let Some(sv) = value.child("stringValue") {
            return Some(literal_value(sv));
        }
        if let Some(lv) = value.child("listValue") {
            return Some(list_value(lv));
        }
    }

    Some(ParamValue::Meta {
        value_type: param.attr("valueType"),
        value_id: param.attr("valueId"),
        type_id: param.attr("typeId"),
    })
}

/// One dedicated (unnamed) parameter: literal, list reference, or nested
/// property evaluation.
fn parse_single_parameter(param: &Value, depth: usize, options: &ParseOptions) -> ParamValue {
    let value = param.child("value");

    if let Some(value) = value.filter(|v| v.is_object()) {
        if let Some(sv) = value.child("stringValue") {
            return literal_value(sv);
        }
        if let Some(lv) = value.child("listValue") {
            return list_value(lv);
        }
        if let Some(nested) = value.child("propertyInstance") {
            return parse_property_eval(nested, depth + 1, options);
        }
    }

    ParamValue::Opaque {
        raw: value.cloned().unwrap_or(Value::Null),
    }
}

/// The named-parameter map of a property instance (`parameters.entry`).
fn parse_parameter_entries(
    parameters: Option<&Value>,
    depth: usize,
    options: &ParseOptions,
) -> Vec<NamedParameter> {
    let entries = ensure_sequence(parameters.and_then(|p| p.child("entry")));
    let mut results = Vec::with_capacity(entries.len());

    for entry in entries {
        if let Value::String(bare) = entry {
            // Bare string entry, no parameter wrapper at all.
            results.push(NamedParameter {
                key: None,
                value_type: None,
                value: ParamValue::Literal {
                    value: Some(bare.clone()),
                    modifier: None,
                    type_id: None,
                },
            });
            continue;
        }
        if !entry.is_object() {
            continue;
        }

        let key = entry.child("string").and_then(as_text);
        let param = entry.child("parameter");
        let value_type = param.and_then(|p| p.attr("valueType"));
        let value = match param {
            Some(param) => parse_single_parameter(param, depth, options),
            None => ParamValue::Opaque { raw: Value::Null },
        };

        results.push(NamedParameter {
            key,
            value_type,
            value,
        });
    }

    results
}

/// A nested property evaluation. Recurses through the same three-way
/// resolution as its parameters, bounded by `max_value_depth`; past the
/// bound the subtree is preserved opaquely instead of recursing further.
fn parse_property_eval(prop: &Value, depth: usize, options: &ParseOptions) -> ParamValue {
    if depth >= options.max_value_depth {
        warn!(
            event = "ExpressionSet",
            phase = "Resolve",
            depth,
            "nested property exceeds value depth bound, preserving raw subtree"
        );
        return ParamValue::Opaque { raw: prop.clone() };
    }

    let attributes = prop
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(k, _)| k.starts_with('@') && *k != "@propertyId")
                .filter_map(|(k, v)| {
                    as_text(v).map(|text| (k.trim_start_matches('@').to_string(), text))
                })
                .collect()
        })
        .unwrap_or_default();

    ParamValue::Property(PropertyEval {
        property: prop
            .attr("propertyId")
            .unwrap_or_else(|| UNKNOWN_PROPERTY.to_string()),
        attributes,
        parameters: parse_parameter_entries(prop.child("parameters"), depth + 1, options),
        parameter: prop
            .child("parameter")
            .map(|p| Box::new(parse_single_parameter(p, depth + 1, options))),
    })
}

fn literal_value(sv: &Value) -> ParamValue {
    ParamValue::Literal {
        value: sv.attr("value"),
        modifier: sv.attr("stringModifier"),
        type_id: sv.attr("typeId"),
    }
}

fn list_value(lv: &Value) -> ParamValue {
    ParamValue::List {
        list_id: lv.attr("id").unwrap_or_default(),
    }
}
