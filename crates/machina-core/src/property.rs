//! Property path access over the serialized form of entities.
//!
//! A property path is a dot-separated list of field names, e.g.
//! `"address.city"`. Numeric segments index into arrays (`"tags.0"`).

use crate::{DaoError, DaoResult, SortCriterion};
use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Converts an entity into its property tree.
pub fn to_value<T: Serialize>(entity: &T) -> DaoResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

/// Resolves a property path against a property tree.
///
/// Walking through a `null` (an unset nested object) yields `null`, as do an
/// array index past the end and a field the object does not have. Paths are
/// resolved per row, so a field one row omits from its serialized form (for
/// example through `skip_serializing_if`) sorts as `null` there. An empty
/// segment, a non-numeric segment into an array and a descent into a scalar
/// are invalid arguments.
pub fn resolve(value: &Value, path: &str) -> DaoResult<Value> {
    if path.split('.').any(str::is_empty) {
        return Err(DaoError::invalid_argument(format!(
            "Empty segment in property path '{path}'"
        )));
    }

    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Null => return Ok(Value::Null),
            Value::Object(fields) => match fields.get(segment) {
                Some(field) => field,
                None => return Ok(Value::Null),
            },
            Value::Array(items) => {
                let index: usize = segment.parse().map_err(|_| {
                    DaoError::invalid_argument(format!(
                        "Segment '{segment}' of path '{path}' is not an array index"
                    ))
                })?;
                match items.get(index) {
                    Some(item) => item,
                    None => return Ok(Value::Null),
                }
            }
            _ => {
                return Err(DaoError::invalid_argument(format!(
                    "Property path '{path}' descends into a scalar at '{segment}'"
                )))
            }
        };
    }

    Ok(current.clone())
}

/// Total order over property values.
///
/// Values of different kinds order as
/// `null < bool < number < string < array < object`.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b)
            .map(|(l, r)| compare_values(l, r))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(_), Value::Object(_)) => left.to_string().cmp(&right.to_string()),
        _ => kind_rank(left).cmp(&kind_rank(right)),
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

const fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Sorts entities by the given criteria, primary first.
///
/// The sort is stable: entities equal under every criterion keep their
/// incoming order. With no criteria the input is returned unchanged.
pub fn sort_entities<T: Serialize>(
    entities: Vec<T>,
    criteria: &[SortCriterion],
) -> DaoResult<Vec<T>> {
    if criteria.is_empty() {
        return Ok(entities);
    }

    let mut keyed = entities
        .into_iter()
        .map(|entity| -> DaoResult<(Vec<Value>, T)> {
            let tree = to_value(&entity)?;
            let keys = criteria
                .iter()
                .map(|criterion| resolve(&tree, criterion.property()))
                .collect::<DaoResult<Vec<_>>>()?;
            Ok((keys, entity))
        })
        .collect::<DaoResult<Vec<_>>>()?;

    keyed.sort_by(|(left, _), (right, _)| {
        criteria
            .iter()
            .zip(left.iter().zip(right))
            .map(|(criterion, (l, r))| criterion.compare(l, r))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    Ok(keyed.into_iter().map(|(_, entity)| entity).collect())
}
