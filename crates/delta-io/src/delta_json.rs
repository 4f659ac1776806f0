//! Parsing Delta JSON with diagnostics that point at the offending op.
//!
//! A document is either a bare op array or an object `{"ops": [...]}`. Op
//! shape rules live in [`delta_core::Op`]'s `Deserialize`.

use std::fmt;

use delta_core::{Delta, Op};
use serde::de::Error as _;
use serde_json::Value;

/// A structured error for parsing a Delta JSON payload.
#[derive(Debug)]
pub enum DeltaJsonError {
    /// The input was not valid JSON.
    InvalidJson(serde_json::Error),
    /// Valid JSON that is neither an op array nor an object with an `ops` array.
    InvalidTopLevel(&'static str),
    /// The op at `index` does not have a legal op shape.
    InvalidOp {
        index: usize,
        source: serde_json::Error,
    },
}

impl fmt::Display for DeltaJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaJsonError::InvalidJson(e) => write!(f, "Invalid JSON: {e}"),
            DeltaJsonError::InvalidTopLevel(found) => write!(
                f,
                "Invalid Delta JSON: expected an op array or an object with an 'ops' array, found {found}."
            ),
            DeltaJsonError::InvalidOp { index, source } => {
                write!(f, "Invalid Delta JSON: ops[{index}]: {source}")
            }
        }
    }
}

impl std::error::Error for DeltaJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeltaJsonError::InvalidJson(e) => Some(e),
            DeltaJsonError::InvalidOp { source, .. } => Some(source),
            DeltaJsonError::InvalidTopLevel(_) => None,
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_op(index: usize, v: Value) -> Result<Op, DeltaJsonError> {
    let invalid = |source| DeltaJsonError::InvalidOp { index, source };
    if !v.is_object() {
        return Err(invalid(serde_json::Error::custom(format!(
            "expected an object, found {}",
            kind_of(&v)
        ))));
    }
    serde_json::from_value(v).map_err(invalid)
}

/// Parse a Delta JSON value.
pub fn parse_delta_json_value(v: Value) -> Result<Delta, DeltaJsonError> {
    let ops = match v {
        Value::Array(ops) => ops,
        Value::Object(mut obj) => match obj.remove("ops") {
            Some(Value::Array(ops)) => ops,
            Some(other) => return Err(DeltaJsonError::InvalidTopLevel(kind_of(&other))),
            None => return Err(DeltaJsonError::InvalidTopLevel("an object without 'ops'")),
        },
        other => return Err(DeltaJsonError::InvalidTopLevel(kind_of(&other))),
    };

    ops.into_iter()
        .enumerate()
        .map(|(i, op)| parse_op(i, op))
        .collect::<Result<Vec<_>, _>>()
        .map(Delta::from_ops)
}

/// Parse a Delta JSON string.
pub fn parse_delta_json_str(s: &str) -> Result<Delta, DeltaJsonError> {
    let v: Value = serde_json::from_str(s).map_err(DeltaJsonError::InvalidJson)?;
    parse_delta_json_value(v)
}

/// Minified wire form: a bare op array.
pub fn to_delta_json_string(delta: &Delta) -> Result<String, serde_json::Error> {
    serde_json::to_string(delta)
}
