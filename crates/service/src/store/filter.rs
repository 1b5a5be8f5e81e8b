//! Query filters over documents.
//!
//! A filter is a document of `field -> condition`. A plain value means
//! equality; an object whose keys all start with `$` is a set of operators
//! (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$regex` + `$options`).
//! All conditions must hold for a document to match.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::{compare_values, lookup, values_equal, Document, ID_FIELD};
use crate::errors::ServiceError;

#[derive(Clone, Debug, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

#[derive(Clone, Debug)]
struct Condition {
    path: String,
    op: Op,
}

#[derive(Clone, Debug)]
enum Op {
    Eq(Value),
    Ne(Value),
    Cmp(Ordering, bool, Value),
    In(Vec<Value>),
    Regex(Regex),
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::eq(ID_FIELD, Value::String(id.to_string()))
    }

    pub fn eq(path: impl Into<String>, value: Value) -> Self {
        Self { conditions: vec![Condition { path: path.into(), op: Op::Eq(value) }] }
    }

    /// Regex match on a string field; `case_insensitive` mirrors the `i` option.
    pub fn regex(path: impl Into<String>, pattern: &str, case_insensitive: bool) -> Result<Self, ServiceError> {
        let options = if case_insensitive { "i" } else { "" };
        let re = build_regex(pattern, options)?;
        Ok(Self { conditions: vec![Condition { path: path.into(), op: Op::Regex(re) }] })
    }

    /// Parse a filter document as submitted by a client.
    pub fn parse(doc: &Document) -> Result<Self, ServiceError> {
        let mut conditions = Vec::with_capacity(doc.len());
        for (path, value) in doc {
            if path.starts_with('$') {
                return Err(ServiceError::InvalidFilter(format!("unsupported top-level operator {path}")));
            }
            match value {
                Value::Object(ops) if is_operator_object(ops) => {
                    parse_operators(path, ops, &mut conditions)?;
                }
                other => conditions.push(Condition { path: path.clone(), op: Op::Eq(other.clone()) }),
            }
        }
        Ok(Self { conditions })
    }

    /// Conjunction of two filters.
    pub fn and(mut self, other: Filter) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}

fn is_operator_object(ops: &serde_json::Map<String, Value>) -> bool {
    !ops.is_empty() && ops.keys().all(|k| k.starts_with('$'))
}

fn parse_operators(
    path: &str,
    ops: &serde_json::Map<String, Value>,
    out: &mut Vec<Condition>,
) -> Result<(), ServiceError> {
    let options = match ops.get("$options") {
        None => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(ServiceError::InvalidFilter("$options must be a string".into())),
    };
    if ops.contains_key("$options") && !ops.contains_key("$regex") {
        return Err(ServiceError::InvalidFilter("$options needs a $regex".into()));
    }

    for (name, operand) in ops {
        let op = match name.as_str() {
            "$eq" => Op::Eq(operand.clone()),
            "$ne" => Op::Ne(operand.clone()),
            "$gt" => Op::Cmp(Ordering::Greater, false, operand.clone()),
            "$gte" => Op::Cmp(Ordering::Greater, true, operand.clone()),
            "$lt" => Op::Cmp(Ordering::Less, false, operand.clone()),
            "$lte" => Op::Cmp(Ordering::Less, true, operand.clone()),
            "$in" => match operand {
                Value::Array(items) => Op::In(items.clone()),
                _ => return Err(ServiceError::InvalidFilter("$in needs an array".into())),
            },
            "$regex" => match operand {
                Value::String(pattern) => Op::Regex(build_regex(pattern, options)?),
                _ => return Err(ServiceError::InvalidFilter("$regex needs a string".into())),
            },
            "$options" => continue,
            other => return Err(ServiceError::InvalidFilter(format!("unknown operator {other}"))),
        };
        out.push(Condition { path: path.to_string(), op });
    }
    Ok(())
}

fn build_regex(pattern: &str, options: &str) -> Result<Regex, ServiceError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in options.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(ServiceError::InvalidFilter(format!("unknown regex option {other:?}"))),
        };
    }
    builder
        .build()
        .map_err(|e| ServiceError::InvalidFilter(format!("invalid regex: {e}")))
}

impl Condition {
    fn matches(&self, doc: &Document) -> bool {
        let field = lookup(doc, &self.path);
        match &self.op {
            Op::Eq(v) => eq_matches(field, v),
            Op::Ne(v) => !eq_matches(field, v),
            Op::In(items) => items.iter().any(|v| eq_matches(field, v)),
            Op::Cmp(wanted, inclusive, operand) => {
                any_element(field, |x| cmp_matches(x, *wanted, *inclusive, operand))
            }
            Op::Regex(re) => any_element(field, |x| x.as_str().is_some_and(|s| re.is_match(s))),
        }
    }
}

// A null operand also matches a missing field.
fn eq_matches(field: Option<&Value>, operand: &Value) -> bool {
    match field {
        None => operand.is_null(),
        Some(v) if values_equal(v, operand) => true,
        Some(Value::Array(items)) => items.iter().any(|x| values_equal(x, operand)),
        Some(_) => false,
    }
}

fn any_element(field: Option<&Value>, pred: impl Fn(&Value) -> bool) -> bool {
    match field {
        None => false,
        Some(Value::Array(items)) => items.iter().any(&pred),
        Some(v) => pred(v),
    }
}

// Range comparisons only hold between values of the same JSON type.
fn cmp_matches(value: &Value, wanted: Ordering, inclusive: bool, operand: &Value) -> bool {
    if std::mem::discriminant(value) != std::mem::discriminant(operand) {
        return false;
    }
    let ord = compare_values(Some(value), Some(operand));
    ord == wanted || (inclusive && ord == Ordering::Equal)
}
