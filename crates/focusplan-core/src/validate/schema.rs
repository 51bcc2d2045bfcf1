//! Declarative structural schema over `serde_json::Value`.
//!
//! A small subset of JSON Schema: types, required properties, enums,
//! numeric ranges, length and item caps, a few string formats, nullability,
//! and closed objects. Violations are collected, never raised.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::ValidationIssue;

/// String formats the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Zero-padded `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp with offset
    DateTime,
    /// `YYYY-MM-DDTHH:MM:SS` without offset
    LocalDateTime,
}

impl Format {
    fn name(self) -> &'static str {
        match self {
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::LocalDateTime => "local-date-time",
        }
    }

    fn accepts(self, s: &str) -> bool {
        match self {
            Format::Date => s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            Format::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
            Format::LocalDateTime => s.parse::<NaiveDateTime>().is_ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Schema {
    Object {
        properties: Vec<Property>,
        /// Whether keys not listed in `properties` are allowed
        additional: bool,
    },
    Array {
        items: Box<Schema>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        format: Option<Format>,
        one_of: Option<&'static [&'static str]>,
    },
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
    pub nullable: bool,
}

impl Property {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Property { name, schema, required: true, nullable: false }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Property { name, schema, required: false, nullable: false }
    }

    /// Allow an explicit `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Schema {
    /// Closed object with the given properties.
    pub fn object(properties: Vec<Property>) -> Self {
        Schema::Object { properties, additional: false }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array { items: Box::new(items), min_items: None, max_items: None }
    }

    pub fn string() -> Self {
        Schema::String { min_length: None, max_length: None, format: None, one_of: None }
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Schema::String { min_length: None, max_length: None, format: None, one_of: Some(values) }
    }

    pub fn formatted(format: Format) -> Self {
        Schema::String { min_length: None, max_length: None, format: Some(format), one_of: None }
    }

    pub fn integer(minimum: i64, maximum: i64) -> Self {
        Schema::Integer { minimum: Some(minimum), maximum: Some(maximum) }
    }

    pub fn number(minimum: f64, maximum: f64) -> Self {
        Schema::Number { minimum: Some(minimum), maximum: Some(maximum) }
    }

    /// Set length bounds on a string or item bounds on an array.
    pub fn len(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        match &mut self {
            Schema::String { min_length, max_length, .. } => {
                *min_length = min;
                *max_length = max;
            }
            Schema::Array { min_items, max_items, .. } => {
                *min_items = min;
                *max_items = max;
            }
            _ => {}
        }
        self
    }

    /// Collect every violation of `value` against this schema.
    pub fn check(&self, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        match self {
            Schema::Object { properties, additional } => {
                let Some(map) = value.as_object() else {
                    issues.push(ValidationIssue::new(path, "must be object", "type"));
                    return;
                };
                for prop in properties {
                    let child = format!("{path}/{}", prop.name);
                    match map.get(prop.name) {
                        None if prop.required => issues.push(ValidationIssue::new(
                            path,
                            format!("must have required property '{}'", prop.name),
                            "required",
                        )),
                        None => {}
                        Some(Value::Null) if prop.nullable => {}
                        Some(v) => prop.schema.check(v, &child, issues),
                    }
                }
                if !additional {
                    for key in map.keys() {
                        if !properties.iter().any(|p| p.name == key) {
                            issues.push(ValidationIssue::new(
                                &format!("{path}/{key}"),
                                "must not have additional properties",
                                "additionalProperties",
                            ));
                        }
                    }
                }
            }
            Schema::Array { items, min_items, max_items } => {
                let Some(list) = value.as_array() else {
                    issues.push(ValidationIssue::new(path, "must be array", "type"));
                    return;
                };
                if let Some(min) = min_items {
                    if list.len() < *min {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must not have fewer than {min} items"),
                            "minItems",
                        ));
                    }
                }
                if let Some(max) = max_items {
                    if list.len() > *max {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must not have more than {max} items"),
                            "maxItems",
                        ));
                    }
                }
                for (i, item) in list.iter().enumerate() {
                    items.check(item, &format!("{path}/{i}"), issues);
                }
            }
            Schema::String { min_length, max_length, format, one_of } => {
                let Some(s) = value.as_str() else {
                    issues.push(ValidationIssue::new(path, "must be string", "type"));
                    return;
                };
                let chars = s.chars().count();
                if let Some(min) = min_length {
                    if chars < *min {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must not have fewer than {min} characters"),
                            "minLength",
                        ));
                    }
                }
                if let Some(max) = max_length {
                    if chars > *max {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must not have more than {max} characters"),
                            "maxLength",
                        ));
                    }
                }
                if let Some(format) = format {
                    if !format.accepts(s) {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must match format \"{}\"", format.name()),
                            "format",
                        ));
                    }
                }
                if let Some(allowed) = one_of {
                    if !allowed.contains(&s) {
                        issues.push(ValidationIssue::new(
                            path,
                            format!("must be equal to one of the allowed values: {}", allowed.join(", ")),
                            "enum",
                        ));
                    }
                }
            }
            Schema::Integer { minimum, maximum } => {
                let Some(n) = value.as_i64() else {
                    let message = if value.as_u64().is_some() {
                        "must be a 64-bit signed integer"
                    } else {
                        "must be integer"
                    };
                    issues.push(ValidationIssue::new(path, message, "type"));
                    return;
                };
                check_range(n as f64, minimum.map(|m| m as f64), maximum.map(|m| m as f64), path, issues);
            }
            Schema::Number { minimum, maximum } => {
                let Some(n) = value.as_f64() else {
                    issues.push(ValidationIssue::new(path, "must be number", "type"));
                    return;
                };
                check_range(n, *minimum, *maximum, path, issues);
            }
        }
    }
}

fn check_range(
    n: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(min) = minimum {
        if n < min {
            issues.push(ValidationIssue::new(path, format!("must be >= {min}"), "minimum"));
        }
    }
    if let Some(max) = maximum {
        if n > max {
            issues.push(ValidationIssue::new(path, format!("must be <= {max}"), "maximum"));
        }
    }
}
