//! Declarative request shapes
//!
//! A [`RouteSchema`] declares what an endpoint accepts in its query string,
//! path parameters and JSON body. Validation walks all three sections, coerces
//! values to their declared types, and collects every violation before giving
//! up, so a client sees all its mistakes at once.
//!
//! ```rust,ignore
//! let schema = RouteSchema::new()
//!     .query(ObjectSchema::new().field("userId", FieldSpec::record_id().required()))
//!     .params(ObjectSchema::new().field("invoiceId", FieldSpec::record_id().required()));
//! ```

use serde_json::{Map, Value};

use super::{filters, validators};
use crate::core::error::{FieldViolation, ValidationError};

/// Accepted type of a single field
#[derive(Debug, Clone)]
pub enum Shape {
    String { allow_empty: bool },
    Email,
    Number,
    Integer { min: i64 },
    Date,
    RecordId,
    Object(ObjectSchema),
    Array(Box<FieldSpec>),
}

/// A field's shape plus whether it must be present
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub shape: Shape,
    pub required: bool,
}

impl FieldSpec {
    fn of(shape: Shape) -> Self {
        Self {
            shape,
            required: false,
        }
    }

    pub fn string() -> Self {
        Self::of(Shape::String { allow_empty: false })
    }

    /// String that may be `""`
    pub fn text() -> Self {
        Self::of(Shape::String { allow_empty: true })
    }

    pub fn email() -> Self {
        Self::of(Shape::Email)
    }

    pub fn number() -> Self {
        Self::of(Shape::Number)
    }

    pub fn positive_integer() -> Self {
        Self::of(Shape::Integer { min: 1 })
    }

    pub fn date() -> Self {
        Self::of(Shape::Date)
    }

    pub fn record_id() -> Self {
        Self::of(Shape::RecordId)
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::of(Shape::Object(schema))
    }

    pub fn array_of(item: FieldSpec) -> Self {
        Self::of(Shape::Array(Box::new(item)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Ordered set of known keys; anything else is rejected
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(&'static str, FieldSpec)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, spec: FieldSpec) -> Self {
        self.fields.push((name, spec));
        self
    }

    fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, spec)| spec)
    }

    /// Validate an object, returning the normalized copy
    pub fn validate(
        &self,
        prefix: &str,
        input: Map<String, Value>,
        violations: &mut Vec<FieldViolation>,
    ) -> Map<String, Value> {
        let mut output = Map::new();

        for (key, value) in input {
            let path = join_path(prefix, &key);
            match self.spec(&key) {
                Some(spec) => {
                    if let Some(normalized) = validate_field(&path, spec, value, violations) {
                        output.insert(key, normalized);
                    }
                }
                None => violations.push(FieldViolation::new(
                    path.clone(),
                    format!("\"{}\" is not allowed", path),
                )),
            }
        }

        for (name, spec) in &self.fields {
            if spec.required && !output.contains_key(*name) {
                let path = join_path(prefix, name);
                // Already reported if present but invalid
                if violations.iter().any(|v| v.field == path) {
                    continue;
                }
                if let Err(message) = validators::required()(&path, &Value::Null) {
                    violations.push(FieldViolation::new(path, message));
                }
            }
        }

        output
    }
}

/// Query, path and body shapes of one endpoint
#[derive(Debug, Clone, Default)]
pub struct RouteSchema {
    pub query: Option<ObjectSchema>,
    pub params: Option<ObjectSchema>,
    pub body: Option<ObjectSchema>,
}

/// Normalized sections of a request that passed validation
#[derive(Debug, Clone, Default)]
pub struct ValidatedParts {
    pub query: Map<String, Value>,
    pub params: Map<String, Value>,
    pub body: Map<String, Value>,
}

impl RouteSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, schema: ObjectSchema) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn params(mut self, schema: ObjectSchema) -> Self {
        self.params = Some(schema);
        self
    }

    pub fn body(mut self, schema: ObjectSchema) -> Self {
        self.body = Some(schema);
        self
    }

    /// Validate all declared sections; undeclared sections are ignored
    pub fn validate(
        &self,
        query: Map<String, Value>,
        params: Map<String, Value>,
        body: Value,
    ) -> Result<ValidatedParts, ValidationError> {
        let mut violations = Vec::new();
        let mut parts = ValidatedParts::default();

        if let Some(schema) = &self.query {
            parts.query = schema.validate("", query, &mut violations);
        }
        if let Some(schema) = &self.params {
            parts.params = schema.validate("", params, &mut violations);
        }
        if let Some(schema) = &self.body {
            match body {
                Value::Object(map) => parts.body = schema.validate("", map, &mut violations),
                Value::Null => parts.body = schema.validate("", Map::new(), &mut violations),
                _ => violations.push(FieldViolation::new(
                    "body",
                    "\"body\" must be of type object",
                )),
            }
        }

        if violations.is_empty() {
            Ok(parts)
        } else {
            Err(ValidationError::Failed(violations))
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Coerce, check and normalize one value; `None` means it was rejected
fn validate_field(
    path: &str,
    spec: &FieldSpec,
    value: Value,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    let mut reject = |message: String| {
        violations.push(FieldViolation::new(path, message));
        None
    };

    // Explicit nulls are type errors, not omissions
    match &spec.shape {
        Shape::String { allow_empty } => {
            validators::string(*allow_empty)(path, &value).map_or_else(reject, |_| Some(value))
        }
        Shape::Email => {
            if let Err(message) = validators::string(true)(path, &value) {
                return reject(message);
            }
            let value = filters::trim()(path, value).ok()?;
            let value = filters::lowercase()(path, value).ok()?;
            validators::email()(path, &value).map_or_else(reject, |_| Some(value))
        }
        Shape::Number => {
            let value = filters::to_number()(path, value).ok()?;
            validators::number()(path, &value).map_or_else(reject, |_| Some(value))
        }
        Shape::Integer { min } => {
            let value = filters::to_number()(path, value).ok()?;
            let checked = validators::number()(path, &value)
                .and_then(|_| validators::integer()(path, &value))
                .and_then(|_| validators::min_value(*min as f64)(path, &value));
            checked.map_or_else(reject, |_| Some(value))
        }
        Shape::Date => {
            let value = filters::to_rfc3339_date()(path, value).ok()?;
            validators::rfc3339_date()(path, &value).map_or_else(reject, |_| Some(value))
        }
        Shape::RecordId => validators::record_id()(path, &value)
            .map_or_else(reject, |_| value.as_str().map(|s| Value::String(s.to_lowercase()))),
        Shape::Object(schema) => match value {
            Value::Object(map) => Some(Value::Object(schema.validate(path, map, violations))),
            other => validators::object()(path, &other).err().and_then(reject),
        },
        Shape::Array(item) => match value {
            Value::Array(values) => {
                let items = values
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, v)| {
                        validate_field(&format!("{}.{}", path, i), item, v, violations)
                    })
                    .collect();
                Some(Value::Array(items))
            }
            other => validators::array()(path, &other).err().and_then(reject),
        },
    }
}
