//! Introspection response model matching the `/api/sso/introspect` payload.

use serde::Serialize;
use serde_json::{Map, Value};

/// Typed view of an introspection body: `{ active, error?, ...claims }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntrospectionResponse {
    /// Whether the backend still accepts the token.
    pub active: bool,

    /// Reason given by the backend for an inactive token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Every other field, unmodified.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl IntrospectionResponse {
    /// Build the typed view from a raw body.
    ///
    /// `active` follows JSON truthiness; a non-object body yields an inactive response.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let mut claims = object.clone();
        let active = claims.remove("active").is_some_and(|v| is_truthy(&v));
        let error = claims.remove("error").as_ref().and_then(truthy_message);

        Self { active, error, claims }
    }

    /// Claim lookup by name.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Subject identifier (`sub`).
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.claim("sub").and_then(Value::as_str)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.claim("username").and_then(Value::as_str)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.claim("email").and_then(Value::as_str)
    }
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are false; everything else is true.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A truthy value rendered as a message: strings verbatim, anything else as JSON.
pub(crate) fn truthy_message(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
