use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

/// A structured key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: Value,
}

/// Shorthand for [`Field::new`].
///
/// ```
/// let code = tierlog::field("code", 42);
/// assert_eq!(code.key(), "code");
/// ```
pub fn field(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Field {
    Field::new(key, value)
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attach any serializable value. A value that fails to serialize is
    /// kept as its error message so the record is never lost.
    pub fn json<T: Serialize + ?Sized>(key: impl Into<Cow<'static, str>>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {}>", e)));
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Encode fields as a JSON object keeping call order and duplicate keys.
pub(crate) fn write_object(fields: &[Field], out: &mut String) {
    out.push('{');
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // Serializing a str or a Value into a String cannot fail.
        out.push_str(&serde_json::to_string(field.key()).unwrap_or_default());
        out.push(':');
        out.push_str(&field.value.to_string());
    }
    out.push('}');
}
