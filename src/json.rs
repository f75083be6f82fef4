use std::collections::BTreeMap;
use crate::context::{Context, Value};
pub use serde_json::Value as JsonValue;


impl From<&JsonValue> for Value {
    fn from(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            JsonValue::String(s) => Value::text(s),
            JsonValue::Array(seq) => Value::Sequence(
                seq.iter()
                    .map(Value::from)
                    .collect::<_>()
            ),
            JsonValue::Object(map) => Value::Mapping(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect::<BTreeMap<_, _>>()
            ),
        }
    }
}

/// A JSON object becomes a context, one entry per member. Anything other
/// than an object has no names to bind and becomes an empty context.
impl From<&JsonValue> for Context {
    fn from(json: &JsonValue) -> Context {
        let mut context = Context::new();
        if let JsonValue::Object(map) = json {
            for (name, value) in map {
                context.set(name, Value::from(value));
            }
        }
        context
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_becomes_context() {
        let json = serde_json::json!({"name": "ned", "count": 3});
        let context = Context::from(&json);
        assert_eq!(context.get("name").unwrap().to_text(), "ned");
        assert_eq!(context.get("count").unwrap().to_text(), "3");
    }

    #[test]
    fn nested_values_convert_recursively() {
        let json = serde_json::json!({"user": {"name": "ned"}, "xs": [1, 2]});
        let context = Context::from(&json);
        assert!(matches!(context.get("user"), Some(Value::Mapping(_))));
        assert!(matches!(context.get("xs"), Some(Value::Sequence(seq)) if seq.len() == 2));
    }

    #[test]
    fn non_object_becomes_empty_context() {
        let json = serde_json::json!([1, 2, 3]);
        assert!(Context::from(&json).get("0").is_none());
    }
}
