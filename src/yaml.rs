use std::collections::BTreeMap;
use crate::context::{Context, Value};
pub use serde_yaml::Value as YamlValue;


impl From<&YamlValue> for Value {
    fn from(yaml: &YamlValue) -> Value {
        match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(*b),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            YamlValue::String(s) => Value::text(s),
            YamlValue::Sequence(seq) => Value::Sequence(
                seq.iter()
                    .map(Value::from)
                    .collect::<_>()
            ),
            YamlValue::Mapping(map) => Value::Mapping(
                map.iter()
                    .filter_map(|(key, value)| {
                        key.as_str().map(|key| (key.to_owned(), Value::from(value)))
                    })
                    .collect::<BTreeMap<_, _>>()
            ),
            YamlValue::Tagged(tagged) => Value::from(&tagged.value),
        }
    }
}

/// A YAML mapping becomes a context; entries with non-string keys are
/// skipped since template variables are always named.
impl From<&YamlValue> for Context {
    fn from(yaml: &YamlValue) -> Context {
        let mut context = Context::new();
        if let YamlValue::Mapping(map) = yaml {
            for (key, value) in map {
                if let Some(name) = key.as_str() {
                    context.set(name, Value::from(value));
                }
            }
        }
        context
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_becomes_context() {
        let yaml = serde_yaml::from_str::<YamlValue>(
            "name: ned\ntopics:\n  - a\n  - b\n"
        ).unwrap();
        let context = Context::from(&yaml);
        assert_eq!(context.get("name").unwrap().to_text(), "ned");
        assert!(matches!(context.get("topics"), Some(Value::Sequence(seq)) if seq.len() == 2));
    }

    #[test]
    fn scalar_becomes_empty_context() {
        let yaml = serde_yaml::from_str::<YamlValue>("42").unwrap();
        assert!(Context::from(&yaml).get("42").is_none());
    }
}
