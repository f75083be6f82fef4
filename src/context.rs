use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use crate::error::RenderError;

/// A dynamic value living in a rendering context.
///
/// Mirrors what untyped template data needs: scalars, sequences, mappings,
/// plus two callable forms: [`Value::filter`] for pipe targets and
/// [`Value::thunk`] for zero-argument callables invoked by the dot resolver.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
    Filter(Rc<dyn Fn(&Value) -> Value>),
    Thunk(Rc<dyn Fn() -> Value>),
}

impl Value {
    pub fn null() -> Value {
        Value::Null
    }

    pub fn bool(b: bool) -> Value {
        Value::Bool(b)
    }

    pub fn int(n: i64) -> Value {
        Value::Int(n)
    }

    pub fn float(n: f64) -> Value {
        Value::Float(n)
    }

    pub fn text(t: &str) -> Value {
        Value::Text(t.to_owned())
    }

    pub fn sequence(items: Vec<Value>) -> Value {
        Value::Sequence(items)
    }

    pub fn mapping(entries: BTreeMap<String, Value>) -> Value {
        Value::Mapping(entries)
    }

    pub fn filter<F>(fun: F) -> Value
    where F: Fn(&Value) -> Value + 'static {
        Value::Filter(Rc::new(fun))
    }

    pub fn thunk<F>(fun: F) -> Value
    where F: Fn() -> Value + 'static {
        Value::Thunk(Rc::new(fun))
    }

    /// Truthiness used by `if` blocks: empty and zero values are falsy,
    /// callables are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Text(t) => !t.is_empty(),
            Value::Sequence(seq) => !seq.is_empty(),
            Value::Mapping(map) => !map.is_empty(),
            Value::Filter(_) | Value::Thunk(_) => true,
        }
    }

    /// Text form spliced into the output. Containers and callables have no
    /// useful text form and coerce to the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Text(t) => t.clone(),
            _ => String::new(),
        }
    }

    /// Elements a `for` loop walks over. Mappings iterate their keys in
    /// sorted order so rendering stays deterministic.
    pub(crate) fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq.clone()),
            Value::Mapping(map) => Some(
                map.keys()
                    .map(|key| Value::text(key))
                    .collect::<_>()
            ),
            Value::Text(t) => Some(
                t.chars()
                    .map(|c| Value::Text(c.to_string()))
                    .collect::<_>()
            ),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(n) => write!(f, "Float({})", n),
            Value::Text(t) => write!(f, "Text({:?})", t),
            Value::Sequence(seq) => write!(f, "Sequence({:?})", seq),
            Value::Mapping(map) => write!(f, "Mapping({:?})", map),
            Value::Filter(_) => write!(f, "Filter(..)"),
            Value::Thunk(_) => write!(f, "Thunk(..)"),
        }
    }
}


/// Named bindings supplied to a render routine.
///
/// Later entries win on [`Context::merge`]; a template stores one merged
/// base context and `render_with` merges per-call overrides on top.
#[derive(Clone, Debug, Default)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Context { entries: BTreeMap::new() }
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.entries.insert(name.to_owned(), value);
    }

    /// Merge `other` into `self`, entries from `other` overriding.
    pub fn merge(&mut self, other: &Context) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }
}


/// Resolve a single accessor step at render time.
///
/// Mappings resolve by key, sequences by numeric index; if the resolved
/// value is a zero-argument callable it is invoked and the result used
/// instead. Handles exactly one accessor per call; chains are realized by
/// nested calls from the compiled expression, never here.
pub(crate) fn resolve_dot(value: &Value, name: &str) -> Result<Value, RenderError> {
    let resolved = match value {
        Value::Mapping(map) => map.get(name).cloned(),
        Value::Sequence(seq) => name.parse::<usize>()
            .ok()
            .and_then(|index| seq.get(index))
            .cloned(),
        _ => None,
    };
    match resolved {
        Some(Value::Thunk(fun)) => Ok(fun()),
        Some(value) => Ok(value),
        None => Err(RenderError::Lookup { name: name.to_owned() }),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_falsy() {
        assert!(!Value::null().is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(!Value::int(0).is_truthy());
        assert!(!Value::sequence(vec![]).is_truthy());
        assert!(Value::text("x").is_truthy());
        assert!(Value::int(-1).is_truthy());
        assert!(Value::thunk(Value::null).is_truthy());
    }

    #[test]
    fn resolve_mapping_key() {
        let value = Value::mapping(BTreeMap::from([
            ("name".to_owned(), Value::text("ned"))
        ]));
        assert_eq!(resolve_dot(&value, "name").unwrap().to_text(), "ned");
    }

    #[test]
    fn resolve_sequence_index() {
        let value = Value::sequence(vec![Value::text("a"), Value::text("b")]);
        assert_eq!(resolve_dot(&value, "1").unwrap().to_text(), "b");
    }

    #[test]
    fn resolve_invokes_thunk() {
        let value = Value::mapping(BTreeMap::from([
            ("now".to_owned(), Value::thunk(|| Value::text("later")))
        ]));
        assert_eq!(resolve_dot(&value, "now").unwrap().to_text(), "later");
    }

    #[test]
    fn resolve_failure_is_an_error() {
        let value = Value::text("scalar");
        match resolve_dot(&value, "name") {
            Err(RenderError::Lookup { name }) => assert_eq!(name, "name"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn merge_overrides_left_to_right() {
        let mut base = Context::new();
        base.set("x", Value::int(1));
        base.set("y", Value::int(2));
        let mut over = Context::new();
        over.set("x", Value::int(3));
        base.merge(&over);
        assert_eq!(base.get("x").unwrap().to_text(), "3");
        assert_eq!(base.get("y").unwrap().to_text(), "2");
    }
}
