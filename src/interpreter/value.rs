//! The runtime value tree (spec §9 Design Notes: "Polymorphic values").
//!
//! A tagged union rather than `serde_json::Value` directly, so the
//! interpreter can carry callables (`Fn`) and the `SafeString` escape
//! sentinel that JSON has no room for. The `serde_json` bridge below is
//! the crate's ambient concession to how real hosts build contexts.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A runtime context/argument value.
///
/// `Clone` is cheap: `String`/`Array`/`Map` share their backing storage
/// via `Rc`, and `Fn` is already reference-counted.
#[derive(Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    /// A value tagged as pre-escaped; escaping passes over it unchanged
    /// (spec §9 "SafeString sentinel").
    SafeString(Rc<str>),
    Array(Rc<Vec<Value>>),
    /// Preserves insertion order, as object property iteration (`each`)
    /// must (spec §4.3.4).
    Map(Rc<Vec<(String, Value)>>),
    Fn(Rc<dyn Fn(&Value) -> Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::from(s.into()))
    }

    pub fn safe_string(s: impl Into<String>) -> Self {
        Value::SafeString(Rc::from(s.into()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn map(pairs: Vec<(String, Value)>) -> Self {
        Value::Map(Rc::new(pairs))
    }

    /// `isEmpty` per spec §4.3.4: falsy for `undefined`, `null`, `false`,
    /// empty string, and empty array; truthy for everything else
    /// including `0` and an empty object.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null | Value::Undefined => true,
            Value::Bool(b) => !*b,
            Value::String(s) | Value::SafeString(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Number(_) | Value::Map(_) | Value::Fn(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) | Value::SafeString(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Own-property lookup by string key; numeric-looking keys also
    /// index into arrays. Never traverses anything resembling a
    /// prototype chain (spec §4.3.3: "must not traverse through
    /// inherited object prototype chains").
    pub fn get_own(&self, key: &str) -> Value {
        if is_unsafe_key(key) {
            return Value::Undefined;
        }
        match self {
            Value::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or(Value::Undefined),
            _ => Value::Undefined,
        }
    }

    /// Call as a zero-argument lambda bound to `this`, per the leaf-call
    /// rule in path resolution (spec §4.3.3 point 5). Non-callables pass
    /// through unchanged.
    pub fn call_bound(&self, this: &Value) -> Value {
        match self {
            Value::Fn(f) => f(this),
            other => other.clone(),
        }
    }

    pub fn truthy(&self) -> bool {
        !self.is_empty()
    }

    /// Structural equality used by the `eq`/`ne` value helpers.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b))
            | (Value::SafeString(a), Value::SafeString(b))
            | (Value::String(a), Value::SafeString(b))
            | (Value::SafeString(a), Value::String(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }

    pub fn partial_cmp_numeric(&self, other: &Value) -> Option<Ordering> {
        self.as_f64()?.partial_cmp(&other.as_f64()?)
    }
}

/// Disallow keys that would reach into Rust-side plumbing if a host ever
/// backed `Map` with something reflective; kept even though this crate's
/// own `Map` is a plain `Vec`, to close off the injection vector named
/// in spec §4.3.3.
fn is_unsafe_key(key: &str) -> bool {
    matches!(
        key,
        "__proto__" | "constructor" | "prototype"
    )
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Undefined => write!(f, "Undefined"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::SafeString(s) => write!(f, "SafeString({s:?})"),
            Value::Array(items) => write!(f, "Array({items:?})"),
            Value::Map(pairs) => write!(f, "Map({pairs:?})"),
            Value::Fn(_) => write!(f, "Fn(..)"),
        }
    }
}

/// Render-time stringification of a value standing alone in a mustache
/// (spec §4.3.2): `null`/`undefined` vanish, booleans/numbers become
/// their decimal form, strings pass through, and a function is first
/// called then stringified recursively.
pub fn stringify(value: &Value, this: &Value) -> String {
    match value {
        Value::Null | Value::Undefined => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) | Value::SafeString(s) => s.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| stringify(v, this))
            .collect::<Vec<_>>()
            .join(","),
        Value::Map(_) => "[object Object]".to_string(),
        Value::Fn(f) => stringify(&f(this), this),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// `true` iff escaping must be skipped for this value (spec §4.3.6:
/// "A SafeString-tagged return bypasses escaping").
pub fn is_safe(value: &Value) -> bool {
    matches!(value, Value::SafeString(_))
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s.clone()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}

/// Fails only on `Fn` values, which have no JSON representation.
impl TryFrom<Value> for serde_json::Value {
    type Error = UnrepresentableValue;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) | Value::SafeString(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items.iter() {
                    out.push(serde_json::Value::try_from(item.clone())?);
                }
                serde_json::Value::Array(out)
            }
            Value::Map(pairs) => {
                let mut out = serde_json::Map::with_capacity(pairs.len());
                for (k, v) in pairs.iter() {
                    out.insert(k.clone(), serde_json::Value::try_from(v.clone())?);
                }
                serde_json::Value::Object(out)
            }
            Value::Fn(_) => return Err(UnrepresentableValue),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnrepresentableValue;

impl fmt::Display for UnrepresentableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value contains a callable with no JSON representation")
    }
}

impl std::error::Error for UnrepresentableValue {}
