//! Built-in block helpers: `if`, `unless`, `with`, `each` (spec §4.3.4).

use std::collections::HashMap;

use crate::interpreter::context::DataFrame;
use crate::interpreter::error::RenderError;
use crate::interpreter::value::Value;

use super::{HelperCall, HelperFn};

pub fn register(map: &mut HashMap<String, HelperFn>) {
    map.insert("if".to_string(), std::rc::Rc::new(if_helper));
    map.insert("unless".to_string(), std::rc::Rc::new(unless_helper));
    map.insert("with".to_string(), std::rc::Rc::new(with_helper));
    map.insert("each".to_string(), std::rc::Rc::new(each_helper));
}

fn require_one_arg(call: &HelperCall, name: &str) -> Result<Value, RenderError> {
    if call.params.len() != 1 {
        return Err(RenderError::arity(name));
    }
    Ok(call.arg(0))
}

fn if_helper(call: &mut HelperCall) -> Result<Value, RenderError> {
    let value = require_one_arg(call, "if")?;
    let this = call.this.clone();
    let rendered = if !value.is_empty() {
        call.render_main(this, None)?
    } else {
        call.render_inverse(this, None)?
    };
    Ok(Value::safe_string(rendered))
}

fn unless_helper(call: &mut HelperCall) -> Result<Value, RenderError> {
    let value = require_one_arg(call, "unless")?;
    let this = call.this.clone();
    let rendered = if value.is_empty() {
        call.render_main(this, None)?
    } else {
        call.render_inverse(this, None)?
    };
    Ok(Value::safe_string(rendered))
}

fn with_helper(call: &mut HelperCall) -> Result<Value, RenderError> {
    let value = require_one_arg(call, "with")?;
    let this = call.this.clone();
    let rendered = if value.is_empty() {
        call.render_inverse(this, None)?
    } else {
        call.render_main(value, None)?
    };
    Ok(Value::safe_string(rendered))
}

fn each_helper(call: &mut HelperCall) -> Result<Value, RenderError> {
    let value = require_one_arg(call, "each")?;
    let this = call.this.clone();

    match &value {
        Value::Array(items) if !items.is_empty() => {
            let len = items.len();
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                let data = DataFrame::new()
                    .with("index", Value::Number(i as f64))
                    .with("first", Value::Bool(i == 0))
                    .with("last", Value::Bool(i + 1 == len));
                out.push_str(&call.render_main(item.clone(), Some(data))?);
            }
            Ok(Value::safe_string(out))
        }
        Value::Map(pairs) if !pairs.is_empty() => {
            let len = pairs.len();
            let mut out = String::new();
            for (i, (key, item)) in pairs.iter().enumerate() {
                let data = DataFrame::new()
                    .with("key", Value::string(key.clone()))
                    .with("first", Value::Bool(i == 0))
                    .with("last", Value::Bool(i + 1 == len));
                out.push_str(&call.render_main(item.clone(), Some(data))?);
            }
            Ok(Value::safe_string(out))
        }
        _ => Ok(Value::safe_string(call.render_inverse(this, None)?)),
    }
}
