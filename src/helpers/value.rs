//! Built-in value helpers: `eq, ne, lt, lte, gt, gte, and, or, not,
//! lookup` — semantics pinned down in SPEC_FULL.md §4.4, since the
//! registration contract alone leaves their behavior unspecified.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::error::RenderError;
use crate::interpreter::value::Value;

use super::{HelperCall, HelperFn};

pub fn register(map: &mut HashMap<String, HelperFn>) {
    map.insert("eq".to_string(), Rc::new(eq) as HelperFn);
    map.insert("ne".to_string(), Rc::new(ne) as HelperFn);
    map.insert("lt".to_string(), Rc::new(lt) as HelperFn);
    map.insert("lte".to_string(), Rc::new(lte) as HelperFn);
    map.insert("gt".to_string(), Rc::new(gt) as HelperFn);
    map.insert("gte".to_string(), Rc::new(gte) as HelperFn);
    map.insert("and".to_string(), Rc::new(and) as HelperFn);
    map.insert("or".to_string(), Rc::new(or) as HelperFn);
    map.insert("not".to_string(), Rc::new(not) as HelperFn);
    map.insert("lookup".to_string(), Rc::new(lookup) as HelperFn);
}

fn eq(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(Value::Bool(call.arg(0).equals(&call.arg(1))))
}

fn ne(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(Value::Bool(!call.arg(0).equals(&call.arg(1))))
}

/// Numeric comparison; a non-numeric operand makes the comparison
/// `false` rather than erroring (§4.4).
fn compare(call: &HelperCall, want: fn(Ordering) -> bool) -> Value {
    match call.arg(0).partial_cmp_numeric(&call.arg(1)) {
        Some(ord) => Value::Bool(want(ord)),
        None => Value::Bool(false),
    }
}

fn lt(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(compare(call, |o| o == Ordering::Less))
}

fn lte(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(compare(call, |o| o != Ordering::Greater))
}

fn gt(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(compare(call, |o| o == Ordering::Greater))
}

fn gte(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(compare(call, |o| o != Ordering::Less))
}

fn and(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(Value::Bool(call.params.iter().all(Value::truthy)))
}

fn or(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(Value::Bool(call.params.iter().any(Value::truthy)))
}

fn not(call: &mut HelperCall) -> Result<Value, RenderError> {
    Ok(Value::Bool(!call.arg(0).truthy()))
}

fn lookup(call: &mut HelperCall) -> Result<Value, RenderError> {
    let obj = call.arg(0);
    let key = call.arg(1);
    let key = match &key {
        Value::String(s) | Value::SafeString(s) => s.to_string(),
        Value::Number(n) => crate::interpreter::value::stringify(&Value::Number(*n), &call.this),
        _ => return Ok(Value::Undefined),
    };
    Ok(obj.get_own(&key))
}
