//! Helper registry and the call contract helpers see (spec §3.4, §4.3.6).
//!
//! Modeled on the teacher's own `HelperRegistry`-shaped lookup tables
//! (a flat `HashMap` with caller overrides merged on top of built-ins)
//! rather than anything trait-object-heavy: helpers here are plain
//! `Rc<dyn Fn>` callbacks, which keeps block helpers and value helpers
//! under the same registration mechanism.

pub mod block;
pub mod value;

use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::context::DataFrame;
use crate::interpreter::error::RenderError;
use crate::interpreter::value::Value;

/// Which branch of a block a helper is asking to render.
pub enum Branch {
    Main,
    Inverse,
}

/// Everything a helper callback receives for one invocation (spec
/// §4.3.6). `render` closes over the calling `Interpreter` and the
/// AST's `program`/`inverse`, so block helpers can invoke either branch
/// without the registry needing to know about `Program` at all.
pub struct HelperCall<'a> {
    pub params: Vec<Value>,
    pub hash: Vec<(String, Value)>,
    pub this: Value,
    pub data: DataFrame,
    /// `true` if the invocation site supplied a block (program/inverse),
    /// i.e. this is a `Block` statement rather than a bare `Mustache`.
    pub has_block: bool,
    render: &'a mut dyn FnMut(Branch, Value, Option<DataFrame>) -> Result<String, RenderError>,
}

impl<'a> HelperCall<'a> {
    pub fn new(
        params: Vec<Value>,
        hash: Vec<(String, Value)>,
        this: Value,
        data: DataFrame,
        has_block: bool,
        render: &'a mut dyn FnMut(Branch, Value, Option<DataFrame>) -> Result<String, RenderError>,
    ) -> Self {
        HelperCall {
            params,
            hash,
            this,
            data,
            has_block,
            render,
        }
    }

    pub fn arg(&self, i: usize) -> Value {
        self.params.get(i).cloned().unwrap_or(Value::Undefined)
    }

    pub fn hash_get(&self, key: &str) -> Option<&Value> {
        self.hash.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Render the main (`{{#fn}}`) branch under `ctx`, with an optional
    /// overriding data frame (spec §4.3.6: `options.fn(ctx, opts?)`).
    pub fn render_main(&mut self, ctx: Value, data: Option<DataFrame>) -> Result<String, RenderError> {
        (self.render)(Branch::Main, ctx, data)
    }

    /// Render the `{{else}}` branch under `ctx` (spec §4.3.6:
    /// `options.inverse(ctx, opts?)`).
    pub fn render_inverse(&mut self, ctx: Value, data: Option<DataFrame>) -> Result<String, RenderError> {
        (self.render)(Branch::Inverse, ctx, data)
    }
}

pub type HelperFn = Rc<dyn Fn(&mut HelperCall) -> Result<Value, RenderError>>;

/// Name → callable map with caller-supplied helpers taking precedence
/// over built-ins (spec §3.4: "caller-provided helpers override
/// built-ins").
#[derive(Clone)]
pub struct HelperRegistry {
    map: HashMap<String, HelperFn>,
}

impl HelperRegistry {
    /// The built-in registry: `if, unless, with, each` (block helpers,
    /// §4.3.4) plus `eq, ne, lt, lte, gt, gte, and, or, not, lookup`
    /// (value helpers, §6/§4.4).
    pub fn with_builtins() -> Self {
        let mut map: HashMap<String, HelperFn> = HashMap::new();
        block::register(&mut map);
        value::register(&mut map);
        HelperRegistry { map }
    }

    /// Merge `overrides` on top of the built-ins, overrides winning on
    /// key collision.
    pub fn merged(overrides: &HashMap<String, HelperFn>) -> Self {
        let mut registry = HelperRegistry::with_builtins();
        for (k, v) in overrides {
            registry.map.insert(k.clone(), v.clone());
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, f: HelperFn) {
        self.map.insert(name.into(), f);
    }
}

impl Default for HelperRegistry {
    fn default() -> Self {
        HelperRegistry::with_builtins()
    }
}
