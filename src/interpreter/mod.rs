//! Phase 3: Interpreter — tree-walking evaluation of a `Program` against
//! a runtime context (spec §4.3).

pub mod context;
pub mod error;
pub mod escape;
pub mod value;

pub use error::{RenderError, RenderErrorKind};
pub use value::Value;

use std::collections::HashMap;

use crate::ast::{
    Block, Expression, Hash, Mustache, PathExpression, Program, Statement, SubExpression,
};
use crate::helpers::{Branch, HelperCall, HelperFn, HelperRegistry};

use context::{ContextStack, DataFrame, DataStack};

/// Options accepted by `Interpreter::evaluate` (spec §4.3.1, §6:
/// `RuntimeOptions = { helpers?, initialData? }`).
#[derive(Default)]
pub struct RuntimeOptions {
    pub helpers: HashMap<String, HelperFn>,
    pub initial_data: DataFrame,
}

/// A reusable entry point over the built-in + caller-supplied helper
/// registry. `evaluate` initializes fresh stacks on every call, per
/// spec §4.3.1's "must not leak state between evaluations."
pub struct Interpreter {
    helpers: HelperRegistry,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            helpers: HelperRegistry::with_builtins(),
        }
    }

    pub fn with_options(options: &RuntimeOptions) -> Self {
        Interpreter {
            helpers: HelperRegistry::merged(&options.helpers),
        }
    }

    pub fn evaluate(&self, program: &Program, root: Value) -> Result<String, RenderError> {
        self.evaluate_with(program, root, DataFrame::new())
    }

    pub fn evaluate_with(
        &self,
        program: &Program,
        root: Value,
        initial_data: DataFrame,
    ) -> Result<String, RenderError> {
        let mut eval = Evaluation {
            helpers: &self.helpers,
            context: ContextStack::new(root.clone()),
            data: DataStack::new(root, initial_data),
        };
        eval.eval_program(program)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

/// What a resolved path turned out to be: a concrete value, or (in the
/// ambiguous bare-identifier case) the name of a helper to invoke
/// (spec §4.3.3 point 4).
enum Resolved {
    Value(Value),
    Helper(String),
}

struct Evaluation<'a> {
    helpers: &'a HelperRegistry,
    context: ContextStack,
    data: DataStack,
}

impl<'a> Evaluation<'a> {
    fn eval_program(&mut self, program: &Program) -> Result<String, RenderError> {
        let mut out = String::new();
        for stmt in &program.body {
            out.push_str(&self.eval_statement(stmt)?);
        }
        Ok(out)
    }

    fn eval_statement(&mut self, stmt: &Statement) -> Result<String, RenderError> {
        match stmt {
            Statement::Content(c) => Ok(c.value.clone()),
            Statement::Comment(_) => Ok(String::new()),
            Statement::Mustache(m) => self.eval_mustache(m),
            Statement::Block(b) => self.eval_block(b),
        }
    }

    // ---- mustache / block dispatch (spec §4.3.2) ----

    fn eval_mustache(&mut self, m: &Mustache) -> Result<String, RenderError> {
        let this = self.context.top().clone();
        let value = if m.params.is_empty() && m.hash.is_empty() {
            match self.resolve_path(&m.path) {
                Resolved::Value(v) => v,
                Resolved::Helper(name) => self.invoke_plain_helper(&name, Vec::new(), Vec::new(), this.clone())?,
            }
        } else {
            let name = helper_name(&m.path);
            if !self.helpers.contains(&name) {
                return Err(RenderError::missing_helper(&name));
            }
            let params = self.eval_params(&m.params)?;
            let hash = self.eval_hash(&m.hash)?;
            self.invoke_plain_helper(&name, params, hash, this.clone())?
        };
        Ok(finish(value, &this, m.escaped))
    }

    fn eval_block(&mut self, b: &Block) -> Result<String, RenderError> {
        let name = helper_name(&b.path);
        let helper = self
            .helpers
            .get(&name)
            .cloned()
            .ok_or_else(|| RenderError::missing_helper(&name))?;
        let params = self.eval_params(&b.params)?;
        let hash = self.eval_hash(&b.hash)?;
        let this = self.context.top().clone();
        let data = self.data.top().clone();

        let program = &b.program;
        let inverse = b.inverse.as_ref();
        let value = {
            let mut render = |branch: Branch, ctx: Value, data_override: Option<DataFrame>| -> Result<String, RenderError> {
                let target = match branch {
                    Branch::Main => Some(program),
                    Branch::Inverse => inverse,
                };
                match target {
                    None => Ok(String::new()),
                    Some(p) => {
                        self.context.push(ctx);
                        self.data.push(data_override.unwrap_or_else(|| data.clone()));
                        let result = self.eval_program(p);
                        self.data.pop();
                        self.context.pop();
                        result
                    }
                }
            };
            let mut call = HelperCall::new(params, hash, this.clone(), data.clone(), true, &mut render);
            helper(&mut call)?
        };
        Ok(finish(value, &this, true))
    }

    /// Invoke a helper with no block attached — the "ambiguous mustache
    /// resolved to a helper" and "mustache with explicit params" cases
    /// (spec §4.3.2). Calling `options.fn`/`options.inverse` here is a
    /// caller error, since there is no block to render.
    fn invoke_plain_helper(
        &mut self,
        name: &str,
        params: Vec<Value>,
        hash: Vec<(String, Value)>,
        this: Value,
    ) -> Result<Value, RenderError> {
        let helper = self
            .helpers
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::missing_helper(name))?;
        let data = self.data.top().clone();
        let name_owned = name.to_string();
        let mut render = move |_branch: Branch, _ctx: Value, _data: Option<DataFrame>| -> Result<String, RenderError> {
            Err(RenderError::helper(
                &name_owned,
                format!("'{{{{#{name_owned}}}}}' requires a block"),
            ))
        };
        let mut call = HelperCall::new(params, hash, this, data, false, &mut render);
        helper(&mut call)
    }

    // ---- path resolution (spec §4.3.3) ----

    fn resolve_path(&self, path: &PathExpression) -> Resolved {
        if path.data {
            // The parser guarantees `@` is always followed by an
            // identifier, so `parts` is never empty here.
            let mut parts = path.parts.iter();
            let mut value = self.data.get(parts.next().expect("@ path has a name"));
            for part in parts {
                value = value.get_own(part);
            }
            return Resolved::Value(self.call_leaf(value));
        }

        let start = if path.depth > 0 {
            self.context.at_depth(path.depth).clone()
        } else if path.original.starts_with("this") || path.original.starts_with('.') {
            self.context.top().clone()
        } else if path.is_simple_name() {
            if self.helpers.contains(&path.parts[0]) {
                return Resolved::Helper(path.parts[0].clone());
            }
            self.context.top().clone()
        } else {
            self.context.top().clone()
        };

        let mut value = start;
        for part in &path.parts {
            value = value.get_own(part);
        }
        Resolved::Value(self.call_leaf(value))
    }

    /// Call-through-leaf rule: if the resolved value is itself callable,
    /// invoke it bound to the current `this` (spec §4.3.3 point 5).
    fn call_leaf(&self, value: Value) -> Value {
        let this = self.context.top().clone();
        value.call_bound(&this)
    }

    // ---- expressions (spec §4.3.5) ----

    fn eval_expression(&mut self, expr: &Expression) -> Result<Value, RenderError> {
        match expr {
            Expression::Path(p) => match self.resolve_path(p) {
                Resolved::Value(v) => Ok(v),
                Resolved::Helper(name) => {
                    let this = self.context.top().clone();
                    self.invoke_plain_helper(&name, Vec::new(), Vec::new(), this)
                }
            },
            Expression::String(s) => Ok(Value::string(s.value.clone())),
            Expression::Number(n) => Ok(Value::Number(n.value)),
            Expression::Boolean(b) => Ok(Value::Bool(b.value)),
            Expression::Null(_) => Ok(Value::Null),
            Expression::Undefined(_) => Ok(Value::Undefined),
            Expression::Sub(s) => self.eval_sub_expression(s),
        }
    }

    fn eval_sub_expression(&mut self, s: &SubExpression) -> Result<Value, RenderError> {
        let name = helper_name(&s.path);
        let helper = self
            .helpers
            .get(&name)
            .cloned()
            .ok_or_else(|| RenderError::unknown_helper(&name))?;
        let params = self.eval_params(&s.params)?;
        let hash = self.eval_hash(&s.hash)?;
        let this = self.context.top().clone();
        let data = self.data.top().clone();
        let name_owned = name.clone();
        let mut render = move |_branch: Branch, _ctx: Value, _data: Option<DataFrame>| -> Result<String, RenderError> {
            Err(RenderError::helper(
                &name_owned,
                format!("sub-expression helper '{name_owned}' has no block"),
            ))
        };
        let mut call = HelperCall::new(params, hash, this, data, false, &mut render);
        helper(&mut call)
    }

    fn eval_params(&mut self, params: &[Expression]) -> Result<Vec<Value>, RenderError> {
        params.iter().map(|e| self.eval_expression(e)).collect()
    }

    fn eval_hash(&mut self, hash: &Hash) -> Result<Vec<(String, Value)>, RenderError> {
        hash.iter()
            .map(|(k, e)| Ok((k.clone(), self.eval_expression(e)?)))
            .collect()
    }
}

/// A helper's (or plain path's) name for registry lookup: the single
/// segment for a simple identifier, else the path as written — a
/// dotted/scoped path is never a valid helper callee, so falling back
/// to `original` there just yields a "missing helper" error rather than
/// a panic.
fn helper_name(path: &PathExpression) -> String {
    if path.parts.len() == 1 {
        path.parts[0].clone()
    } else {
        path.original.clone()
    }
}

/// Coerce and escape a resolved value the way a plain mustache or a
/// helper's return value is rendered (spec §4.3.2, §4.3.6).
fn finish(value: Value, this: &Value, escaped: bool) -> String {
    let text = value::stringify(&value, this);
    if escaped && !value::is_safe(&value) {
        escape::escape(&text)
    } else {
        text
    }
}
