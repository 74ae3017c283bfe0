//! `ContextStack` and `DataStack` (spec §3.4).
//!
//! Both are append-only sequences of frames indexed from the top, as
//! spec §9's "Data/context stack duality" design note prescribes: block
//! helpers push a frame before invoking `fn` and pop after, and frames
//! are never shared across pushes.

use crate::interpreter::value::Value;

pub struct ContextStack {
    frames: Vec<Value>,
}

impl ContextStack {
    pub fn new(root: Value) -> Self {
        ContextStack { frames: vec![root] }
    }

    pub fn top(&self) -> &Value {
        self.frames.last().expect("context stack is never empty")
    }

    pub fn push(&mut self, value: Value) {
        self.frames.push(value);
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Frame `depth` positions below the top; out-of-range depths clamp
    /// to the root (spec §3.4: "depths beyond the stack clamp to the
    /// root").
    pub fn at_depth(&self, depth: usize) -> &Value {
        let last = self.frames.len() - 1;
        let idx = last.saturating_sub(depth);
        &self.frames[idx]
    }

    pub fn root(&self) -> &Value {
        &self.frames[0]
    }
}

/// A single data frame: `@index`/`@key`, `@first`, `@last`, plus
/// whatever a helper installs via `options.data`. `@root` is looked up
/// separately (it lives on the `DataStack`, installed once at render
/// start) rather than duplicated into every frame.
#[derive(Clone, Default)]
pub struct DataFrame {
    entries: Vec<(String, Value)>,
}

impl DataFrame {
    pub fn new() -> Self {
        DataFrame::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

pub struct DataStack {
    frames: Vec<DataFrame>,
    root: Value,
}

impl DataStack {
    /// `root` mirrors the render-time root context, visible as `@root`
    /// from every frame (spec §3.4).
    pub fn new(root: Value, initial: DataFrame) -> Self {
        DataStack {
            frames: vec![initial],
            root,
        }
    }

    pub fn top(&self) -> &DataFrame {
        self.frames.last().expect("data stack is never empty")
    }

    pub fn push(&mut self, frame: DataFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Look up a `@`-prefixed variable: `@root` is special-cased to the
    /// installed render-time root; everything else inherits downward
    /// from the nearest frame that set it (spec §3.4: "Data variables
    /// inherit downward unless explicitly overridden").
    pub fn get(&self, key: &str) -> Value {
        if key == "root" {
            return self.root.clone();
        }
        for frame in self.frames.iter().rev() {
            if let Some(v) = frame.get(key) {
                return v.clone();
            }
        }
        Value::Undefined
    }
}
