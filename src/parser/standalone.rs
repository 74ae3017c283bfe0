//! Standalone-whitespace trimming (spec §4.2.6, §9 "Standalone trimming").
//!
//! Implemented as a post-parse pass over each finished `Program.body`, as
//! the design notes prescribe: the "surrounded by newlines" criterion is
//! program-structural, so it can't be decided correctly during
//! tokenization. Each trigger tag (a block's opening delimiter, its
//! closing delimiter, a bare `{{else}}`, or a comment) is trimmed
//! against its own immediate neighbors rather than treating a whole
//! `Block` node as one opaque unit — the opening tag's "following"
//! sibling is the first statement *inside* the block, and the closing
//! tag's "preceding" sibling is the last statement inside it.

use crate::ast::{Block, Statement};

/// Trim standalone whitespace around every `Block`/`Comment` statement
/// directly inside `body`.
pub fn trim(body: &mut [Statement]) {
    let triggers: Vec<usize> = body
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, Statement::Block(_) | Statement::Comment(_)))
        .map(|(i, _)| i)
        .collect();
    for i in triggers {
        trim_at(body, i);
    }
}

/// Trim the boundary around an implicit `{{else}}` marker sitting
/// between a block's main program and its inverse. Called at parse
/// time, before the `{{^...}}` program/inverse swap, so `program`/
/// `inverse` here are always in lexical (not AST) order.
pub fn trim_else_boundary(program: &mut [Statement], inverse: &mut [Statement]) {
    let left_ok = match program.last() {
        None => true,
        Some(Statement::Content(c)) => trailing_ws_after_newline(&c.value).is_some(),
        Some(_) => false,
    };
    let right_ok = match inverse.first() {
        None => true,
        Some(Statement::Content(c)) => leading_ws_before_newline(&c.value).is_some(),
        Some(_) => false,
    };
    if !(left_ok && right_ok) {
        return;
    }
    if let Some(Statement::Content(c)) = program.last_mut() {
        if let Some(cut) = trailing_ws_after_newline(&c.value) {
            c.value.truncate(cut);
        }
    }
    if let Some(Statement::Content(c)) = inverse.first_mut() {
        if let Some(start) = leading_ws_before_newline(&c.value) {
            c.value = c.value[start..].to_string();
        }
    }
}

fn trim_at(body: &mut [Statement], i: usize) {
    match &body[i] {
        Statement::Comment(_) => trim_sibling_pair(body, i),
        Statement::Block(_) => {
            trim_open_boundary(body, i);
            trim_close_boundary(body, i);
        }
        _ => {}
    }
}

/// Comment case: the trigger itself has no interior, so both edges are
/// checked against its plain outer siblings.
fn trim_sibling_pair(body: &mut [Statement], i: usize) {
    let left_ok = if i == 0 {
        true
    } else {
        match &body[i - 1] {
            Statement::Content(c) => trailing_ws_after_newline(&c.value).is_some(),
            _ => false,
        }
    };
    let right_ok = if i + 1 >= body.len() {
        true
    } else {
        match &body[i + 1] {
            Statement::Content(c) => leading_ws_before_newline(&c.value).is_some(),
            _ => false,
        }
    };
    if !(left_ok && right_ok) {
        return;
    }
    if i > 0 {
        if let Statement::Content(c) = &mut body[i - 1] {
            if let Some(cut) = trailing_ws_after_newline(&c.value) {
                c.value.truncate(cut);
            }
        }
    }
    if i + 1 < body.len() {
        if let Statement::Content(c) = &mut body[i + 1] {
            if let Some(start) = leading_ws_before_newline(&c.value) {
                c.value = c.value[start..].to_string();
            }
        }
    }
}

/// The opening tag's boundary: outer content before the block vs. the
/// first statement of whichever branch renders immediately after the
/// opening delimiter.
fn trim_open_boundary(body: &mut [Statement], i: usize) {
    let outer_ok = if i == 0 {
        true
    } else {
        match &body[i - 1] {
            Statement::Content(c) => trailing_ws_after_newline(&c.value).is_some(),
            _ => false,
        }
    };
    let Statement::Block(b) = &body[i] else { return };
    let inner = first_branch(b);
    let inner_ok = match inner.first() {
        None => true,
        Some(Statement::Content(c)) => leading_ws_before_newline(&c.value).is_some(),
        Some(_) => false,
    };
    if !(outer_ok && inner_ok) {
        return;
    }
    if i > 0 {
        if let Statement::Content(c) = &mut body[i - 1] {
            if let Some(cut) = trailing_ws_after_newline(&c.value) {
                c.value.truncate(cut);
            }
        }
    }
    if let Statement::Block(b) = &mut body[i] {
        if let Some(Statement::Content(c)) = first_branch_mut(b).first_mut() {
            if let Some(start) = leading_ws_before_newline(&c.value) {
                c.value = c.value[start..].to_string();
            }
        }
    }
}

/// The closing tag's boundary: the last statement of whichever branch
/// renders immediately before the closing delimiter vs. outer content
/// after the block.
fn trim_close_boundary(body: &mut [Statement], i: usize) {
    let outer_ok = if i + 1 >= body.len() {
        true
    } else {
        match &body[i + 1] {
            Statement::Content(c) => leading_ws_before_newline(&c.value).is_some(),
            _ => false,
        }
    };
    let Statement::Block(b) = &body[i] else { return };
    let inner = last_branch(b);
    let inner_ok = match inner.last() {
        None => true,
        Some(Statement::Content(c)) => trailing_ws_after_newline(&c.value).is_some(),
        Some(_) => false,
    };
    if !(outer_ok && inner_ok) {
        return;
    }
    if let Statement::Block(b) = &mut body[i] {
        if let Some(Statement::Content(c)) = last_branch_mut(b).last_mut() {
            if let Some(cut) = trailing_ws_after_newline(&c.value) {
                c.value.truncate(cut);
            }
        }
    }
    if i + 1 < body.len() {
        if let Statement::Content(c) = &mut body[i + 1] {
            if let Some(start) = leading_ws_before_newline(&c.value) {
                c.value = c.value[start..].to_string();
            }
        }
    }
}

/// Which branch is lexically first, after the `{{^...}}` program/inverse
/// swap: an empty `program` with an `inverse` present means this was an
/// inverse-opened block whose only (or first) captured text lives in
/// `inverse`. This is exact for `{{#...}}` blocks (with or without
/// `{{else}}`) and for `{{^...}}` blocks with no `{{else}}`; a
/// `{{^...}}...{{else}}...{{/...}}` combination is rare enough that this
/// crate does not special-case it further (see DESIGN.md).
fn first_branch(b: &Block) -> &[Statement] {
    if b.program.body.is_empty() && b.inverse.is_some() {
        &b.inverse.as_ref().unwrap().body
    } else {
        &b.program.body
    }
}

fn first_branch_mut(b: &mut Block) -> &mut Vec<Statement> {
    if b.program.body.is_empty() && b.inverse.is_some() {
        &mut b.inverse.as_mut().unwrap().body
    } else {
        &mut b.program.body
    }
}

/// Which branch is lexically last: `inverse` if present (the `{{else}}`
/// branch always renders right before the close tag), else `program`.
fn last_branch(b: &Block) -> &[Statement] {
    if let Some(inv) = &b.inverse {
        &inv.body
    } else {
        &b.program.body
    }
}

fn last_branch_mut(b: &mut Block) -> &mut Vec<Statement> {
    if b.inverse.is_some() {
        &mut b.inverse.as_mut().unwrap().body
    } else {
        &mut b.program.body
    }
}

/// `s` ends with `\n[ \t]*`: returns the index right after that newline
/// (where the caller should truncate to drop the trailing run).
fn trailing_ws_after_newline(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = bytes.len();
    while i > 0 && (bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
        i -= 1;
    }
    if i > 0 && bytes[i - 1] == b'\n' {
        Some(i)
    } else {
        None
    }
}

/// `s` begins with `[ \t]*\n`: returns the index right after that
/// newline (where the remaining content starts).
fn leading_ws_before_newline(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'\n' {
        Some(i + 1)
    } else {
        None
    }
}
