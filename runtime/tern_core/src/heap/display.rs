//! String forms of values.
//!
//! `to_string` and `print` use the plain form; containers always render
//! their elements in repr form, so strings inside a list are quoted.

use std::fmt::Write;

use super::Heap;
use crate::value::{ObjRef, Object, Value};

/// Render a number the way scripts see it: integral values without a
/// fractional part, non-finite values as `nan`, `inf` and `-inf`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == n.trunc() && n.abs() < 1e15 {
        // -0.0 prints as 0
        return format!("{}", n + 0.0);
    }
    format!("{n}")
}

impl Heap {
    /// String form of `value`. With `repr`, strings are quoted and escaped.
    pub fn to_display(&self, value: Value, repr: bool) -> String {
        let mut out = String::new();
        let mut visiting = Vec::new();
        self.write_value(&mut out, value, repr, &mut visiting);
        out
    }

    fn write_value(&self, out: &mut String, value: Value, repr: bool, visiting: &mut Vec<ObjRef>) {
        let r = match value {
            Value::Null => return out.push_str("null"),
            Value::Bool(b) => return out.push_str(if b { "true" } else { "false" }),
            Value::Number(n) => return out.push_str(&format_number(n)),
            Value::Object(r) => r,
        };

        match self.get(r) {
            Object::String(s) if repr => write_quoted(out, &s.to_str_lossy()),
            Object::String(s) => out.push_str(&s.to_str_lossy()),
            Object::List(list) => {
                if visiting.contains(&r) {
                    return out.push_str("[...]");
                }
                visiting.push(r);
                out.push('[');
                for (i, &element) in list.elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, element, true, visiting);
                }
                out.push(']');
                visiting.pop();
            }
            Object::Map(map) => {
                if visiting.contains(&r) {
                    return out.push_str("{...}");
                }
                visiting.push(r);
                out.push('{');
                for (i, (key, entry)) in map.entries().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_value(out, key, true, visiting);
                    out.push_str(": ");
                    self.write_value(out, entry, true, visiting);
                }
                out.push('}');
                visiting.pop();
            }
            Object::Range(range) => {
                let _ = write!(
                    out,
                    "[Range:{}..{}]",
                    format_number(range.from),
                    format_number(range.to)
                );
            }
            Object::Function(function) => {
                let _ = write!(out, "[Func:{}]", function.name);
            }
            Object::Script(script) => {
                let _ = write!(out, "[Module:{}]", script.name);
            }
            Object::Fiber(_) => out.push_str("[Fiber]"),
            Object::User(user) => {
                let _ = write!(out, "[UserObj:{}]", user.type_name);
            }
        }
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}
