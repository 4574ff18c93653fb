//! Purpose: Render decoded blueprints as indented JSON, optionally with ANSI colors.
//! Exports: `render_json`.
//! Role: Pure formatter for the `decode` command when stdout is a terminal.
//! Invariants: Without color the output equals `batch::render_document` (4-space indent).
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde_json::{Map, Value};

const INDENT: &str = "    ";

// Plain 8-color SGR codes; bright variants wash out on light themes.
const KEY: &str = "34";
const STRING: &str = "32";
const NUMBER: &str = "33";
const LITERAL: &str = "35";

pub fn render_json(value: &Value, use_color: bool) -> String {
    let mut out = String::new();
    Writer { out: &mut out, use_color }.value(value, 0);
    out
}

struct Writer<'a> {
    out: &'a mut String,
    use_color: bool,
}

impl Writer<'_> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.paint("null", LITERAL),
            Value::Bool(flag) => self.paint(if *flag { "true" } else { "false" }, LITERAL),
            Value::Number(num) => self.paint(&num.to_string(), NUMBER),
            Value::String(text) => self.paint(&quote(text), STRING),
            Value::Array(items) => self.array(items, depth),
            Value::Object(map) => self.object(map, depth),
        }
    }

    fn array(&mut self, items: &[Value], depth: usize) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        for (idx, item) in items.iter().enumerate() {
            self.separator(idx, depth + 1);
            self.value(item, depth + 1);
        }
        self.close(']', depth);
    }

    fn object(&mut self, map: &Map<String, Value>, depth: usize) {
        if map.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        for (idx, (key, item)) in map.iter().enumerate() {
            self.separator(idx, depth + 1);
            self.paint(&quote(key), KEY);
            self.out.push_str(": ");
            self.value(item, depth + 1);
        }
        self.close('}', depth);
    }

    fn separator(&mut self, idx: usize, depth: usize) {
        if idx > 0 {
            self.out.push(',');
        }
        self.newline(depth);
    }

    fn close(&mut self, bracket: char, depth: usize) {
        self.newline(depth);
        self.out.push(bracket);
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn paint(&mut self, text: &str, code: &str) {
        if self.use_color {
            self.out.push_str("\u{1b}[");
            self.out.push_str(code);
            self.out.push('m');
            self.out.push_str(text);
            self.out.push_str("\u{1b}[0m");
        } else {
            self.out.push_str(text);
        }
    }
}

fn quote(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}
