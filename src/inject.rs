/// Splices generated classes into an existing Java source file.
///
/// The scan respects string/char literals and comments, so a `class`
/// keyword inside a comment or a brace inside a string never confuses the
/// structure walk. Replacing a stale holder/model pair and re-attaching
/// user-written method bodies is plain text surgery on byte spans.
use std::collections::BTreeMap;

use crate::generator::{ExistingMembers, MethodKind};

#[derive(Debug)]
pub struct Target {
    source: String,
    mask: Vec<bool>,
    body_start: usize,
    body_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

struct FoundMethod {
    text: String,
    has_body: bool,
}

impl Target {
    /// Scan a Java source file and locate the outermost class body
    pub fn parse(source: &str) -> Result<Target, String> {
        let mask = code_mask(source);

        let class_kw = find_word(source, &mask, "class", 0, source.len())
            .ok_or_else(|| "no class declaration found in target file".to_string())?;
        let open = next_code_byte(source, &mask, b'{', class_kw)
            .ok_or_else(|| "class declaration without a body".to_string())?;
        let close = matching_brace(source, &mask, open)
            .ok_or_else(|| "unbalanced braces in target file".to_string())?;

        Ok(Target {
            source: source.to_string(),
            mask,
            body_start: open + 1,
            body_end: close,
        })
    }

    /// Which optional methods the stale holder already defines with a
    /// non-empty body, and their full text for re-attachment
    pub fn existing_methods(
        &self,
        holder_name: &str,
    ) -> (ExistingMembers, BTreeMap<MethodKind, String>) {
        let mut existing = ExistingMembers::default();
        let mut preserved = BTreeMap::new();

        let span = match self.find_inner_class(holder_name) {
            Some(span) => span,
            None => return (existing, preserved),
        };

        for kind in MethodKind::ALL {
            if let Some(found) = self.find_method(span, kind.method_name()) {
                if found.has_body {
                    existing.set(kind);
                    preserved.insert(kind, found.text);
                }
            }
        }

        (existing, preserved)
    }

    /// Remove any stale holder/model pair and insert the regenerated one
    /// before the outermost class's closing brace
    pub fn splice(
        &self,
        holder_name: &str,
        model_name: &str,
        holder_text: &str,
        model_text: &str,
    ) -> Result<String, String> {
        let mut spans: Vec<Span> = [
            self.find_inner_class(holder_name),
            self.find_inner_class(model_name),
        ]
        .into_iter()
        .flatten()
        .collect();
        spans.sort_by_key(|s| s.start);

        let mut out = self.source.clone();
        for span in spans.iter().rev() {
            out.replace_range(span.start..span.end, "");
        }

        // re-scan: the removals shifted every offset after them
        let target = Target::parse(&out)?;
        let line_start = out[..target.body_end]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let insert_at = if out[line_start..target.body_end].trim().is_empty() {
            line_start
        } else {
            target.body_end
        };

        let mut block = String::from("\n");
        block.push_str(holder_text);
        block.push('\n');
        block.push_str(model_text);
        out.insert_str(insert_at, &block);

        Ok(out)
    }

    /// Span of an inner class declaration, from the start of its
    /// declaration line (plus one preceding blank line, so repeated
    /// splices stay byte-stable) through its closing brace and newline
    fn find_inner_class(&self, name: &str) -> Option<Span> {
        let bytes = self.source.as_bytes();
        let mut at = self.body_start;

        while let Some(kw) = find_word(&self.source, &self.mask, "class", at, self.body_end) {
            at = kw + 1;

            let mut j = kw + "class".len();
            j = skip_blanks(&self.source, &self.mask, j);
            let ident_end = read_identifier(&self.source, j);
            if &self.source[j..ident_end] != name {
                continue;
            }

            let open = next_code_byte(&self.source, &self.mask, b'{', ident_end)?;
            let close = matching_brace(&self.source, &self.mask, open)?;

            let mut start = self.source[..kw].rfind('\n').map(|i| i + 1).unwrap_or(0);
            if start > 0 {
                let prev_start = self.source[..start - 1]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                if self.source[prev_start..start].trim().is_empty() {
                    start = prev_start;
                }
            }

            let mut end = close + 1;
            if bytes.get(end) == Some(&b'\n') {
                end += 1;
            }

            return Some(Span { start, end });
        }

        None
    }

    /// Locate a method declaration (not a call) by name inside a class span
    fn find_method(&self, span: Span, name: &str) -> Option<FoundMethod> {
        let bytes = self.source.as_bytes();
        let mut at = span.start;

        while let Some(pos) = find_word(&self.source, &self.mask, name, at, span.end) {
            at = pos + 1;

            let mut j = skip_blanks(&self.source, &self.mask, pos + name.len());
            if bytes.get(j) != Some(&b'(') {
                continue;
            }
            let close_paren = matching_paren(&self.source, &self.mask, j)?;

            // declaration iff a body brace comes before any ';'
            j = close_paren + 1;
            let mut body_open = None;
            while j < span.end {
                if !self.mask[j] {
                    j += 1;
                    continue;
                }
                match bytes[j] {
                    b'{' => {
                        body_open = Some(j);
                        break;
                    }
                    b';' => break,
                    _ => j += 1,
                }
            }
            let body_open = match body_open {
                Some(open) => open,
                None => continue,
            };
            let body_close = matching_brace(&self.source, &self.mask, body_open)?;

            let has_body = (body_open + 1..body_close)
                .any(|i| self.mask[i] && !bytes[i].is_ascii_whitespace());

            // pull in the signature line and any annotation lines above it
            let mut line_start = self.source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
            while line_start > 0 {
                let prev_start = self.source[..line_start - 1]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                if self.source[prev_start..line_start].trim_start().starts_with('@') {
                    line_start = prev_start;
                } else {
                    break;
                }
            }

            let mut end = body_close + 1;
            if bytes.get(end) == Some(&b'\n') {
                end += 1;
            }

            return Some(FoundMethod {
                text: self.source[line_start..end].to_string(),
                has_body,
            });
        }

        None
    }
}

/// Byte-indexed map of which source positions are code, as opposed to
/// string/char literal or comment content
fn code_mask(source: &str) -> Vec<bool> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut mask = vec![true; len];
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if i + 1 < len && bytes[i + 1] == b'/' => {
                while i < len && bytes[i] != b'\n' {
                    mask[i] = false;
                    i += 1;
                }
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                mask[i] = false;
                mask[i + 1] = false;
                i += 2;
                while i < len {
                    if bytes[i] == b'*' && i + 1 < len && bytes[i + 1] == b'/' {
                        mask[i] = false;
                        mask[i + 1] = false;
                        i += 2;
                        break;
                    }
                    mask[i] = false;
                    i += 1;
                }
            }
            quote @ (b'"' | b'\'') => {
                mask[i] = false;
                i += 1;
                while i < len {
                    if bytes[i] == b'\\' && i + 1 < len {
                        mask[i] = false;
                        mask[i + 1] = false;
                        i += 2;
                        continue;
                    }
                    let done = bytes[i] == quote;
                    mask[i] = false;
                    i += 1;
                    if done {
                        break;
                    }
                }
            }
            _ => i += 1,
        }
    }

    mask
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Next occurrence of `word` in `[from, to)` that sits fully in code and on
/// identifier boundaries, and is not a member access (`.word`)
fn find_word(source: &str, mask: &[bool], word: &str, from: usize, to: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut at = from;

    while at + word.len() <= to {
        let offset = source[at..to].find(word)?;
        let start = at + offset;
        let end = start + word.len();
        at = start + 1;

        if !mask[start..end].iter().all(|&m| m) {
            continue;
        }
        if start > 0 && (is_ident_byte(bytes[start - 1]) || bytes[start - 1] == b'.') {
            continue;
        }
        if end < bytes.len() && is_ident_byte(bytes[end]) {
            continue;
        }
        return Some(start);
    }

    None
}

fn next_code_byte(source: &str, mask: &[bool], wanted: u8, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    (from..bytes.len()).find(|&i| mask[i] && bytes[i] == wanted)
}

/// Advance past whitespace and non-code (comment) bytes
fn skip_blanks(source: &str, mask: &[bool], mut i: usize) -> usize {
    let bytes = source.as_bytes();
    while i < bytes.len() && (!mask[i] || bytes[i].is_ascii_whitespace()) {
        i += 1;
    }
    i
}

fn read_identifier(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}

fn matching_brace(source: &str, mask: &[bool], open: usize) -> Option<usize> {
    matching_pair(source, mask, open, b'{', b'}')
}

fn matching_paren(source: &str, mask: &[bool], open: usize) -> Option<usize> {
    matching_pair(source, mask, open, b'(', b')')
}

fn matching_pair(source: &str, mask: &[bool], open: usize, left: u8, right: u8) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0i64;

    for i in open..bytes.len() {
        if !mask[i] {
            continue;
        }
        if bytes[i] == left {
            depth += 1;
        } else if bytes[i] == right {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            if depth < 0 {
                return None;
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = r#"package com.example.app;

public class LoginActivity {
    private int attempts;

    public void reset() {
        attempts = 0;
    }

    private class LoginViewHolder {
        // LoginViewHolder create by login.xml

        public android.view.View view;

        public void checkChanged() {
            this.model.bind();
        }

        @Override
        public void onClick(android.view.View v) {
            openDrawer();
        }

        public void submit() {
        }
    }

    public class LoginViewModel {
        // LoginViewModel create by login.xml

        public LoginViewHolder holder;
    }
}
"#;

    #[test]
    fn test_parse_requires_a_class() {
        assert!(Target::parse("// just a comment\n").is_err());
        assert!(Target::parse(TARGET).is_ok());
    }

    #[test]
    fn test_class_in_string_or_comment_is_ignored() {
        let source = "public class Holder {\n    // a class keyword in prose\n    String s = \"class Fake {\";\n}\n";
        let target = Target::parse(source).unwrap();
        assert!(target.find_inner_class("Fake").is_none());
    }

    #[test]
    fn test_existing_methods_detects_filled_bodies() {
        let target = Target::parse(TARGET).unwrap();
        let (existing, preserved) = target.existing_methods("LoginViewHolder");

        // onClick has a real body, submit's is empty, onLongClick is absent
        assert!(existing.on_click);
        assert!(!existing.submit);
        assert!(!existing.on_long_click);

        let text = preserved.get(&MethodKind::OnClick).unwrap();
        assert!(text.contains("@Override"));
        assert!(text.contains("openDrawer();"));
    }

    #[test]
    fn test_comment_only_body_counts_as_empty() {
        let source = "public class A {\n    private class AViewHolder {\n        public void submit() {\n            // later\n        }\n    }\n}\n";
        let target = Target::parse(source).unwrap();
        let (existing, _) = target.existing_methods("AViewHolder");
        assert!(!existing.submit);
    }

    #[test]
    fn test_method_call_is_not_a_declaration() {
        let source = "public class A {\n    private class AViewHolder {\n        public void run() {\n            submit();\n        }\n    }\n}\n";
        let target = Target::parse(source).unwrap();
        let (existing, _) = target.existing_methods("AViewHolder");
        assert!(!existing.submit);
    }

    #[test]
    fn test_splice_replaces_stale_pair() {
        let target = Target::parse(TARGET).unwrap();
        let holder = "    private class LoginViewHolder {\n        // regenerated\n    }\n";
        let model = "    public class LoginViewModel {\n        // regenerated\n    }\n";

        let out = target
            .splice("LoginViewHolder", "LoginViewModel", holder, model)
            .unwrap();

        assert_eq!(out.matches("class LoginViewHolder").count(), 1);
        assert_eq!(out.matches("class LoginViewModel").count(), 1);
        assert!(out.contains("// regenerated"));
        assert!(!out.contains("openDrawer();"));
        // untouched user code survives
        assert!(out.contains("private int attempts;"));
        assert!(out.contains("public void reset() {"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_splice_is_byte_stable() {
        let target = Target::parse(TARGET).unwrap();
        let holder = "    private class LoginViewHolder {\n    }\n";
        let model = "    public class LoginViewModel {\n    }\n";

        let once = target
            .splice("LoginViewHolder", "LoginViewModel", holder, model)
            .unwrap();
        let twice = Target::parse(&once)
            .unwrap()
            .splice("LoginViewHolder", "LoginViewModel", holder, model)
            .unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_splice_into_target_without_stale_pair() {
        let source = "public class Fresh {\n}\n";
        let target = Target::parse(source).unwrap();
        let holder = "    private class FreshViewHolder {\n    }\n";
        let model = "    public class FreshViewModel {\n    }\n";

        let out = target
            .splice("FreshViewHolder", "FreshViewModel", holder, model)
            .unwrap();
        assert_eq!(
            out,
            "public class Fresh {\n\n    private class FreshViewHolder {\n    }\n\n    public class FreshViewModel {\n    }\n}\n"
        );
    }
}
