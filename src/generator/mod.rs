/// ViewHolder/ViewModel source generation
///
/// `generate` is a pure function over a `GenerationRequest`: no I/O, no
/// shared state, byte-identical output for identical requests. Splicing the
/// result into a target file is the caller's job (see `crate::inject`).
pub mod ast;
mod codegen;

use std::collections::BTreeMap;

use crate::element::Element;
use crate::error::GenerateError;
use ast::{render_class, render_method};
use codegen::Codegen;

pub const HOLDER_SUFFIX: &str = "ViewHolder";
pub const MODEL_SUFFIX: &str = "ViewModel";
pub const DEFAULT_PREFIX: &str = "m";

/// Everything one generation call consumes
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Base type name, e.g. `LoginActivity`
    pub base_name: String,
    /// Layout file name, for the provenance comment
    pub layout_name: String,
    /// Field prefix applied by the `prefixed` naming policy
    pub prefix: String,
    pub elements: Vec<Element>,
    /// Wire listener registration and generate the optional methods
    pub auto_implements: bool,
    /// Fail on validated EditTexts without a usable hint
    pub strict_hints: bool,
    /// Optional methods that already have a body in the target
    pub existing: ExistingMembers,
}

impl GenerationRequest {
    pub fn holder_name(&self) -> String {
        format!("{}{}", self.base_name, HOLDER_SUFFIX)
    }

    pub fn model_name(&self) -> String {
        format!("{}{}", self.base_name, MODEL_SUFFIX)
    }
}

/// Which optional methods the target already defines with a non-empty body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistingMembers {
    pub on_click: bool,
    pub on_long_click: bool,
    pub submit: bool,
}

impl ExistingMembers {
    pub fn has(&self, kind: MethodKind) -> bool {
        match kind {
            MethodKind::OnClick => self.on_click,
            MethodKind::OnLongClick => self.on_long_click,
            MethodKind::Submit => self.submit,
        }
    }

    pub fn set(&mut self, kind: MethodKind) {
        match kind {
            MethodKind::OnClick => self.on_click = true,
            MethodKind::OnLongClick => self.on_long_click = true,
            MethodKind::Submit => self.submit = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MethodKind {
    OnClick,
    OnLongClick,
    Submit,
}

impl MethodKind {
    pub const ALL: [MethodKind; 3] = [
        MethodKind::OnClick,
        MethodKind::OnLongClick,
        MethodKind::Submit,
    ];

    pub fn method_name(&self) -> &'static str {
        match self {
            MethodKind::OnClick => "onClick",
            MethodKind::OnLongClick => "onLongClick",
            MethodKind::Submit => "submit",
        }
    }
}

/// One generated class, tagged with its type name
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBlock {
    pub name: String,
    pub source: String,
}

/// One optional method slot. `source` is `Some` iff the method was
/// (re)emitted; `already_present` reports that an existing member with a
/// body suppressed regeneration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalMethod {
    pub kind: MethodKind,
    pub source: Option<String>,
    pub already_present: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSource {
    /// Holder class text, without the optional methods (see `assemble_holder`)
    pub holder: ClassBlock,
    pub model: ClassBlock,
    pub methods: Vec<OptionalMethod>,
}

impl GeneratedSource {
    pub fn method(&self, kind: MethodKind) -> Option<&OptionalMethod> {
        self.methods.iter().find(|m| m.kind == kind)
    }
}

/// Generate the holder/model pair and optional methods for one request
pub fn generate(request: &GenerationRequest) -> Result<GeneratedSource, GenerateError> {
    validate_field_names(request)?;

    let codegen = Codegen::new(request);

    // Optional methods are resolved first so a strict-hint failure surfaces
    // before any class text exists.
    let mut methods = Vec::new();
    for kind in MethodKind::ALL {
        let spec = if request.auto_implements {
            codegen.optional_method(kind)?
        } else {
            None
        };
        let already_present = request.existing.has(kind);
        match (spec, already_present) {
            (Some(spec), false) => methods.push(OptionalMethod {
                kind,
                source: Some(render_method(&spec, 2)),
                already_present: false,
            }),
            (_, true) => methods.push(OptionalMethod {
                kind,
                source: None,
                already_present: true,
            }),
            (None, false) => {}
        }
    }

    Ok(GeneratedSource {
        holder: ClassBlock {
            name: request.holder_name(),
            source: render_class(&codegen.holder_class(), 1),
        },
        model: ClassBlock {
            name: request.model_name(),
            source: render_class(&codegen.model_class(), 1),
        },
        methods,
    })
}

/// Insert the emitted optional methods, and any preserved user-written
/// bodies, before the holder's closing brace. Preserved bodies always win
/// over regeneration, even when the current request no longer qualifies
/// for that method.
pub fn assemble_holder(
    source: &GeneratedSource,
    preserved: &BTreeMap<MethodKind, String>,
) -> String {
    let mut extras: Vec<String> = Vec::new();
    for kind in MethodKind::ALL {
        if let Some(old) = preserved.get(&kind) {
            extras.push(ensure_trailing_newline(old));
            continue;
        }
        if let Some(text) = source.method(kind).and_then(|m| m.source.clone()) {
            extras.push(text);
        }
    }

    if extras.is_empty() {
        return source.holder.source.clone();
    }

    let trimmed = source.holder.source.trim_end_matches('\n');
    let close_start = trimmed.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let (head, close) = trimmed.split_at(close_start);

    let mut out = String::from(head);
    for extra in extras {
        out.push('\n');
        out.push_str(&extra);
    }
    out.push_str(close);
    out.push('\n');
    out
}

fn ensure_trailing_newline(s: &str) -> String {
    if s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{}\n", s)
    }
}

/// Two used elements must never collapse into one field declaration
fn validate_field_names(request: &GenerationRequest) -> Result<(), GenerateError> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for element in request.elements.iter().filter(|e| e.used) {
        let name = element.field_name(&request.prefix);
        if let Some(first) = seen.get(&name) {
            return Err(GenerateError::InvalidFieldName {
                name,
                first: first.clone(),
                second: element.id.clone(),
            });
        }
        seen.insert(name, element.id.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::FieldNaming;

    fn request_with(elements: Vec<Element>) -> GenerationRequest {
        GenerationRequest {
            base_name: "Login".to_string(),
            layout_name: "login.xml".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            elements,
            auto_implements: true,
            strict_hints: false,
            existing: ExistingMembers::default(),
        }
    }

    fn button(id: &str) -> Element {
        let mut e = Element::new(id, "android.widget.Button");
        e.clickable = true;
        e
    }

    #[test]
    fn test_empty_request_emits_skeletons_only() {
        let source = generate(&request_with(vec![])).unwrap();
        assert!(source.methods.is_empty());
        assert!(source.holder.source.contains("public android.view.View view;"));
        assert!(source.holder.source.contains("public LoginViewModel model;"));
        assert!(!source.holder.source.contains("findViewById"));
        assert!(!source.model.source.contains("bindData"));
    }

    #[test]
    fn test_unused_elements_are_excluded() {
        let mut hidden = button("hidden_btn");
        hidden.used = false;
        let source = generate(&request_with(vec![hidden])).unwrap();
        assert!(!source.holder.source.contains("hidden"));
        assert!(source.methods.is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let request = request_with(vec![button("submit_btn")]);
        let first = generate(&request).unwrap();
        let second = generate(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_name_collision_is_rejected() {
        let mut raw = button("submitBtn");
        raw.naming = FieldNaming::Raw;
        let err = generate(&request_with(vec![button("submit_btn"), raw])).unwrap_err();
        assert_eq!(
            err,
            GenerateError::InvalidFieldName {
                name: "submitBtn".to_string(),
                first: "submit_btn".to_string(),
                second: "submitBtn".to_string(),
            }
        );
    }

    #[test]
    fn test_existing_body_suppresses_regeneration() {
        let mut request = request_with(vec![button("submit_btn")]);
        request.existing.on_click = true;

        let source = generate(&request).unwrap();
        let on_click = source.method(MethodKind::OnClick).unwrap();
        assert!(on_click.already_present);
        assert!(on_click.source.is_none());
    }

    #[test]
    fn test_existing_body_is_reported_even_without_qualifying_elements() {
        let mut request = request_with(vec![]);
        request.existing.submit = true;

        let source = generate(&request).unwrap();
        let submit = source.method(MethodKind::Submit).unwrap();
        assert!(submit.already_present);
    }

    #[test]
    fn test_assemble_holder_appends_methods_before_closing_brace() {
        let source = generate(&request_with(vec![button("submit_btn")])).unwrap();
        let assembled = assemble_holder(&source, &BTreeMap::new());

        assert!(assembled.contains("public void onClick(android.view.View v) {"));
        assert!(assembled.trim_end().ends_with('}'));
        // the dispatch sits inside the holder class
        let close = assembled.rfind("    }").unwrap();
        let on_click = assembled.find("onClick").unwrap();
        assert!(on_click < close);
    }

    #[test]
    fn test_assemble_holder_reattaches_preserved_bodies() {
        let mut request = request_with(vec![button("submit_btn")]);
        request.existing.on_click = true;
        let source = generate(&request).unwrap();

        let mut preserved = BTreeMap::new();
        preserved.insert(
            MethodKind::OnClick,
            "        public void onClick(android.view.View v) {\n\
             \x20           openDrawer();\n\
             \x20       }\n"
                .to_string(),
        );

        let assembled = assemble_holder(&source, &preserved);
        assert!(assembled.contains("openDrawer();"));
    }

    #[test]
    fn test_strict_hints_reject_missing_hint() {
        let mut input = Element::new("user_name_input", "android.widget.EditText");
        input.edit_text = true;
        let mut request = request_with(vec![input]);
        request.strict_hints = true;

        let err = generate(&request).unwrap_err();
        assert_eq!(
            err,
            GenerateError::EmptyHintForValidatedField("user_name_input".to_string())
        );
    }
}
