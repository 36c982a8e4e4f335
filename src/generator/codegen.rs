/// Builds the holder/model class specs and the optional dispatch and
/// validation methods from a generation request.
use crate::element::Element;
use crate::error::GenerateError;

use super::ast::{ClassSpec, FieldSpec, MethodSpec, Stmt, Visibility};
use super::{GenerationRequest, MethodKind};

const ROOT_VIEW_TYPE: &str = "android.view.View";
const ROOT_VIEW_NAME: &str = "view";
const MODEL_FIELD_NAME: &str = "model";
const HOLDER_FIELD_NAME: &str = "holder";
const ON_CLICK_INTERFACE: &str = "android.view.View.OnClickListener";
const ON_LONG_CLICK_INTERFACE: &str = "android.view.View.OnLongClickListener";
const STRING_RESOURCE_PREFIX: &str = "@string/";

pub struct Codegen<'a> {
    request: &'a GenerationRequest,
}

impl<'a> Codegen<'a> {
    pub fn new(request: &'a GenerationRequest) -> Self {
        Codegen { request }
    }

    fn used(&self) -> impl Iterator<Item = &'a Element> {
        self.request.elements.iter().filter(|e| e.used)
    }

    fn field_name(&self, element: &Element) -> String {
        element.field_name(&self.request.prefix)
    }

    fn provenance(&self, class_name: &str) -> String {
        format!("{} create by {}", class_name, self.request.layout_name)
    }

    pub fn holder_class(&self) -> ClassSpec {
        let holder_name = self.request.holder_name();
        let model_name = self.request.model_name();

        let mut fields = vec![
            FieldSpec {
                visibility: Visibility::Public,
                type_name: ROOT_VIEW_TYPE.to_string(),
                name: ROOT_VIEW_NAME.to_string(),
            },
            FieldSpec {
                visibility: Visibility::Public,
                type_name: model_name.clone(),
                name: MODEL_FIELD_NAME.to_string(),
            },
        ];
        for element in self.used() {
            fields.push(FieldSpec {
                visibility: Visibility::Public,
                type_name: element.type_name.clone(),
                name: self.field_name(element),
            });
        }

        let activity_ctor = MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: None,
            name: holder_name.clone(),
            params: vec![("android.app.Activity".to_string(), "activity".to_string())],
            body: vec![Stmt::Line(
                "this(activity.getWindow().getDecorView());".to_string(),
            )],
        };

        let mut assigns = vec![
            Stmt::Line(format!("this.{} = {};", ROOT_VIEW_NAME, ROOT_VIEW_NAME)),
            Stmt::Line(format!(
                "this.{} = new {}(this);",
                MODEL_FIELD_NAME, model_name
            )),
        ];
        for element in self.used() {
            let field = self.field_name(element);
            assigns.push(Stmt::Line(format!(
                "this.{} = ({}) {}.findViewById({});",
                field,
                element.type_name,
                ROOT_VIEW_NAME,
                element.full_id()
            )));
            if self.request.auto_implements {
                if element.clickable {
                    assigns.push(Stmt::Line(format!(
                        "this.{}.setOnClickListener(this);",
                        field
                    )));
                }
                if element.long_clickable {
                    assigns.push(Stmt::Line(format!(
                        "this.{}.setOnLongClickListener(this);",
                        field
                    )));
                }
            }
        }

        let view_ctor = MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: None,
            name: holder_name.clone(),
            params: vec![(ROOT_VIEW_TYPE.to_string(), ROOT_VIEW_NAME.to_string())],
            body: assigns,
        };

        let check_changed = MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: Some("void".to_string()),
            name: "checkChanged".to_string(),
            params: vec![],
            body: vec![Stmt::Line(format!(
                "this.{}.bind();",
                MODEL_FIELD_NAME
            ))],
        };

        let mut interfaces = Vec::new();
        if self.request.auto_implements {
            if self.used().any(|e| e.clickable) {
                interfaces.push(ON_CLICK_INTERFACE.to_string());
            }
            if self.used().any(|e| e.long_clickable) {
                interfaces.push(ON_LONG_CLICK_INTERFACE.to_string());
            }
        }

        ClassSpec {
            visibility: Visibility::Private,
            name: holder_name.clone(),
            interfaces,
            comment: Some(self.provenance(&holder_name)),
            fields,
            constructors: vec![activity_ctor, view_ctor],
            methods: vec![check_changed],
        }
    }

    pub fn model_class(&self) -> ClassSpec {
        let holder_name = self.request.holder_name();
        let model_name = self.request.model_name();

        let mut fields = vec![FieldSpec {
            visibility: Visibility::Public,
            type_name: holder_name.clone(),
            name: HOLDER_FIELD_NAME.to_string(),
        }];
        for element in self.used() {
            fields.push(FieldSpec {
                visibility: Visibility::Public,
                type_name: element.bind_model_type(),
                name: self.field_name(element),
            });
        }

        let mut ctor_body = vec![Stmt::Line(format!(
            "this.{} = {};",
            HOLDER_FIELD_NAME, HOLDER_FIELD_NAME
        ))];
        let mut bind_body = Vec::new();
        for element in self.used() {
            let field = self.field_name(element);
            ctor_body.push(Stmt::Line(format!(
                "this.{} = new {}({}.{});",
                field,
                element.bind_model_type(),
                HOLDER_FIELD_NAME,
                field
            )));
            bind_body.push(Stmt::Line(format!(
                "this.{}.bindData({}.{});",
                field, HOLDER_FIELD_NAME, field
            )));
        }

        let ctor = MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: None,
            name: model_name.clone(),
            params: vec![(holder_name, HOLDER_FIELD_NAME.to_string())],
            body: ctor_body,
        };

        let bind = MethodSpec {
            annotations: vec![],
            visibility: Visibility::PackagePrivate,
            return_type: Some("void".to_string()),
            name: "bind".to_string(),
            params: vec![],
            body: bind_body,
        };

        ClassSpec {
            visibility: Visibility::Public,
            name: model_name.clone(),
            interfaces: vec![],
            comment: Some(self.provenance(&model_name)),
            fields,
            constructors: vec![ctor],
            methods: vec![bind],
        }
    }

    pub fn optional_method(
        &self,
        kind: MethodKind,
    ) -> Result<Option<MethodSpec>, GenerateError> {
        match kind {
            MethodKind::OnClick => Ok(self.on_click_method()),
            MethodKind::OnLongClick => Ok(self.on_long_click_method()),
            MethodKind::Submit => self.submit_method(),
        }
    }

    fn on_click_method(&self) -> Option<MethodSpec> {
        let cases: Vec<String> = self
            .used()
            .filter(|e| e.clickable)
            .map(|e| e.full_id())
            .collect();
        if cases.is_empty() {
            return None;
        }

        Some(MethodSpec {
            annotations: vec!["@Override".to_string()],
            visibility: Visibility::Public,
            return_type: Some("void".to_string()),
            name: MethodKind::OnClick.method_name().to_string(),
            params: vec![(ROOT_VIEW_TYPE.to_string(), "v".to_string())],
            body: vec![Stmt::Switch {
                scrutinee: "v.getId()".to_string(),
                cases,
                default_arm: true,
            }],
        })
    }

    fn on_long_click_method(&self) -> Option<MethodSpec> {
        let cases: Vec<String> = self
            .used()
            .filter(|e| e.long_clickable)
            .map(|e| e.full_id())
            .collect();
        if cases.is_empty() {
            return None;
        }

        Some(MethodSpec {
            annotations: vec!["@Override".to_string()],
            visibility: Visibility::Public,
            return_type: Some("boolean".to_string()),
            name: MethodKind::OnLongClick.method_name().to_string(),
            params: vec![(ROOT_VIEW_TYPE.to_string(), "v".to_string())],
            body: vec![
                Stmt::Switch {
                    scrutinee: "v.getId()".to_string(),
                    cases,
                    default_arm: true,
                },
                Stmt::Line("return false;".to_string()),
            ],
        })
    }

    fn submit_method(&self) -> Result<Option<MethodSpec>, GenerateError> {
        let mut checks = Vec::new();

        for element in self.used().filter(|e| e.edit_text) {
            let hint = element.hint.as_deref().map(str::trim);
            let hint = match hint {
                None => {
                    if self.request.strict_hints {
                        return Err(GenerateError::EmptyHintForValidatedField(
                            element.id.clone(),
                        ));
                    }
                    continue;
                }
                Some(h) => {
                    if h.is_empty() && self.request.strict_hints {
                        return Err(GenerateError::EmptyHintForValidatedField(
                            element.id.clone(),
                        ));
                    }
                    h
                }
            };

            let local = local_name(&element.id);
            let message = if let Some(resource) = hint.strip_prefix(STRING_RESOURCE_PREFIX) {
                format!("R.string.{}", resource)
            } else if !hint.is_empty() {
                format!("\"{}\"", hint)
            } else {
                format!("\"{} must not be empty\"", local)
            };

            checks.push(Stmt::Line(format!(
                "String {} = {}.getText().toString().trim();",
                local,
                self.field_name(element)
            )));
            checks.push(Stmt::If {
                condition: format!("{}.isEmpty()", local),
                then_body: vec![
                    Stmt::Line(format!(
                        "android.widget.Toast.makeText({}.getContext(), {}, \
                         android.widget.Toast.LENGTH_SHORT).show();",
                        ROOT_VIEW_NAME, message
                    )),
                    Stmt::Line("return;".to_string()),
                ],
            });
            checks.push(Stmt::Blank);
        }

        if checks.is_empty() {
            return Ok(None);
        }

        let mut body = vec![Stmt::Comment("validate".to_string())];
        body.append(&mut checks);
        body.push(Stmt::Comment("TODO validate success, do something".to_string()));

        Ok(Some(MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: Some("void".to_string()),
            name: MethodKind::Submit.method_name().to_string(),
            params: vec![],
            body,
        }))
    }
}

/// `user_name_input` -> `input`; ids without `_` get a `String` suffix so
/// the local never shadows the field
fn local_name(id: &str) -> String {
    let name = match id.rfind('_') {
        Some(i) => &id[i + 1..],
        None => id,
    };
    if name == id {
        format!("{}String", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_takes_last_segment() {
        assert_eq!(local_name("user_name_input"), "input");
        assert_eq!(local_name("password"), "passwordString");
    }
}
