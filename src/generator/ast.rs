/// Typed model of the generated Java source
///
/// The holder/model classes and their optional methods are built as small
/// declarative values and rendered to text in one place, instead of
/// concatenating source fragments at every call site.

pub const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    PackagePrivate,
    Private,
}

impl Visibility {
    fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public ",
            Visibility::PackagePrivate => "",
            Visibility::Private => "private ",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassSpec {
    pub visibility: Visibility,
    pub name: String,
    pub interfaces: Vec<String>,
    /// Provenance line placed at the top of the class body
    pub comment: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub constructors: Vec<MethodSpec>,
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub visibility: Visibility,
    pub type_name: String,
    pub name: String,
}

/// A method, or a constructor when `return_type` is `None`
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub annotations: Vec<String>,
    pub visibility: Visibility,
    pub return_type: Option<String>,
    pub name: String,
    /// (type, name) pairs
    pub params: Vec<(String, String)>,
    pub body: Vec<Stmt>,
}

/// Statements at the granularity the generator needs
#[derive(Debug, Clone)]
pub enum Stmt {
    /// A raw terminated statement, e.g. `this.view = view;`
    Line(String),
    Blank,
    Comment(String),
    Switch {
        scrutinee: String,
        /// One empty, fall-out case per label
        cases: Vec<String>,
        default_arm: bool,
    },
    If {
        condition: String,
        then_body: Vec<Stmt>,
    },
}

/// Accumulates indented source text
pub struct Writer {
    out: String,
    level: usize,
}

impl Writer {
    pub fn new(level: usize) -> Self {
        Writer {
            out: String::new(),
            level,
        }
    }

    pub fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn push(&mut self) {
        self.level += 1;
    }

    pub fn pop(&mut self) {
        self.level -= 1;
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Render a class at the given indent level (1 = nested in a top-level class)
pub fn render_class(class: &ClassSpec, level: usize) -> String {
    let mut w = Writer::new(level);

    let mut decl = format!("{}class {}", class.visibility.keyword(), class.name);
    if !class.interfaces.is_empty() {
        decl.push_str(" implements ");
        decl.push_str(&class.interfaces.join(", "));
    }
    decl.push_str(" {");
    w.line(&decl);
    w.push();

    if let Some(comment) = &class.comment {
        w.line(&format!("// {}", comment));
        w.blank();
    }

    for field in &class.fields {
        w.line(&format!(
            "{}{} {};",
            field.visibility.keyword(),
            field.type_name,
            field.name
        ));
    }

    for member in class.constructors.iter().chain(class.methods.iter()) {
        w.blank();
        write_method(&mut w, member);
    }

    w.pop();
    w.line("}");
    w.finish()
}

/// Render a standalone method at the given indent level (2 = holder member)
pub fn render_method(method: &MethodSpec, level: usize) -> String {
    let mut w = Writer::new(level);
    write_method(&mut w, method);
    w.finish()
}

fn write_method(w: &mut Writer, method: &MethodSpec) {
    for annotation in &method.annotations {
        w.line(annotation);
    }

    let params: Vec<String> = method
        .params
        .iter()
        .map(|(ty, name)| format!("{} {}", ty, name))
        .collect();
    let ret = match &method.return_type {
        Some(ty) => format!("{} ", ty),
        None => String::new(),
    };
    w.line(&format!(
        "{}{}{}({}) {{",
        method.visibility.keyword(),
        ret,
        method.name,
        params.join(", ")
    ));

    w.push();
    write_body(w, &method.body);
    w.pop();
    w.line("}");
}

fn write_body(w: &mut Writer, body: &[Stmt]) {
    for stmt in body {
        match stmt {
            Stmt::Line(text) => w.line(text),
            Stmt::Blank => w.blank(),
            Stmt::Comment(text) => w.line(&format!("// {}", text)),
            Stmt::Switch {
                scrutinee,
                cases,
                default_arm,
            } => {
                w.line(&format!("switch ({}) {{", scrutinee));
                w.push();
                for case in cases {
                    w.line(&format!("case {}:", case));
                    w.blank();
                    w.push();
                    w.line("break;");
                    w.pop();
                }
                if *default_arm {
                    w.line("default:");
                    w.push();
                    w.line("break;");
                    w.pop();
                }
                w.pop();
                w.line("}");
            }
            Stmt::If {
                condition,
                then_body,
            } => {
                w.line(&format!("if ({}) {{", condition));
                w.push();
                write_body(w, then_body);
                w.pop();
                w.line("}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_minimal_class() {
        let class = ClassSpec {
            visibility: Visibility::Private,
            name: "MainViewHolder".to_string(),
            interfaces: vec![],
            comment: Some("MainViewHolder create by main.xml".to_string()),
            fields: vec![FieldSpec {
                visibility: Visibility::Public,
                type_name: "android.view.View".to_string(),
                name: "view".to_string(),
            }],
            constructors: vec![],
            methods: vec![],
        };

        let source = render_class(&class, 1);
        assert_eq!(
            source,
            "    private class MainViewHolder {\n\
             \x20       // MainViewHolder create by main.xml\n\
             \n\
             \x20       public android.view.View view;\n\
             \x20   }\n"
        );
    }

    #[test]
    fn test_render_class_with_interfaces() {
        let class = ClassSpec {
            visibility: Visibility::Private,
            name: "X".to_string(),
            interfaces: vec![
                "android.view.View.OnClickListener".to_string(),
                "android.view.View.OnLongClickListener".to_string(),
            ],
            comment: None,
            fields: vec![],
            constructors: vec![],
            methods: vec![],
        };

        let source = render_class(&class, 0);
        assert!(source.starts_with(
            "private class X implements android.view.View.OnClickListener, \
             android.view.View.OnLongClickListener {"
        ));
    }

    #[test]
    fn test_render_switch_method() {
        let method = MethodSpec {
            annotations: vec!["@Override".to_string()],
            visibility: Visibility::Public,
            return_type: Some("void".to_string()),
            name: "onClick".to_string(),
            params: vec![("android.view.View".to_string(), "v".to_string())],
            body: vec![Stmt::Switch {
                scrutinee: "v.getId()".to_string(),
                cases: vec!["R.id.submit_btn".to_string()],
                default_arm: true,
            }],
        };

        let source = render_method(&method, 0);
        assert_eq!(
            source,
            "@Override\n\
             public void onClick(android.view.View v) {\n\
             \x20   switch (v.getId()) {\n\
             \x20       case R.id.submit_btn:\n\
             \n\
             \x20           break;\n\
             \x20       default:\n\
             \x20           break;\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn test_render_constructor_and_if() {
        let ctor = MethodSpec {
            annotations: vec![],
            visibility: Visibility::Public,
            return_type: None,
            name: "Holder".to_string(),
            params: vec![("android.view.View".to_string(), "view".to_string())],
            body: vec![
                Stmt::Line("this.view = view;".to_string()),
                Stmt::If {
                    condition: "view == null".to_string(),
                    then_body: vec![Stmt::Line("return;".to_string())],
                },
            ],
        };

        let source = render_method(&ctor, 0);
        assert_eq!(
            source,
            "public Holder(android.view.View view) {\n\
             \x20   this.view = view;\n\
             \x20   if (view == null) {\n\
             \x20       return;\n\
             \x20   }\n\
             }\n"
        );
    }
}
