use crate::error::GenerateError;

/// Field-name derivation policy for discovered elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNaming {
    /// Use the id verbatim: `title_text`
    Raw,
    /// Lower camel case: `titleText`
    #[default]
    Camel,
    /// Prefix + upper camel case: `mTitleText`
    Prefixed,
}

impl FieldNaming {
    /// Parse a policy name as written in a session file
    pub fn parse(s: &str) -> Result<Self, GenerateError> {
        match s {
            "raw" => Ok(FieldNaming::Raw),
            "camel" => Ok(FieldNaming::Camel),
            "prefixed" => Ok(FieldNaming::Prefixed),
            other => Err(GenerateError::UnrecognizedNamingPolicy(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldNaming::Raw => "raw",
            FieldNaming::Camel => "camel",
            FieldNaming::Prefixed => "prefixed",
        }
    }
}

/// One UI widget discovered in a layout file, annotated with the flags
/// that control which code is generated for it
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Identifier with the `@+id/` reference prefix stripped
    pub id: String,
    /// Fully-qualified widget type, used verbatim as the field type
    pub type_name: String,
    pub naming: FieldNaming,
    /// Whether this element is included in generation output
    pub used: bool,
    pub clickable: bool,
    pub long_clickable: bool,
    pub edit_text: bool,
    /// `android:hint` value, literal or `@string/...` reference
    pub hint: Option<String>,
}

impl Element {
    pub fn new(id: &str, type_name: &str) -> Self {
        Element {
            id: id.to_string(),
            type_name: type_name.to_string(),
            naming: FieldNaming::default(),
            used: true,
            clickable: false,
            long_clickable: false,
            edit_text: false,
            hint: None,
        }
    }

    /// Resource-reference expression used inside generated code
    pub fn full_id(&self) -> String {
        format!("R.id.{}", self.id)
    }

    /// Last segment of the qualified type: `android.widget.TextView` -> `TextView`
    pub fn simple_type(&self) -> &str {
        self.type_name.rsplit('.').next().unwrap_or(&self.type_name)
    }

    /// Per-type binding wrapper used by the model class
    pub fn bind_model_type(&self) -> String {
        format!("Bind{}Model", self.simple_type())
    }

    /// Generated field name under this element's naming policy
    pub fn field_name(&self, prefix: &str) -> String {
        match self.naming {
            FieldNaming::Raw => self.id.clone(),
            FieldNaming::Camel => to_lower_camel(&self.id),
            FieldNaming::Prefixed => format!("{}{}", prefix, to_upper_camel(&self.id)),
        }
    }
}

/// `title_text` -> `titleText`
pub fn to_lower_camel(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for (i, part) in id.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(part);
        } else {
            out.push_str(&capitalize(part));
        }
    }
    out
}

/// `login_activity` -> `LoginActivity`
pub fn to_upper_camel(id: &str) -> String {
    id.split('_')
        .filter(|p| !p.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
