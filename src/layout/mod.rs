/// Layout scanning: discover injectable view IDs in Android layout XML
pub mod parser;

use crate::element::Element;
use parser::{Node, Parser};

const ID_ATTR: &str = "android:id";
const HINT_ATTR: &str = "android:hint";
const CLICKABLE_ATTR: &str = "android:clickable";
const LONG_CLICKABLE_ATTR: &str = "android:longClickable";

/// Unqualified tags living in `android.widget`
const WIDGET_TAGS: &[&str] = &[
    "AutoCompleteTextView",
    "Button",
    "CheckBox",
    "CheckedTextView",
    "Chronometer",
    "EditText",
    "FrameLayout",
    "GridLayout",
    "GridView",
    "HorizontalScrollView",
    "ImageButton",
    "ImageView",
    "LinearLayout",
    "ListView",
    "MultiAutoCompleteTextView",
    "ProgressBar",
    "RadioButton",
    "RadioGroup",
    "RatingBar",
    "RelativeLayout",
    "ScrollView",
    "SeekBar",
    "Space",
    "Spinner",
    "Switch",
    "TextClock",
    "TextView",
    "ToggleButton",
    "Toolbar",
    "VideoView",
];

/// Unqualified tags living in `android.view`
const VIEW_TAGS: &[&str] = &["SurfaceView", "TextureView", "View", "ViewStub"];

/// Widgets that default to clickable even without `android:clickable`
const CLICKABLE_TAGS: &[&str] = &["Button", "ImageButton", "ToggleButton"];

/// Parse a layout source and extract every element carrying an `android:id`
pub fn scan(source: &str) -> Result<Vec<Element>, String> {
    let root = Parser::new(source).parse()?;
    let mut elements = Vec::new();
    collect(&root, &mut elements);
    Ok(elements)
}

fn collect(node: &Node, out: &mut Vec<Element>) {
    // <include> pulls in another layout; out of scope for a single-file scan
    if node.tag == "include" {
        return;
    }

    if let Some(raw) = node.attribute(ID_ATTR) {
        if let Some(id) = strip_id_reference(raw) {
            out.push(element_from_node(node, id));
        }
    }

    for child in &node.children {
        collect(child, out);
    }
}

/// `@+id/login_button` / `@id/login_button` -> `login_button`.
/// Framework ids (`@android:id/...`) are not injection candidates.
fn strip_id_reference(raw: &str) -> Option<String> {
    let id = raw
        .strip_prefix("@+id/")
        .or_else(|| raw.strip_prefix("@id/"))?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn element_from_node(node: &Node, id: String) -> Element {
    let type_name = qualify_tag(&node.tag);
    let mut element = Element::new(&id, &type_name);

    let simple = node.tag.rsplit('.').next().unwrap_or(&node.tag);
    element.clickable = attr_is_true(node, CLICKABLE_ATTR) || CLICKABLE_TAGS.contains(&simple);
    element.long_clickable = attr_is_true(node, LONG_CLICKABLE_ATTR);
    element.edit_text = simple.ends_with("EditText");
    element.hint = node.attribute(HINT_ATTR).map(|h| h.to_string());

    element
}

fn attr_is_true(node: &Node, name: &str) -> bool {
    node.attribute(name) == Some("true")
}

/// Qualify an unqualified layout tag. Dotted tags (custom views) and
/// anything outside the known tables are kept verbatim.
fn qualify_tag(tag: &str) -> String {
    if tag.contains('.') {
        return tag.to_string();
    }
    if WIDGET_TAGS.contains(&tag) {
        return format!("android.widget.{}", tag);
    }
    if VIEW_TAGS.contains(&tag) {
        return format!("android.view.{}", tag);
    }
    if tag == "WebView" {
        return "android.webkit.WebView".to_string();
    }
    tag.to_string()
}
