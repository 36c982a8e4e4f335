/// Cursor-based parser for Android layout XML
///
/// Covers the subset layout files actually use: an optional prolog,
/// comments, nested elements with namespaced attributes, and self-closing
/// tags. Text content is skipped; entities are left verbatim.

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Node {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

pub struct Parser {
    source: String,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            source: source.to_string(),
            pos: 0,
        }
    }

    /// Parse a complete layout document and return its root element
    pub fn parse(&mut self) -> Result<Node, String> {
        self.skip_misc();

        if self.pos >= self.source.len() {
            return Err("empty layout document".to_string());
        }

        let root = self.parse_element()?;

        self.skip_misc();
        if self.pos < self.source.len() {
            return Err(format!(
                "unexpected content after root element at position {}",
                self.pos
            ));
        }

        Ok(root)
    }

    fn parse_element(&mut self) -> Result<Node, String> {
        self.expect("<")?;
        let tag = self.read_name()?;

        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();

            if self.starts_with("/>") {
                self.expect("/>")?;
                self_closing = true;
                break;
            }

            if self.peek_char() == Some('>') {
                self.advance();
                break;
            }

            if self.pos >= self.source.len() {
                return Err(format!("unclosed tag: <{}>", tag));
            }

            attributes.push(self.parse_attribute()?);
        }

        let children = if self_closing {
            Vec::new()
        } else {
            self.parse_children(&tag)?
        };

        Ok(Node {
            tag,
            attributes,
            children,
        })
    }

    fn parse_children(&mut self, tag: &str) -> Result<Vec<Node>, String> {
        let close = format!("</{}>", tag);
        let mut children = Vec::new();

        loop {
            // text content is not meaningful in layout files
            self.skip_text();

            if self.starts_with(&close) {
                self.expect(&close)?;
                break;
            }

            if self.pos >= self.source.len() {
                return Err(format!("unclosed tag: <{}>", tag));
            }

            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.starts_with("</") {
                // a close tag for something other than the open element
                return Err(format!(
                    "mismatched close tag at position {} (expected {})",
                    self.pos, close
                ));
            } else {
                children.push(self.parse_element()?);
            }
        }

        Ok(children)
    }

    fn parse_attribute(&mut self) -> Result<Attribute, String> {
        let name = self.read_name()?;
        self.skip_whitespace();
        self.expect("=")?;
        self.skip_whitespace();

        let quote = match self.peek_char() {
            Some(c @ ('"' | '\'')) => c,
            _ => {
                return Err(format!(
                    "expected quoted value for attribute `{}` at position {}",
                    name, self.pos
                ))
            }
        };
        self.advance();
        let value = self.read_until(quote);
        if self.peek_char() != Some(quote) {
            return Err(format!("unterminated value for attribute `{}`", name));
        }
        self.advance();

        Ok(Attribute { name, value })
    }

    /// Skip the prolog, comments and whitespace outside the root element
    fn skip_misc(&mut self) {
        loop {
            self.skip_whitespace();
            if self.starts_with("<?") {
                self.skip_until_after("?>");
            } else if self.starts_with("<!--") {
                // a malformed comment here just runs to end of input
                let _ = self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), String> {
        let start = self.pos;
        self.pos += "<!--".len();
        if !self.skip_until_after("-->") {
            return Err(format!("unterminated comment at position {}", start));
        }
        Ok(())
    }

    fn skip_text(&mut self) {
        while self.pos < self.source.len() && self.peek_char() != Some('<') {
            self.advance();
        }
    }

    /// Advance past the next occurrence of `marker`; false if it never occurs
    fn skip_until_after(&mut self, marker: &str) -> bool {
        match self.source[self.pos..].find(marker) {
            Some(offset) => {
                self.pos += offset + marker.len();
                true
            }
            None => {
                self.pos = self.source.len();
                false
            }
        }
    }

    /// Tag and attribute names, including namespace prefixes and dots
    fn read_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ':' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            Err(format!("expected name at position {}", self.pos))
        } else {
            Ok(self.source[start..self.pos].to_string())
        }
    }

    // Cursor helpers

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.pos..].starts_with(s)
    }

    fn expect(&mut self, s: &str) -> Result<(), String> {
        if self.starts_with(s) {
            self.pos += s.len();
            Ok(())
        } else {
            let found: String = self.source[self.pos..].chars().take(20).collect();
            Err(format!(
                "expected '{}' at position {}, found '{}'",
                s, self.pos, found
            ))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    fn read_until(&mut self, c: char) -> String {
        let start = self.pos;
        while self.pos < self.source.len() && self.peek_char() != Some(c) {
            self.advance();
        }
        self.source[start..self.pos].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_self_closing_root() {
        let root = Parser::new(r#"<TextView android:id="@+id/title" />"#)
            .parse()
            .unwrap();
        assert_eq!(root.tag, "TextView");
        assert_eq!(root.attribute("android:id"), Some("@+id/title"));
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_parse_nested_elements() {
        let source = r#"<?xml version="1.0" encoding="utf-8"?>
<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android"
    android:orientation="vertical">
    <!-- header -->
    <TextView android:id="@+id/title_text" />
    <FrameLayout>
        <Button android:id="@+id/submit_btn" android:text="Go"></Button>
    </FrameLayout>
</LinearLayout>"#;

        let root = Parser::new(source).parse().unwrap();
        assert_eq!(root.tag, "LinearLayout");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].tag, "TextView");
        assert_eq!(root.children[1].tag, "FrameLayout");
        assert_eq!(
            root.children[1].children[0].attribute("android:text"),
            Some("Go")
        );
    }

    #[test]
    fn test_single_quoted_attribute() {
        let root = Parser::new(r#"<View android:id='@+id/divider'/>"#)
            .parse()
            .unwrap();
        assert_eq!(root.attribute("android:id"), Some("@+id/divider"));
    }

    #[test]
    fn test_dotted_custom_view_tag() {
        let root = Parser::new(r#"<com.example.widget.AvatarView android:id="@+id/avatar"/>"#)
            .parse()
            .unwrap();
        assert_eq!(root.tag, "com.example.widget.AvatarView");
    }

    #[test]
    fn test_unclosed_tag_is_an_error() {
        let err = Parser::new("<LinearLayout><TextView />")
            .parse()
            .unwrap_err();
        assert!(err.contains("unclosed tag"), "got: {}", err);
    }

    #[test]
    fn test_mismatched_close_tag_is_an_error() {
        let err = Parser::new("<LinearLayout></FrameLayout>")
            .parse()
            .unwrap_err();
        assert!(err.contains("mismatched close tag"), "got: {}", err);
    }

    #[test]
    fn test_text_content_is_skipped() {
        let root = Parser::new("<TextView>Hello, world</TextView>")
            .parse()
            .unwrap();
        assert!(root.children.is_empty());
    }
}
