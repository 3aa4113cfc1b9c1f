//! XML document rendering

use crate::xml::model::{Content, Element};

/// Header emitted when [`Config::declaration`] is set
pub const DECLARATION: &str = "<?xml version=\"1.0\" ?>";

/// Configuration for the XML writer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Emit the XML declaration header
    pub declaration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }
}

impl Config {
    pub const fn new(indent: Option<usize>, declaration: bool) -> Self {
        Self {
            indent,
            declaration,
        }
    }

    /// One line, no declaration
    pub const fn compact() -> Self {
        Self::new(None, false)
    }

    /// Indented by `indent` spaces per level, with declaration
    pub const fn pretty(indent: usize) -> Self {
        Self::new(Some(indent), true)
    }
}

/// Render `root` as a document string
///
/// In indented mode every element starts on its own line; elements holding
/// text are written on a single line so their text is not altered.
pub fn write_document(root: &Element, config: &Config) -> String {
    let mut output = String::new();
    match config.indent {
        None => {
            if config.declaration {
                output.push_str(DECLARATION);
            }
            write_inline(root, &mut output);
        }
        Some(indent) => {
            if config.declaration {
                output.push_str(DECLARATION);
                output.push('\n');
            }
            write_pretty(root, indent, 0, &mut output);
        }
    }
    output
}

fn write_pretty(element: &Element, indent: usize, depth: usize, output: &mut String) {
    let pad = " ".repeat(indent * depth);
    output.push_str(&pad);

    if element.is_empty() || element.has_text() {
        write_inline(element, output);
        output.push('\n');
        return;
    }

    write_start_tag(element, output);
    output.push_str(">\n");
    for child in element.elements() {
        write_pretty(child, indent, depth + 1, output);
    }
    output.push_str(&pad);
    write_end_tag(element, output);
    output.push('\n');
}

fn write_inline(element: &Element, output: &mut String) {
    write_start_tag(element, output);

    if element.is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_inline(child, output),
            Content::Text(text) => escape_into(text, false, output),
        }
    }
    write_end_tag(element, output);
}

fn write_start_tag(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);
    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        escape_into(value, true, output);
        output.push('"');
    }
}

fn write_end_tag(element: &Element, output: &mut String) {
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn escape_into(input: &str, attribute: bool, output: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if attribute => output.push_str("&quot;"),
            '\'' if attribute => output.push_str("&apos;"),
            _ => output.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Element {
        Element::new("level1")
            .with_attribute("value", "456")
            .with_child(
                Element::new("level2")
                    .with_attribute("name", "test")
                    .with_attribute("value", "123"),
            )
    }

    #[test]
    fn test_compact_with_declaration() {
        assert_eq!(
            write_document(&nested(), &Config::default()),
            "<?xml version=\"1.0\" ?><level1 value=\"456\"><level2 name=\"test\" value=\"123\"/></level1>"
        );
    }

    #[test]
    fn test_pretty() {
        assert_eq!(
            write_document(&nested(), &Config::pretty(2)),
            "<?xml version=\"1.0\" ?>\n<level1 value=\"456\">\n  <level2 name=\"test\" value=\"123\"/>\n</level1>\n"
        );
    }

    #[test]
    fn test_pretty_keeps_text_elements_on_one_line() {
        let element = Element::new("test")
            .with_child(Element::new("list1").with_text("0"))
            .with_child(Element::new("mixed").with_text("a").with_child(Element::new("b")));
        assert_eq!(
            write_document(&element, &Config::new(Some(4), false)),
            "<test>\n    <list1>0</list1>\n    <mixed>a<b/></mixed>\n</test>\n"
        );
    }

    #[test]
    fn test_escaping() {
        let element = Element::new("e")
            .with_attribute("q", "a\"b'c&<d>")
            .with_text("x < y & \"z\"");
        assert_eq!(
            write_document(&element, &Config::compact()),
            "<e q=\"a&quot;b&apos;c&amp;&lt;d&gt;\">x &lt; y &amp; \"z\"</e>"
        );
    }
}
