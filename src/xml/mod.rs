//! Owned XML output tree.
//!
//! The translation engine builds the document against this append-only
//! element type: each parent exclusively owns its children vector, navigation
//! is purely top-down during construction, and nothing is read back after
//! being appended. Serialization produces the indented text form with the
//! MusicXML partwise DOCTYPE.

/// A child of an element: nested element, text content, or a comment.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

/// One output element: tag, ordered attributes, ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        XmlElement {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn append_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    pub fn append_comment(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Comment(text.into()));
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements only, skipping text and comment nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.tag == tag)
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// Serialize this element (and subtree) with two-space indentation.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&xml_escape(value));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        // An element whose only child is text stays on one line.
        if self.children.len() == 1 {
            if let XmlNode::Text(t) = &self.children[0] {
                out.push('>');
                out.push_str(&xml_escape(t));
                out.push_str("</");
                out.push_str(&self.tag);
                out.push_str(">\n");
                return;
            }
        }

        out.push_str(">\n");
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.write_indented(out, depth + 1),
                XmlNode::Text(t) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&xml_escape(t));
                    out.push('\n');
                }
                XmlNode::Comment(t) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str("<!-- ");
                    out.push_str(&xml_escape(t));
                    out.push_str(" -->\n");
                }
            }
        }
        out.push_str(&pad);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}

/// Escape special XML characters.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize a complete document: XML declaration, partwise DOCTYPE, root.
pub fn write_document(root: &XmlElement) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n");
    out.push_str(&root.to_xml());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_self_closes() {
        let el = XmlElement::new("rest");
        assert_eq!(el.to_xml(), "<rest/>\n");
    }

    #[test]
    fn test_text_only_element_single_line() {
        let el = XmlElement::new("step").with_text("C");
        assert_eq!(el.to_xml(), "<step>C</step>\n");
    }

    #[test]
    fn test_nested_elements_indent() {
        let mut pitch = XmlElement::new("pitch");
        pitch.append_child(XmlElement::new("step").with_text("G"));
        pitch.append_child(XmlElement::new("octave").with_text("4"));
        assert_eq!(
            pitch.to_xml(),
            "<pitch>\n  <step>G</step>\n  <octave>4</octave>\n</pitch>\n"
        );
    }

    #[test]
    fn test_attribute_order_preserved() {
        let el = XmlElement::new("tuplet")
            .with_attribute("type", "start")
            .with_attribute("bracket", "yes")
            .with_attribute("number", "1");
        assert_eq!(el.to_xml(), "<tuplet type=\"start\" bracket=\"yes\" number=\"1\"/>\n");
    }

    #[test]
    fn test_escape() {
        assert_eq!(xml_escape("a<b&c>\"d'"), "a&lt;b&amp;c&gt;&quot;d&apos;");
    }

    #[test]
    fn test_comment_node() {
        let mut el = XmlElement::new("measure");
        el.append_comment("unmapped: pedal");
        assert!(el.to_xml().contains("<!-- unmapped: pedal -->"));
    }

    #[test]
    fn test_document_framing() {
        let root = XmlElement::new("score-partwise").with_attribute("version", "3.1");
        let doc = write_document(&root);
        assert!(doc.starts_with("<?xml version=\"1.0\""));
        assert!(doc.contains("<!DOCTYPE score-partwise"));
        assert!(doc.contains("<score-partwise version=\"3.1\"/>"));
    }

    #[test]
    fn test_find_child_and_text() {
        let mut note = XmlElement::new("note");
        note.append_child(XmlElement::new("duration").with_text("4"));
        assert_eq!(note.find_child("duration").unwrap().text(), "4");
        assert!(note.find_child("pitch").is_none());
    }
}
