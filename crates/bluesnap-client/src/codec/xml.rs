//! # XML Codec
//!
//! Builds request documents for the legacy API and decodes XML responses
//! into a `serde_json::Value` tree:
//!
//! - an element holding only text becomes a string, an empty one `null`
//! - attributes become `@name` keys, text next to children becomes `#text`
//! - repeated sibling elements become an array, in document order

use super::{DecodeError, WireFormat};
use bluesnap_core::{BlueSnapError, BlueSnapResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

/// Namespace of every element in the legacy API schema
pub const NAMESPACE: &str = "http://ws.plimus.com";

/// An element of a request document.
///
/// Children keep insertion order; the gateway schema is order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: Option<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Element holding a single text value
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append a child only when present
    pub fn optional_child(mut self, child: Option<XmlElement>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    /// Builder: append several children
    pub fn children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_elements(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child with the given name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name
    pub fn find_text(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(XmlElement::text)
    }

    /// Serialize as a standalone document in the gateway namespace
    pub fn to_document(&self) -> BlueSnapResult<String> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        write_element(&mut writer, self, Some(NAMESPACE))?;

        String::from_utf8(writer.into_inner()).map_err(serialization_error)
    }
}

fn serialization_error(e: impl std::fmt::Display) -> BlueSnapError {
    BlueSnapError::Serialization(format!("Failed to write XML: {}", e))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
    namespace: Option<&str>,
) -> BlueSnapResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    if let Some(ns) = namespace {
        start.push_attribute(("xmlns", ns));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialization_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialization_error)?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialization_error)?;
    }
    for child in &element.children {
        write_element(writer, child, None)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(serialization_error)
}

// =============================================================================
// Decoding
// =============================================================================

struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value().map_err(xml_error)?;
            attributes.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim();

        let value = if self.attributes.is_empty() && self.children.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut object = self.attributes;
            object.extend(self.children);
            if !text.is_empty() {
                object.insert("#text".to_string(), Value::String(text.to_string()));
            }
            Value::Object(object)
        };

        (self.name, value)
    }
}

fn xml_error(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::new(WireFormat::Xml, e)
}

/// Decode an XML document into `{ root-name: value }`
pub fn decode(document: &str) -> Result<Value, DecodeError> {
    let mut reader = Reader::from_str(document);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(xml_error("multiple root elements"));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(xml_error("multiple root elements"));
                }
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| xml_error("unbalanced end tag"))?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => parent.add_child(name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(xml_error("text outside of the root element")),
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&String::from_utf8_lossy(&data)),
                    None => return Err(xml_error("CDATA outside of the root element")),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document"));
    }

    let (name, value) = root.ok_or_else(|| xml_error("no root element"))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_has_namespace_on_root_only() {
        let doc = XmlElement::new("credit-card")
            .child(XmlElement::leaf("card-type", "VISA"))
            .child(XmlElement::leaf("expiration-month", "10"))
            .to_document()
            .unwrap();

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<credit-card xmlns=\"http://ws.plimus.com\">"));
        assert!(doc.contains("<card-type>VISA</card-type>"));
        assert!(doc.contains("<expiration-month>10</expiration-month>"));
        assert_eq!(doc.matches("xmlns").count(), 1);
    }

    #[test]
    fn test_children_keep_order() {
        let element = XmlElement::new("order")
            .child(XmlElement::leaf("b", "2"))
            .optional_child(None)
            .child(XmlElement::leaf("a", "1"));
        let doc = element.to_document().unwrap();

        assert!(doc.find("<b>").unwrap() < doc.find("<a>").unwrap());
        assert_eq!(element.child_elements().len(), 2);
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let doc = XmlElement::new("payment-info")
            .child(XmlElement::new("credit-cards-info"))
            .to_document()
            .unwrap();
        assert!(doc.contains("<credit-cards-info/>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = XmlElement::leaf("soft-descriptor", "A & B <C>")
            .to_document()
            .unwrap();
        assert!(doc.contains("A &amp; B &lt;C&gt;"));

        let decoded = decode(&doc).unwrap();
        assert_eq!(decoded["soft-descriptor"]["#text"], json!("A & B <C>"));
    }

    #[test]
    fn test_decode_structure() {
        let decoded = decode(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
            <messages xmlns="http://ws.plimus.com">
                <message>
                    <error-name>EXPIRED_CARD</error-name>
                    <code>14002</code>
                    <description>Expired</description>
                </message>
            </messages>"#,
        )
        .unwrap();

        assert_eq!(decoded["messages"]["@xmlns"], json!(NAMESPACE));
        assert_eq!(decoded["messages"]["message"]["code"], json!("14002"));
        assert_eq!(decoded["messages"]["message"]["description"], json!("Expired"));
    }

    #[test]
    fn test_decode_repeated_siblings_become_array() {
        let decoded = decode(
            "<messages><message><code>1</code></message><message><code>2</code></message>\
             <message><code>3</code></message></messages>",
        )
        .unwrap();

        let messages = decoded["messages"]["message"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2]["code"], json!("3"));
    }

    #[test]
    fn test_decode_empty_elements_are_null() {
        let decoded = decode("<shopper><credit-cards-info/><zip></zip></shopper>").unwrap();
        assert_eq!(decoded["shopper"]["credit-cards-info"], Value::Null);
        assert_eq!(decoded["shopper"]["zip"], Value::Null);
    }

    #[test]
    fn test_decode_bare_text_wrapper() {
        let decoded = decode("<xml>User: API_1 is not authorized to view shopper: 42.</xml>").unwrap();
        assert_eq!(
            decoded,
            json!({"xml": "User: API_1 is not authorized to view shopper: 42."})
        );
    }

    #[test]
    fn test_decode_rejects_plain_text() {
        assert!(decode("User: API_1 is not authorized to view shopper: 42.").is_err());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode("<a><b></a>").is_err());
        assert!(decode("<a>").is_err());
        assert!(decode("<a/><b/>").is_err());
        assert!(decode("<?xml version=\"1.0\"?>").is_err());
    }
}
