//! Minimal XML element tree for decoding Query API responses.
//!
//! AWS Query APIs answer with small, flat XML documents. Decoding them into a
//! generic tree keeps the per-service code down to `.child()` / `.child_text()`
//! chains, the same way the provider modules walk `serde_json::Value` trees
//! for JSON APIs.

use crate::error::{AwsApiError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// First child with the given element name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given element name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text content of the first child with the given name.
    /// Empty text is treated as absent.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        let text = self.child(name)?.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn child_f64(&self, name: &str) -> Option<f64> {
        self.child_text(name)?.parse().ok()
    }
}

/// Parses an XML document and returns its root element.
pub fn parse(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(input);
    // Synthetic document node at the bottom of the stack so the root element
    // closes into it.
    let mut stack: Vec<XmlElement> = vec![XmlElement::default()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(XmlElement::named(name));
            }
            Ok(Event::Empty(empty)) => {
                let name = String::from_utf8_lossy(empty.name().as_ref()).into_owned();
                top(&mut stack)?.children.push(XmlElement::named(name));
            }
            Ok(Event::Text(text)) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| AwsApiError::XmlError(e.to_string()))?;
                top(&mut stack)?.text.push_str(&unescaped);
            }
            Ok(Event::CData(cdata)) => {
                let raw = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                top(&mut stack)?.text.push_str(&raw);
            }
            Ok(Event::End(_)) => {
                let finished = stack
                    .pop()
                    .ok_or_else(|| AwsApiError::XmlError("unbalanced end tag".to_string()))?;
                top(&mut stack)?.children.push(finished);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(AwsApiError::XmlError(e.to_string())),
        }
    }

    if stack.len() != 1 {
        return Err(AwsApiError::XmlError("unclosed element".to_string()));
    }
    let mut document = stack.remove(0);
    if document.children.is_empty() {
        return Err(AwsApiError::XmlError("empty document".to_string()));
    }
    Ok(document.children.remove(0))
}

fn top(stack: &mut [XmlElement]) -> Result<&mut XmlElement> {
    stack
        .last_mut()
        .ok_or_else(|| AwsApiError::XmlError("unbalanced end tag".to_string()))
}
