//! The response decoder: raw XML body → navigable owned document.
//!
//! The export API's payloads are handed to the caller as-is; no schema is
//! imposed here. The tree is built from quick-xml events, so any
//! well-formedness violation (bad syntax, tag imbalance, missing root)
//! surfaces as [`VebraError::MalformedResponse`].

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::error::VebraError;

/// A parsed XML response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// The document's root element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Consume the document and take the root element.
    pub fn into_root(self) -> XmlElement {
        self.root
    }
}

/// One element of a parsed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Tag name, including any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given tag name, in document order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All child elements, in document order.
    pub fn all_children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter()
    }

    /// Direct character content, surrounding whitespace trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Direct character content exactly as received.
    pub fn raw_text(&self) -> &str {
        &self.text
    }
}

/// Parse a response body into an [`XmlDocument`].
///
/// # Errors
///
/// Returns [`VebraError::MalformedResponse`] when the body is not a single
/// well-formed XML document.
pub fn decode(body: &str) -> Result<XmlDocument, VebraError> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(element_from(e)?),
            Ok(Event::Empty(ref e)) => {
                let el = element_from(e)?;
                attach(el, &mut stack, &mut root)?;
            }
            Ok(Event::Text(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    let unescaped = t.unescape().map_err(malformed)?;
                    top.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(ref e)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| VebraError::MalformedResponse("unmatched closing tag".into()))?;
                let name = e.name();
                let closing = String::from_utf8_lossy(name.as_ref());
                if el.name != closing {
                    return Err(VebraError::MalformedResponse(format!(
                        "expected </{}>, found </{closing}>",
                        el.name
                    )));
                }
                attach(el, &mut stack, &mut root)?;
            }
            Ok(Event::Eof) => break,
            // declarations, comments, PIs, doctypes carry no payload data
            Ok(_) => {}
            Err(e) => return Err(malformed(e)),
        }
    }

    if let Some(open) = stack.last() {
        return Err(VebraError::MalformedResponse(format!(
            "unclosed element <{}>",
            open.name
        )));
    }
    let root = root.ok_or_else(|| VebraError::MalformedResponse("no root element".into()))?;
    Ok(XmlDocument { root })
}

fn element_from(e: &BytesStart<'_>) -> Result<XmlElement, VebraError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    })
}

fn attach(
    el: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<(), VebraError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(VebraError::MalformedResponse(
            "multiple root elements".into(),
        ));
    }
    *root = Some(el);
    Ok(())
}

fn malformed(e: impl std::fmt::Display) -> VebraError {
    VebraError::MalformedResponse(e.to_string())
}
