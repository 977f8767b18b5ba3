//! Owned XML element tree and the pre-order search used by the extractor.
//!
//! Element and attribute names are resolved against their namespace
//! declarations while parsing, so matching can be done on local names
//! without carrying namespace prefixes around.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// OpenDocument text namespace.
pub const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// OpenOffice.org 1.x text namespace.
pub const LEGACY_TEXT_NS: &str = "http://openoffice.org/2000/text";

/// A namespace-resolved attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub local_name: String,
    pub value: String,
}

/// A parsed XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Namespace URI, when the prefix is bound.
    pub namespace: Option<String>,
    /// Prefix as written in the document.
    pub prefix: Option<String>,
    pub local_name: String,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<Attribute>,
    /// Character data preceding the first child element.
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no namespace.
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Default::default()
        }
    }

    /// True when the local name is `suffix` or ends with `-suffix`.
    ///
    /// `table-cell` therefore matches both `table-cell` and
    /// `covered-table-cell`, while `table` does not match `table-row`.
    pub fn has_tag_suffix(&self, suffix: &str) -> bool {
        match self.local_name.strip_suffix(suffix) {
            Some("") => true,
            Some(head) => head.ends_with('-'),
            None => false,
        }
    }

    /// True for elements carrying text content: anything in the text
    /// namespace, or named `text`.
    pub fn is_text_element(&self) -> bool {
        match self.namespace.as_deref() {
            Some(ns) if ns == TEXT_NS || ns == LEGACY_TEXT_NS => true,
            None if self.prefix.as_deref() == Some("text") => true,
            _ => self.local_name == "text",
        }
    }

    /// Value of the first attribute whose local name is exactly `local_name`.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.local_name == local_name)
            .map(|attr| attr.value.as_str())
    }

    /// Leading text, or the empty string when there is none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    fn push_text(&mut self, chunk: &str) {
        // Text after the first child belongs to that child's tail, which
        // nothing here reads.
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(chunk);
        }
    }
}

/// Collect every element under `root` (root included, pre-order) for which
/// `predicate(element, ancestors, depth)` holds.
///
/// `ancestors` runs from `root` to the element's parent; `depth` is 0 for
/// `root`.
pub fn find_all<'a, F>(root: &'a Element, mut predicate: F) -> Vec<&'a Element>
where
    F: FnMut(&Element, &[&Element], usize) -> bool,
{
    let mut found = Vec::new();
    let mut path = Vec::new();
    visit(root, &mut path, &mut predicate, &mut found);
    found
}

fn visit<'a, F>(
    node: &'a Element,
    path: &mut Vec<&'a Element>,
    predicate: &mut F,
    found: &mut Vec<&'a Element>,
) where
    F: FnMut(&Element, &[&Element], usize) -> bool,
{
    if predicate(node, path, path.len()) {
        found.push(node);
    }
    path.push(node);
    for child in &node.children {
        visit(child, path, predicate, found);
    }
    path.pop();
}

fn namespace_of(result: ResolveResult) -> Option<String> {
    match result {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.into_inner()).into_owned()),
        _ => None,
    }
}

fn element_from_start<R>(reader: &NsReader<R>, start: &BytesStart) -> Result<Element> {
    let (ns, local) = reader.resolve_element(start.name());
    let mut element = Element {
        namespace: namespace_of(ns),
        prefix: start
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
        local_name: String::from_utf8_lossy(local.as_ref()).into_owned(),
        ..Default::default()
    };

    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        let value = attr
            .unescape_value()
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        element.attributes.push(Attribute {
            namespace: namespace_of(ns),
            local_name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

/// Parse an XML document into its root element.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(e) => {
                let element = element_from_start(&reader, &e)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = element_from_start(&reader, &e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlParse("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                } else if !text.trim().is_empty() {
                    return Err(Error::XmlParse("text outside of the root element".to_string()));
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::XmlParse(format!(
            "unexpected end of document inside <{}>",
            stack.last().map(|e| e.local_name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::XmlParse("multiple root elements".to_string())),
    }
    Ok(())
}
