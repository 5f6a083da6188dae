//! Mutable SVG document
//!
//! `roxmltree` parses the rendered text; the result is copied into an owned
//! arena tree so that nodes can be annotated and detached afterwards. Every
//! node keeps a [`NodeId`] for its whole life, which lets callers remember a
//! node while walking the tree and act on exactly that node later, even when
//! another node has the same attributes.

mod surgery;
mod viewport;

pub use self::surgery::{annotate_glyphs, strip_glyphs};
pub use self::viewport::{ViewBox, ViewportTransform};

use std::fmt::Write;

use crate::error::{Error, Result};

/// XML declaration written in front of every serialized document
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Stable handle to a node of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Qualified name as written, e.g. `xlink:href`
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name as written, e.g. `svg` or `svg:g`
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// Local part of the qualified name
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing its value in place when it already exists
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owned, editable XML tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Parse SVG/XML text
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = roxmltree::Document::parse(text)?;
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = doc.import(parsed.root_element(), None)?;
        doc.root = root;
        Ok(doc)
    }

    /// Root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `id` and everything below it that is still attached, in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev());
        }
        out
    }

    /// Whether `id` still hangs off the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Detach `id` from its parent
    ///
    /// Returns `false` when the node was already detached or is the root.
    /// The node keeps its id; it is simply no longer reachable.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        let siblings = &mut self.nodes[parent.0].children;
        match siblings.iter().position(|&c| c == id) {
            Some(pos) => {
                siblings.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Serialize the attached tree, prefixed with [`XML_DECLARATION`]
    pub fn to_xml_string(&self) -> Result<String> {
        let mut out = String::from(XML_DECLARATION);
        self.write_node(&mut out, self.root)
            .map_err(|e| Error::Document(format!("failed to serialize document: {}", e)))?;
        Ok(out)
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn import(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> Result<NodeId> {
        let kind = match node.node_type() {
            roxmltree::NodeType::Element => NodeKind::Element(import_element(node)?),
            roxmltree::NodeType::Text => NodeKind::Text(node.text().unwrap_or_default().to_string()),
            roxmltree::NodeType::Comment => {
                NodeKind::Comment(node.text().unwrap_or_default().to_string())
            }
            roxmltree::NodeType::PI => {
                let pi = node
                    .pi()
                    .ok_or_else(|| Error::Document("processing instruction without data".into()))?;
                NodeKind::ProcessingInstruction {
                    target: pi.target.to_string(),
                    value: pi.value.map(str::to_string),
                }
            }
            roxmltree::NodeType::Root => {
                return Err(Error::Document("unexpected document root node".into()))
            }
        };

        let id = self.push(kind, parent);
        for child in node.children() {
            self.import(child, Some(id))?;
        }
        Ok(id)
    }

    fn write_node(&self, out: &mut String, id: NodeId) -> std::fmt::Result {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => {
                write!(out, "<{}", element.name)?;
                for attr in &element.attributes {
                    write!(out, " {}=\"{}\"", attr.name, escape(&attr.value))?;
                }
                let children = &self.nodes[id.0].children;
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &child in children {
                        self.write_node(out, child)?;
                    }
                    write!(out, "</{}>", element.name)?;
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => write!(out, "<!--{}-->", text)?,
            NodeKind::ProcessingInstruction { target, value } => match value {
                Some(value) => write!(out, "<?{} {}?>", target, value)?,
                None => write!(out, "<?{}?>", target)?,
            },
        }
        Ok(())
    }
}

/// Copy an element with prefixed names and the namespace declarations it
/// introduces
fn import_element(node: roxmltree::Node<'_, '_>) -> Result<Element> {
    let tag = node.tag_name();
    let name = qualify(node, tag.namespace(), tag.name(), true)?;

    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    let mut attributes = Vec::new();
    for ns in node.namespaces() {
        if ns.uri() == XML_NAMESPACE || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        let attr_name = match ns.name() {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_string(),
        };
        attributes.push(Attribute {
            name: attr_name,
            value: ns.uri().to_string(),
        });
    }
    for attr in node.attributes() {
        attributes.push(Attribute {
            name: qualify(node, attr.namespace(), attr.name(), false)?,
            value: attr.value().to_string(),
        });
    }

    Ok(Element { name, attributes })
}

/// Rebuild `prefix:name` for a resolved namespace URI
///
/// Unprefixed attributes have no namespace; elements in the default
/// namespace keep a bare name.
fn qualify(node: roxmltree::Node<'_, '_>, uri: Option<&str>, local: &str, is_element: bool) -> Result<String> {
    let Some(uri) = uri else {
        return Ok(local.to_string());
    };
    if uri == XML_NAMESPACE {
        return Ok(format!("xml:{}", local));
    }

    let mut candidates = node.namespaces().filter(|ns| ns.uri() == uri);
    // Attributes never take the default namespace, so prefer a prefixed binding
    let binding = if is_element {
        candidates.next()
    } else {
        candidates.find(|ns| ns.name().is_some())
    };

    match binding.and_then(|ns| ns.name()) {
        Some(prefix) => Ok(format!("{}:{}", prefix, local)),
        None if is_element => Ok(local.to_string()),
        None => Err(Error::Document(format!(
            "no prefix bound for attribute namespace '{}'",
            uri
        ))),
    }
}

/// Escape text for use in attribute values and character data
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
