//! # MEI Document Model
//!
//! A small ordered element tree: each element has a name, an `xml:id`,
//! ordered key/value attributes and ordered children. The converter only
//! builds trees; [`crate::writer`] serializes them.
//!
//! Identifiers have the form `m-<uuid>` and are unique for the run, so a
//! zone id can be referenced from any other element through `facs` or
//! `systemref`.

use uuid::Uuid;

pub const MEI_NAMESPACE: &str = "http://www.music-encoding.org/ns/mei";
pub const MEI_VERSION: &str = "2013";

/// Generate a fresh element identifier
pub fn generate_id() -> String {
    format!("m-{}", Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeiElement {
    name: String,
    id: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<MeiElement>,
}

impl MeiElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: generate_id(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder-style [`MeiElement::add_attribute`]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[MeiElement] {
        &self.children
    }

    /// Character content, written before any children
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Set an attribute, replacing any previous value for `key`.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn add_child(&mut self, child: MeiElement) {
        self.children.push(child);
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&MeiElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All descendants named `name`, in document order.
    pub fn descendants_by_name(&self, name: &str) -> Vec<&MeiElement> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a MeiElement>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// Find an element anywhere below (or at) `self` by its id.
    pub fn find_by_id(&self, id: &str) -> Option<&MeiElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }
}

/// An MEI document with its root `mei` element
#[derive(Debug, Clone, PartialEq)]
pub struct MeiDocument {
    root: MeiElement,
}

impl MeiDocument {
    pub fn new() -> Self {
        Self {
            root: MeiElement::new("mei").with_attribute("meiversion", MEI_VERSION),
        }
    }

    pub fn root(&self) -> &MeiElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut MeiElement {
        &mut self.root
    }
}

impl Default for MeiDocument {
    fn default() -> Self {
        Self::new()
    }
}
