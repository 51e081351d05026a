//! Addressable, mutable element tree the views render into.
//!
//! A [`Surface`] supports exactly what the views need: whole-subtree
//! replacement, text and attribute mutation on a single element, and click
//! listeners per element. Lookups return `Option`, so wiring a handler to an
//! element that a given render left out is a no-op rather than an error.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type Listener = Rc<dyn Fn()>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `.class[data-key="value"]`
    ClassData { class: String, key: String, value: String },
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: &str) -> Self {
        Self::Class(class.into())
    }

    pub fn class_data(class: &str, key: &str, value: &str) -> Self {
        Self::ClassData { class: class.into(), key: key.into(), value: value.into() }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::ClassData { class, key, value } => write!(f, ".{class}[data-{key}=\"{value}\"]"),
        }
    }
}

#[derive(Default)]
pub struct Node {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Node>,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("classes", &self.classes)
            .field("text", &self.text)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, ..Default::default() }
    }

    pub fn div(class: &str) -> Self {
        Self::new("div").class(class)
    }

    pub fn button(id: &str, class: &str, label: &str) -> Self {
        Self::new("button").with_id(id).class(class).text(label)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds one or more space-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.extend(classes.split_whitespace().map(String::from));
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.has_class(class),
            Selector::ClassData { class, key, value } => {
                self.has_class(class) && self.data.get(key).is_some_and(|v| v == value)
            }
        }
    }

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// A selector that picks out this node, preferring its id.
    pub fn address(&self) -> Option<Selector> {
        if let Some(id) = &self.id {
            return Some(Selector::Id(id.clone()));
        }
        let class = self.classes.first()?;
        match self.data.iter().next() {
            Some((key, value)) => Some(Selector::class_data(class, key, value)),
            None => Some(Selector::class(class)),
        }
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (key, value) in &self.data {
            push_attr(out, &format!("data-{key}"), value);
        }
        for (key, value) in &self.attrs {
            push_attr(out, key, value);
        }
        out.push('>');
        out.push_str(&escape(&self.text));
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn find<'a>(nodes: &'a [Node], selector: &Selector) -> Option<&'a Node> {
    for node in nodes {
        if node.matches(selector) {
            return Some(node);
        }
        if let Some(found) = find(&node.children, selector) {
            return Some(found);
        }
    }
    None
}

fn find_mut<'a>(nodes: &'a mut [Node], selector: &Selector) -> Option<&'a mut Node> {
    for node in nodes {
        if node.matches(selector) {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, selector) {
            return Some(found);
        }
    }
    None
}

fn collect<'a>(nodes: &'a [Node], selector: &Selector, out: &mut Vec<&'a Node>) {
    for node in nodes {
        if node.matches(selector) {
            out.push(node);
        }
        collect(&node.children, selector, out);
    }
}

fn visit_mut(nodes: &mut [Node], selector: &Selector, f: &mut dyn FnMut(&mut Node)) {
    for node in nodes {
        if node.matches(selector) {
            f(node);
        }
        visit_mut(&mut node.children, selector, f);
    }
}

#[derive(Debug, Default)]
pub struct Surface {
    root: Vec<Node>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Drops the whole current tree, listeners included, and mounts `nodes`.
    pub fn replace_children(&mut self, nodes: Vec<Node>) {
        self.root = nodes;
    }

    pub fn query(&self, selector: &Selector) -> Option<&Node> {
        find(&self.root, selector)
    }

    pub fn query_mut(&mut self, selector: &Selector) -> Option<&mut Node> {
        find_mut(&mut self.root, selector)
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<&Node> {
        let mut out = Vec::new();
        collect(&self.root, selector, &mut out);
        out
    }

    pub fn for_each_mut(&mut self, selector: &Selector, mut f: impl FnMut(&mut Node)) {
        visit_mut(&mut self.root, selector, &mut f);
    }

    pub fn text(&self, selector: &Selector) -> Option<&str> {
        self.query(selector).map(|node| node.text.as_str())
    }

    pub fn attr(&self, selector: &Selector, key: &str) -> Option<&str> {
        self.query(selector)?.attrs.get(key).map(String::as_str)
    }

    pub fn set_text(&mut self, selector: &Selector, text: impl Into<String>) -> bool {
        match self.query_mut(selector) {
            Some(node) => {
                node.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_attr(&mut self, selector: &Selector, key: &str, value: impl Into<String>) -> bool {
        match self.query_mut(selector) {
            Some(node) => {
                node.attrs.insert(key.into(), value.into());
                true
            }
            None => false,
        }
    }

    /// Attaches `listener` to the first match, if there is one.
    pub fn on_click(&mut self, selector: &Selector, listener: Listener) -> bool {
        match self.query_mut(selector) {
            Some(node) => {
                node.add_listener(listener);
                true
            }
            None => false,
        }
    }

    /// Fires the click listeners of the first match. Returns whether it existed.
    pub fn click(&self, selector: &Selector) -> bool {
        let Some(node) = self.query(selector) else {
            return false;
        };
        let listeners = node.listeners.clone();
        for listener in listeners {
            listener();
        }
        true
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.root {
            node.write_markup(&mut out);
        }
        out
    }
}
