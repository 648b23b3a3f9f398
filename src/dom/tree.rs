//! Arena-backed mutable document tree.
//!
//! Nodes live in a flat arena and are addressed by index, so edits never
//! invalidate other handles. Detaching a subtree only unlinks it from its
//! parent; the slots stay in the arena but become unreachable. A tree lives
//! for a single patch pass, so slots are never reclaimed.
//!
//! Attributes are kept sorted by name. The underlying parser does not
//! guarantee attribute iteration order, and the write-only-if-changed pass
//! needs serialization to be a fixed point across repeated parses.

/// Handle to a node in a [`DomTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Element tag name plus attributes in canonical (name-sorted) order.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Lowercased tag name.
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element with no attributes.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .binary_search_by(|(k, _)| k.as_str().cmp(name))
            .ok()
            .map(|i| self.attrs[i].1.as_str())
    }

    /// Set an attribute, inserting or overwriting.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.binary_search_by(|(k, _)| k.as_str().cmp(name)) {
            Ok(i) => self.attrs[i].1 = value.to_string(),
            Err(i) => self.attrs.insert(i, (name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        match self.attrs.binary_search_by(|(k, _)| k.as_str().cmp(name)) {
            Ok(i) => {
                self.attrs.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Iterate attributes in canonical order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate the whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check membership in the class list.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class if not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let next = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", &next);
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, class: &str) {
        let next = match self.attr("class") {
            None => return,
            Some(existing) => existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" "),
        };
        self.set_attr("class", &next);
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root. Exactly one per tree, always at the root slot.
    Document,
    /// `<!DOCTYPE name>`.
    Doctype(String),
    /// `<!-- comment -->`.
    Comment(String),
    /// A text node.
    Text(String),
    /// An element.
    Element(ElementData),
}

#[derive(Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The arena tree.
#[derive(Debug)]
pub struct DomTree {
    slots: Vec<Slot>,
}

impl DomTree {
    /// Create an empty tree holding only the document root.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Node payload.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.slots[id.index()].data
    }

    /// Mutable node payload.
    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.slots[id.index()].data
    }

    /// Parent of a node, `None` for the root or a detached node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    /// Children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.index()].children
    }

    /// Append a new node under `parent` and return its handle.
    pub fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.slots[parent.index()].children.push(id);
        id
    }

    /// Unlink a node (and its subtree) from its parent. No-op when already
    /// detached or when called on the root.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.slots[id.index()].parent.take() else {
            return;
        };
        let siblings = &mut self.slots[parent.index()].children;
        if let Some(pos) = siblings.iter().position(|c| *c == id) {
            siblings.remove(pos);
        }
    }

    /// Element payload, if this node is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload, if this node is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.data_mut(id) {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// All descendants of `id` in document (preorder) order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// All descendant elements of `root` with the given tag name.
    pub fn elements_named(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.element(n).map(|el| el.name == name).unwrap_or(false))
            .collect()
    }

    /// First descendant element of `root` with the given tag name.
    pub fn first_descendant_named(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.element(n).map(|el| el.name == name).unwrap_or(false) {
                return Some(n);
            }
            stack.extend(self.children(n).iter().rev().copied());
        }
        None
    }

    /// First element anywhere in the document whose `id` attribute equals
    /// `value`.
    pub fn element_by_id_attr(&self, value: &str) -> Option<NodeId> {
        let root = self.root();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if let Some(el) = self.element(n) {
                if el.attr("id") == Some(value) {
                    return Some(n);
                }
            }
            stack.extend(self.children(n).iter().rev().copied());
        }
        None
    }

    /// Nearest ancestor element (including `id` itself when it is a
    /// matching element) satisfying the predicate.
    pub fn closest<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&ElementData) -> bool,
    {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if let NodeData::Element(el) = self.data(n) {
                if pred(el) {
                    return Some(n);
                }
            }
            cur = self.parent(n);
        }
        None
    }

    /// Concatenated text of `id` and its subtree, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeData::Text(t) = self.data(id) {
            out.push_str(t);
        }
        for n in self.descendants(id) {
            if let NodeData::Text(t) = self.data(n) {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace the children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for c in children {
            self.detach(c);
        }
        self.append(id, NodeData::Text(text.to_string()));
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
