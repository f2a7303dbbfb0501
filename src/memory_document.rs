//! A [`Document`] that only lives in memory
//!
//! This is handy for tests, and to render the picker without a browser.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use crate::render::Node;
use crate::traits::{Document, ElementId, ListenerHandle, ListenerId, Offset, PickerEvent};

#[derive(Clone, Debug, Default)]
struct ElementData {
    node: Node,
    value: String,
    read_only: bool,
    offset: Option<Offset>,
    outer_height: Option<f64>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Debug)]
struct Listener {
    /// The element this listens to, or `None` for the whole document
    element: Option<ElementId>,
    events: Sender<PickerEvent>,
}

/// An in-memory document: a `<body>` element and whatever gets added to it
#[derive(Debug)]
pub struct MemoryDocument {
    elements: BTreeMap<ElementId, ElementData>,
    body: ElementId,
    next_id: u64,

    listeners: Rc<RefCell<BTreeMap<ListenerId, Listener>>>,
    next_listener: u64,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document with an empty body
    pub fn new() -> Self {
        let body = ElementId(0);
        let mut elements = BTreeMap::new();
        elements.insert(body, ElementData { node: Node::new("body"), ..ElementData::default() });
        Self {
            elements,
            body,
            next_id: 1,
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_listener: 0,
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Add an `<input>` to the body, with an `id` and some classes
    pub fn add_input(&mut self, id: &str, classes: &[&str]) -> ElementId {
        let node = classes.iter().fold(Node::new("input").attr("id", id), |node, class| node.class(class));
        self.append_to_body(node)
    }

    /// Simulate a layout for an element
    pub fn set_geometry(&mut self, element: ElementId, offset: Offset, outer_height: f64) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.offset = Some(offset);
            data.outer_height = Some(outer_height);
        }
    }

    /// Whether this element is (still) part of the document
    pub fn exists(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    pub fn text(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).and_then(|data| data.node.text.clone())
    }

    pub fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.elements.get(&element).and_then(|data| {
            data.node.style.iter()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone())
        })
    }

    pub fn is_read_only(&self, element: ElementId) -> bool {
        self.elements.get(&element).map(|data| data.read_only).unwrap_or(false)
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements.get(&element).map(|data| data.node.has_class(class)).unwrap_or(false)
    }

    /// Number of document-level listeners that are currently attached
    pub fn document_listeners(&self) -> usize {
        self.listeners.borrow().values().filter(|l| l.element.is_none()).count()
    }

    /// Number of listeners that are currently attached to elements
    pub fn element_listeners(&self) -> usize {
        self.listeners.borrow().values().filter(|l| l.element.is_some()).count()
    }

    /// Simulate a user click on an element.
    ///
    /// Listeners of the element (and of its ancestors) are notified first, then the document-level listeners.
    /// Returns the number of listeners that have been notified.
    pub fn click(&self, target: ElementId) -> usize {
        if self.exists(target) == false {
            log::warn!("Clicking on {:?}, which is not part of the document", target);
            return 0;
        }

        let listeners = self.listeners.borrow();
        let on_elements = listeners.values()
            .filter_map(|l| l.element.map(|el| (el, l)))
            .filter(|(el, _)| self.contains(*el, target))
            .map(|(el, l)| (PickerEvent::Activated(el), l));
        let on_document = listeners.iter()
            .filter(|(_, l)| l.element.is_none())
            .map(|(id, l)| (PickerEvent::DocumentClick { listener: *id, target }, l));

        let mut n_notified = 0;
        for (event, listener) in on_elements.chain(on_document) {
            match listener.events.send(event) {
                Ok(()) => n_notified += 1,
                Err(_) => log::debug!("Nobody is receiving {:?} anymore", event),
            }
        }
        n_notified
    }

    fn listen(&mut self, element: Option<ElementId>, events: Sender<PickerEvent>) -> ListenerHandle {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.borrow_mut().insert(id, Listener { element, events });

        let listeners = Rc::downgrade(&self.listeners);
        ListenerHandle::new(id, move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().remove(&id);
            }
        })
    }

    /// Serializes an element and its descendants as HTML
    pub fn to_html(&self, element: ElementId) -> Option<String> {
        self.to_node(element).map(|node| node.to_html())
    }

    fn to_node(&self, element: ElementId) -> Option<Node> {
        let data = self.elements.get(&element)?;
        let mut node = data.node.clone();
        node.children = data.children.iter()
            .filter_map(|child| self.to_node(*child))
            .collect();
        Some(node)
    }

    fn insert(&mut self, mut node: Node, parent: ElementId) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        let children = std::mem::take(&mut node.children);
        self.elements.insert(id, ElementData { node, parent: Some(parent), ..ElementData::default() });
        if let Some(parent_data) = self.elements.get_mut(&parent) {
            parent_data.children.push(id);
        }

        for child in children {
            self.insert(child, id);
        }
        id
    }

    fn descendants(&self, element: ElementId, out: &mut Vec<ElementId>) {
        if let Some(data) = self.elements.get(&element) {
            for child in &data.children {
                out.push(*child);
                self.descendants(*child, out);
            }
        }
    }

    fn matches(&self, element: ElementId, selector: &str) -> bool {
        let node = match self.elements.get(&element) {
            None => return false,
            Some(data) => &data.node,
        };

        if let Some(id) = selector.strip_prefix('#') {
            return node.get_attr("id") == Some(id);
        }

        let mut parts = selector.split('.');
        let tag = parts.next().unwrap_or("");
        if tag.is_empty() == false && tag != node.tag {
            return false;
        }
        parts.all(|class| node.has_class(class))
    }
}

impl Document for MemoryDocument {
    /// Supports `tag`, `.class`, `tag.class` (and chained classes) and `#id`
    fn select_all(&self, selector: &str) -> Vec<ElementId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Vec::new();
        }

        let mut all = Vec::new();
        self.descendants(self.body, &mut all);
        all.into_iter()
            .filter(|el| self.matches(*el, selector))
            .collect()
    }

    fn value(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).map(|data| data.value.clone())
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.value = value.to_string();
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.elements.get(&element)
            .and_then(|data| data.node.get_attr(name))
            .map(String::from)
    }

    fn set_read_only(&mut self, element: ElementId, read_only: bool) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.read_only = read_only;
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(data) = self.elements.get_mut(&element) {
            data.node.style.retain(|(p, _)| p != property);
            data.node.style.push((property.to_string(), value.to_string()));
        }
    }

    fn offset(&self, element: ElementId) -> Option<Offset> {
        self.elements.get(&element).and_then(|data| data.offset)
    }

    fn outer_height(&self, element: ElementId) -> Option<f64> {
        self.elements.get(&element).and_then(|data| data.outer_height)
    }

    fn append_to_body(&mut self, node: Node) -> ElementId {
        let body = self.body;
        self.insert(node, body)
    }

    fn remove(&mut self, element: ElementId) {
        if element == self.body {
            log::warn!("Refusing to remove the document body");
            return;
        }

        let mut doomed = vec![element];
        self.descendants(element, &mut doomed);

        let parent = self.elements.get(&element).and_then(|data| data.parent);
        if let Some(parent_data) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent_data.children.retain(|child| *child != element);
        }
        for el in doomed {
            self.elements.remove(&el);
        }
    }

    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool {
        let mut current = Some(target);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.elements.get(&el).and_then(|data| data.parent);
        }
        false
    }

    fn listen_activation(&mut self, element: ElementId, events: Sender<PickerEvent>) -> ListenerHandle {
        self.listen(Some(element), events)
    }

    fn listen_document_clicks(&mut self, events: Sender<PickerEvent>) -> ListenerHandle {
        self.listen(None, events)
    }
}
