//! The collaborators a [`PickerController`](crate::controller::PickerController) is built upon

use std::error::Error;
use std::fmt::{Debug, Formatter};
use std::sync::mpsc::Sender;

use chrono::NaiveDate;

use crate::date::JalaliDate;
use crate::render::Node;

/// Converts dates between the Gregorian and the Jalali calendars
pub trait DateConverter {
    /// Returns the Jalali date matching a Gregorian date
    fn to_jalali(&self, date: NaiveDate) -> Result<JalaliDate, Box<dyn Error>>;
    /// Returns the Gregorian date matching a Jalali date
    fn to_gregorian(&self, date: JalaliDate) -> Result<NaiveDate, Box<dyn Error>>;
    /// Returns the number of days (28 to 31) in a Jalali month
    fn month_length(&self, year: i32, month: u8) -> Result<u8, Box<dyn Error>>;

    /// Whether this converter can be used at all.
    /// Converters backed by something external (e.g. a script loaded by the page) may return false when it is missing.
    fn is_available(&self) -> bool {
        true
    }
}

/// Tells what day it is
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The system clock, in the local timezone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock that is stuck on a given day
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}


/// An opaque reference to an element of a [`Document`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// The position of an element, relative to the document
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

/// Identifies a listener attached to a [`Document`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// What the listeners of a [`Document`] report to the picker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// A bound input has been activated (clicked)
    Activated(ElementId),
    /// A click happened somewhere in the document, and has been caught by a document-level listener
    DocumentClick { listener: ListenerId, target: ElementId },
}

/// Keeps a listener attached.
///
/// Dropping this handle detaches the listener.
pub struct ListenerHandle {
    id: ListenerId,
    detach: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
    pub fn new<F: FnOnce() + 'static>(id: ListenerId, detach: F) -> Self {
        Self { id, detach: Some(Box::new(detach)) }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Detach the listener now
    pub fn release(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl Debug for ListenerHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "ListenerHandle({:?}, attached: {})", self.id, self.detach.is_some())
    }
}


/// The page the picker lives in.
///
/// This is usually backed by the browser DOM, but see [`MemoryDocument`](crate::memory_document::MemoryDocument) for a headless implementation.
pub trait Document {
    /// Returns every element that matches a (simple) selector, in document order
    fn select_all(&self, selector: &str) -> Vec<ElementId>;

    fn value(&self, element: ElementId) -> Option<String>;
    fn set_value(&mut self, element: ElementId, value: &str);
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn set_read_only(&mut self, element: ElementId, read_only: bool);
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// The position of an element relative to the document, or `None` in case it is not laid out
    fn offset(&self, element: ElementId) -> Option<Offset>;
    /// The rendered height of an element, borders included, or `None` in case it is not laid out
    fn outer_height(&self, element: ElementId) -> Option<f64>;

    /// Builds a subtree and appends it to the document body. Returns the root of the new subtree
    fn append_to_body(&mut self, node: Node) -> ElementId;
    /// Removes an element and its descendants from the document
    fn remove(&mut self, element: ElementId);
    /// Whether `target` is `ancestor` itself or one of its descendants
    fn contains(&self, ancestor: ElementId, target: ElementId) -> bool;

    /// Starts listening to clicks on an element (and its descendants).
    /// Every such click sends a [`PickerEvent::Activated`] for `element`, as long as the returned handle is alive.
    fn listen_activation(&mut self, element: ElementId, events: Sender<PickerEvent>) -> ListenerHandle;

    /// Starts listening to clicks anywhere in the document.
    /// Every click sends a [`PickerEvent::DocumentClick`] carrying the id of the returned handle, as long as it is alive.
    fn listen_document_clicks(&mut self, events: Sender<PickerEvent>) -> ListenerHandle;
}
