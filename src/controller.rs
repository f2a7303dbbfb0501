//! The picker itself: binds inputs, opens and closes the calendar popup
//!
//! A [`PickerController`] is either closed, or open with exactly one popup. It owns that popup
//! and the document-level click listener that goes with it, so that every way of closing it
//! removes both.
//!
//! Listeners registered on the [`Document`] report to the controller through a channel.
//! The host calls [`PickerController::process_events`] to act upon what they reported.

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::calendar::CalendarView;
use crate::config::PickerSettings;
use crate::render::{render_popup, Position, DAY_ATTRIBUTE};
use crate::traits::{Clock, DateConverter, Document, ElementId, ListenerHandle, ListenerId, PickerEvent, SystemClock};

/// What an event did to the picker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The calendar has been opened for this input
    Opened(ElementId),
    /// The click did not change anything (a click on the input, on a non-day part of the popup, or caught by a listener that has been detached since)
    Ignored,
    /// A day has been picked, and this value has been written into the input
    Selected(String),
    /// The click happened outside the popup and its input, the popup has been closed
    Dismissed,
}

/// The popup that is currently displayed
#[derive(Debug)]
struct OpenPopup {
    anchor: ElementId,
    element: ElementId,
    view: CalendarView,
    /// Dropping this detaches the outside-click listener
    listener: ListenerHandle,
}

pub struct PickerController<D, C, K = SystemClock>
where
    D: Document,
    C: DateConverter,
    K: Clock,
{
    document: D,
    converter: C,
    clock: K,
    settings: PickerSettings,

    sender: Sender<PickerEvent>,
    events: Receiver<PickerEvent>,

    /// Bound inputs, and the listener that activates the picker for each of them
    bound: BTreeMap<ElementId, ListenerHandle>,
    open: Option<OpenPopup>,
}

impl<D, C> PickerController<D, C, SystemClock>
where
    D: Document,
    C: DateConverter,
{
    /// Create a controller that uses the system clock and the current [`DEFAULT_SETTINGS`](crate::config::DEFAULT_SETTINGS)
    pub fn new(document: D, converter: C) -> Self {
        Self::with_clock(document, converter, SystemClock)
    }
}

impl<D, C, K> PickerController<D, C, K>
where
    D: Document,
    C: DateConverter,
    K: Clock,
{
    pub fn with_clock(document: D, converter: C, clock: K) -> Self {
        Self::with_settings(document, converter, clock, PickerSettings::current())
    }

    pub fn with_settings(document: D, converter: C, clock: K, settings: PickerSettings) -> Self {
        let (sender, events) = mpsc::channel();
        Self {
            document, converter, clock, settings,
            sender, events,
            bound: BTreeMap::new(),
            open: None,
        }
    }

    pub fn document(&self) -> &D { &self.document }
    pub fn document_mut(&mut self) -> &mut D { &mut self.document }
    pub fn settings(&self) -> &PickerSettings { &self.settings }

    /// Attach the picker to every input that matches the configured selector.
    ///
    /// Bound inputs get an activation listener, and become read-only with a pointer cursor, so that the picker is the only way to fill them.
    /// This fails without touching any input in case the date converter is not available.
    /// Returns the number of newly bound inputs.
    pub fn bind(&mut self) -> Result<usize, Box<dyn Error>> {
        if self.converter.is_available() == false {
            log::error!("No date converter is available, date inputs will not get a calendar");
            return Err("Date converter is not available".into());
        }

        let inputs = self.document.select_all(&self.settings.input_selector);
        let mut n_new = 0;
        for input in inputs {
            if self.bound.contains_key(&input) {
                continue;
            }
            self.document.set_read_only(input, true);
            self.document.set_style(input, "cursor", "pointer");
            let listener = self.document.listen_activation(input, self.sender.clone());
            self.bound.insert(input, listener);
            n_new += 1;
        }
        log::debug!("Bound {} date input(s) matching {:?}", n_new, self.settings.input_selector);
        Ok(n_new)
    }

    pub fn is_bound(&self, input: ElementId) -> bool {
        self.bound.contains_key(&input)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// The input the open popup belongs to
    pub fn open_anchor(&self) -> Option<ElementId> {
        self.open.as_ref().map(|open| open.anchor)
    }

    /// The root element of the open popup
    pub fn popup_element(&self) -> Option<ElementId> {
        self.open.as_ref().map(|open| open.element)
    }

    /// The month the open popup displays
    pub fn current_view(&self) -> Option<&CalendarView> {
        self.open.as_ref().map(|open| &open.view)
    }

    /// Act upon everything the listeners reported since the last call, in order.
    ///
    /// In case an activation fails, the events that follow it are left for the next call.
    pub fn process_events(&mut self) -> Result<Vec<ClickOutcome>, Box<dyn Error>> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            let outcome = match event {
                PickerEvent::Activated(input) => {
                    self.activate(input)?;
                    ClickOutcome::Opened(input)
                },
                PickerEvent::DocumentClick { listener, target } => self.on_document_click(listener, target),
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Open the calendar for a bound input, showing the current month.
    ///
    /// Any popup that was already open is closed first, even in case this fails.
    pub fn activate(&mut self, input: ElementId) -> Result<(), Box<dyn Error>> {
        if self.is_bound(input) == false {
            return Err(format!("Element {:?} is not a bound date input", input).into());
        }
        self.close();

        let today = self.converter.to_jalali(self.clock.today())?;
        let view = CalendarView::current(&self.converter, today)?;

        let position = Position::below(
            self.document.offset(input),
            self.document.outer_height(input),
            self.settings.gap_px,
        );
        let popup = render_popup(&view, position, &self.settings);
        let element = self.document.append_to_body(popup);
        let listener = self.document.listen_document_clicks(self.sender.clone());

        log::debug!("Opened calendar for {:?}: {}/{} (today: {})", input, view.year(), view.month(), today);
        self.open = Some(OpenPopup { anchor: input, element, view, listener });
        Ok(())
    }

    /// A click has been caught by a document-level listener
    fn on_document_click(&mut self, listener: ListenerId, target: ElementId) -> ClickOutcome {
        let (anchor, element) = match &self.open {
            Some(open) if open.listener.id() == listener => (open.anchor, open.element),
            _ => {
                log::debug!("Ignoring a click caught by {:?}, which is not attached anymore", listener);
                return ClickOutcome::Ignored;
            },
        };

        if self.document.contains(element, target) {
            return self.select(target);
        }
        if self.document.contains(anchor, target) {
            return ClickOutcome::Ignored;
        }

        log::debug!("Click outside of the calendar, closing it");
        self.close();
        ClickOutcome::Dismissed
    }

    /// Handle a click inside the popup. Only day cells do something
    fn select(&mut self, target: ElementId) -> ClickOutcome {
        let day = match self.document.attribute(target, DAY_ATTRIBUTE).and_then(|d| d.parse::<u8>().ok()) {
            None => return ClickOutcome::Ignored,
            Some(day) => day,
        };

        let (anchor, date) = match &self.open {
            None => return ClickOutcome::Ignored,
            Some(open) => match open.view.date_of(day) {
                None => {
                    log::warn!("Clicked on day {}, which is not part of the displayed month", day);
                    return ClickOutcome::Ignored;
                },
                Some(date) => (open.anchor, date),
            },
        };

        let value = date.to_string();
        self.document.set_value(anchor, &value);
        log::debug!("Picked {} for {:?}", value, anchor);
        self.close();
        ClickOutcome::Selected(value)
    }

    /// Remove the popup (if any) and detach its listener
    pub fn close(&mut self) {
        if let Some(open) = self.open.take() {
            self.document.remove(open.element);
            // `open` is dropped here, and its listener with it
        }
    }
}

impl<D, C, K> Drop for PickerController<D, C, K>
where
    D: Document,
    C: DateConverter,
    K: Clock,
{
    fn drop(&mut self) {
        self.close();
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    use crate::conversion::Jalaali;
    use crate::memory_document::MemoryDocument;
    use crate::traits::{FixedClock, Offset};

    type TestController = PickerController<MemoryDocument, Jalaali, FixedClock>;

    fn controller() -> (TestController, ElementId) {
        let mut doc = MemoryDocument::new();
        let input = doc.add_input("birth", &["datepicker"]);
        doc.set_geometry(input, Offset { top: 100.0, left: 20.0 }, 30.0);
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        let mut ctrl = PickerController::with_settings(doc, Jalaali::new(), clock, PickerSettings::default());
        assert_eq!(ctrl.bind().unwrap(), 1);
        (ctrl, input)
    }

    /// Clicks somewhere in the document, then lets the controller act upon it
    fn click(ctrl: &mut TestController, target: ElementId) -> Vec<ClickOutcome> {
        ctrl.document().click(target);
        ctrl.process_events().unwrap()
    }

    #[test]
    fn test_bind_is_idempotent() {
        let (mut ctrl, input) = controller();
        assert_eq!(ctrl.bind().unwrap(), 0);
        assert!(ctrl.is_bound(input));
        assert!(ctrl.document().is_read_only(input));
        assert_eq!(ctrl.document().style(input, "cursor").as_deref(), Some("pointer"));
        assert_eq!(ctrl.document().element_listeners(), 1);
    }

    #[test]
    fn test_open_and_position() {
        let (mut ctrl, input) = controller();
        assert_eq!(click(&mut ctrl, input), vec![ClickOutcome::Opened(input)]);
        assert!(ctrl.is_open());
        assert_eq!(ctrl.open_anchor(), Some(input));

        let popup = ctrl.popup_element().unwrap();
        assert_eq!(ctrl.document().style(popup, "top").as_deref(), Some("134px"));
        assert_eq!(ctrl.document().style(popup, "left").as_deref(), Some("20px"));
        assert_eq!(ctrl.document().document_listeners(), 1);
    }

    #[test]
    fn test_clicks_inside_the_popup_that_are_not_days() {
        let (mut ctrl, input) = controller();
        ctrl.activate(input).unwrap();

        let header = ctrl.document().select_all(".month-name")[0];
        assert_eq!(click(&mut ctrl, header), vec![ClickOutcome::Ignored]);
        let blank = ctrl.document().select_all(".empty")[0];
        assert_eq!(click(&mut ctrl, blank), vec![ClickOutcome::Ignored]);
        assert!(ctrl.is_open());
    }

    #[test]
    fn test_clicking_the_open_input_reopens() {
        let (mut ctrl, input) = controller();
        ctrl.activate(input).unwrap();
        let first_popup = ctrl.popup_element().unwrap();

        // The activation comes first, so the document click is caught by the listener of the popup it replaced
        assert_eq!(click(&mut ctrl, input), vec![ClickOutcome::Opened(input), ClickOutcome::Ignored]);
        assert!(ctrl.is_open());
        assert_ne!(ctrl.popup_element(), Some(first_popup));
        assert_eq!(ctrl.document().select_all(".jalali-calendar").len(), 1);
        assert_eq!(ctrl.document().document_listeners(), 1);
    }

    #[test]
    fn test_activating_unbound_element() {
        let (mut ctrl, _input) = controller();
        let other = ctrl.document_mut().add_input("other", &[]);
        assert!(ctrl.activate(other).is_err());
        assert!(ctrl.is_open() == false);
    }

    #[test]
    fn test_close_releases_everything() {
        let (mut ctrl, input) = controller();
        ctrl.activate(input).unwrap();
        assert_eq!(ctrl.document().document_listeners(), 1);
        ctrl.close();
        assert_eq!(ctrl.document().document_listeners(), 0);
        assert!(ctrl.document().select_all(".jalali-calendar").is_empty());
        // Bound inputs keep their own listener
        assert_eq!(ctrl.document().element_listeners(), 1);
    }

    #[test]
    fn test_click_after_close_reaches_nothing() {
        let (mut ctrl, input) = controller();
        let outside = ctrl.document_mut().add_input("outside", &[]);
        ctrl.activate(input).unwrap();
        ctrl.close();

        // No listener is left to catch it, so nothing is even sent to the controller
        assert_eq!(ctrl.document().click(outside), 0);
        assert!(ctrl.process_events().unwrap().is_empty());
        assert_eq!(ctrl.document().value(outside).as_deref(), Some(""));
    }

    #[test]
    fn test_stale_document_clicks_are_ignored() {
        let (mut ctrl, input) = controller();
        let outside = ctrl.document_mut().add_input("outside", &[]);
        ctrl.activate(input).unwrap();

        // Queued while the first popup was open, processed after it has been replaced
        ctrl.document().click(outside);
        ctrl.activate(input).unwrap();
        assert_eq!(ctrl.process_events().unwrap(), vec![ClickOutcome::Ignored]);
        assert!(ctrl.is_open());
    }
}
