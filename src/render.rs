//! Builds the element tree of the calendar popup

use std::fmt::Write;

use serde::Serialize;

use crate::calendar::{CalendarView, Cell, WEEKDAY_HEADERS};
use crate::config::PickerSettings;
use crate::traits::Offset;

/// Attribute of day cells, holding their day of month
pub const DAY_ATTRIBUTE: &str = "data-day";

/// An element that has not been added to a document yet
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Node {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string(), ..Self::default() }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.push((property.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Walks the tree and returns every node that has the given class
    pub fn find_by_class(&self, class: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            found.extend(child.find_by_class(class));
        }
        found
    }

    /// Serializes this tree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if self.classes.is_empty() == false {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.style.is_empty() == false {
            let style: Vec<String> = self.style.iter().map(|(p, v)| format!("{}: {}", p, v)).collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join("; ")));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}


/// Where the popup is displayed, relative to the document
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    /// Right below an anchor element, `gap` pixels apart.
    ///
    /// In case the anchor is not laid out, this falls back to the top-left corner of the document.
    pub fn below(anchor_offset: Option<Offset>, anchor_height: Option<f64>, gap: f64) -> Self {
        match (anchor_offset, anchor_height) {
            (Some(offset), Some(height)) if offset.top.is_finite() && offset.left.is_finite() && height.is_finite() => {
                Self { top: offset.top + height + gap, left: offset.left }
            },
            _ => {
                log::warn!("Anchor geometry is not available, the calendar will be displayed at (0, 0)");
                Self::default()
            },
        }
    }
}


/// Builds the popup for a month
pub fn render_popup(view: &CalendarView, position: Position, settings: &PickerSettings) -> Node {
    let header = Node::new("div")
        .class("calendar-header")
        .child(Node::new("span").class("month-name").text(view.month_name()))
        .child(Node::new("span").class("year").text(&view.year().to_string()));

    let weekdays = WEEKDAY_HEADERS.iter().fold(
        Node::new("div").class("calendar-weekdays"),
        |row, name| row.child(Node::new("div").class("weekday").text(name))
    );

    let mut grid = Node::new("div").class("calendar-days");
    for cell in view.cells() {
        let node = match cell {
            Cell::Blank => Node::new("div").class("empty"),
            Cell::Day { day, today } => {
                let label = day.to_string();
                let mut node = Node::new("div")
                    .class(&settings.day_class)
                    .attr(DAY_ATTRIBUTE, &label)
                    .text(&label);
                if today {
                    node = node.class(&settings.today_class);
                }
                node
            },
        };
        grid = grid.child(node);
    }

    Node::new("div")
        .class(&settings.popup_class)
        .style("position", "absolute")
        .style("top", &format!("{}px", position.top))
        .style("left", &format!("{}px", position.left))
        .child(header)
        .child(weekdays)
        .child(grid)
}
