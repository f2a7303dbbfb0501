//! This crate provides a Jalali (Persian) calendar date picker for date inputs.
//!
//! A [`PickerController`](controller::PickerController) attaches to the inputs of a [`Document`](traits::Document) that match a selector.
//! Activating one of these inputs opens a popup showing the current Jalali month, right below the input. \
//! Clicking a day writes it into the input as `YYYY/MM/DD`, clicking anywhere else closes the popup.
//!
//! Date arithmetic is delegated to a [`DateConverter`](traits::DateConverter), the [`Jalaali`] converter (backed by the `jelal` crate) is provided. \
//! The page can be a browser DOM, or a [`MemoryDocument`](memory_document::MemoryDocument) for headless use.

pub mod traits;

mod date;
pub use date::JalaliDate;
pub mod conversion;
pub use conversion::Jalaali;
pub mod calendar;
pub use calendar::CalendarView;
pub mod render;
pub mod controller;
pub use controller::PickerController;
pub use controller::ClickOutcome;
pub use traits::PickerEvent;

pub mod memory_document;
pub mod config;
pub mod utils;
