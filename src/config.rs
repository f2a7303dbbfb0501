//! Support for library configuration options

use std::error::Error;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The settings a new [`PickerController`](crate::controller::PickerController) starts with.
/// Feel free to override them when initing this library.
pub static DEFAULT_SETTINGS: Lazy<Arc<Mutex<PickerSettings>>> = Lazy::new(|| Arc::new(Mutex::new(PickerSettings::default())));

/// How the picker finds its inputs, and how it styles its popup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Selector of the inputs that get a picker
    pub input_selector: String,
    /// Class of the popup root element
    pub popup_class: String,
    /// Class of every day cell
    pub day_class: String,
    /// Extra class of the cell for today
    pub today_class: String,
    /// Vertical space between the input and the popup, in pixels
    pub gap_px: f64,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            input_selector: String::from(".datepicker"),
            popup_class: String::from("jalali-calendar"),
            day_class: String::from("day"),
            today_class: String::from("today"),
            gap_px: 4.0,
        }
    }
}

impl PickerSettings {
    /// Read settings from a JSON object. Missing keys keep their default values
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(json)?)
    }

    /// A copy of the current [`DEFAULT_SETTINGS`]
    pub fn current() -> Self {
        match DEFAULT_SETTINGS.lock() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => {
                log::warn!("Default settings lock is poisoned, using its last value");
                poisoned.into_inner().clone()
            },
        }
    }
}
