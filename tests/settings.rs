//! Overriding the process-wide default settings.
//!
//! `DEFAULT_SETTINGS` is shared by the whole test binary, that's why this lives in its own file, with a single test.

use chrono::NaiveDate;

use jalali_picker::config::{PickerSettings, DEFAULT_SETTINGS};
use jalali_picker::memory_document::MemoryDocument;
use jalali_picker::traits::{FixedClock, Offset};
use jalali_picker::{ClickOutcome, Jalaali, PickerController};

#[test]
fn test_new_controllers_use_overridden_defaults() {
    let _ = env_logger::builder().is_test(true).try_init();

    {
        let mut defaults = DEFAULT_SETTINGS.lock().unwrap();
        defaults.input_selector = String::from("input.shamsi");
        defaults.popup_class = String::from("shamsi-calendar");
        defaults.gap_px = 12.0;
    }

    let mut doc = MemoryDocument::new();
    let input = doc.add_input("when", &["shamsi"]);
    let legacy = doc.add_input("old", &["datepicker"]);
    doc.set_geometry(input, Offset { top: 10.0, left: 0.0 }, 20.0);

    let mut picker = PickerController::new(doc, Jalaali::new());
    assert_eq!(picker.settings().input_selector, "input.shamsi");
    assert_eq!(picker.settings().day_class, "day");
    assert_eq!(picker.bind().unwrap(), 1);
    assert!(picker.is_bound(input));
    assert!(picker.is_bound(legacy) == false);

    picker.document().click(input);
    assert_eq!(picker.process_events().unwrap(), vec![ClickOutcome::Opened(input)]);
    let popup = picker.popup_element().unwrap();
    assert!(picker.document().has_class(popup, "shamsi-calendar"));
    assert_eq!(picker.document().style(popup, "top").as_deref(), Some("42px"));

    // Controllers that are already built keep their settings
    DEFAULT_SETTINGS.lock().unwrap().gap_px = 0.0;
    assert_eq!(picker.settings().gap_px, 12.0);

    let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
    let other = PickerController::with_clock(MemoryDocument::new(), Jalaali::new(), clock);
    assert_eq!(other.settings().gap_px, 0.0);
    assert_eq!(other.settings().input_selector, "input.shamsi");

    *DEFAULT_SETTINGS.lock().unwrap() = PickerSettings::default();
    assert_eq!(PickerSettings::current(), PickerSettings::default());
}
