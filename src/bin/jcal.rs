use std::error::Error;

use chrono::Datelike;

use jalali_picker::memory_document::MemoryDocument;
use jalali_picker::traits::{Clock, DateConverter, FixedClock, SystemClock, Offset};
use jalali_picker::{CalendarView, Jalaali, JalaliDate, PickerController};


fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

/// Prints a Jalali month (the current one, or the month of a `YYYY/MM/DD` argument), then the picker popup for it
fn run() -> Result<(), Box<dyn Error>> {
    let converter = Jalaali::new();
    let today = match std::env::args().nth(1) {
        None => converter.to_jalali(SystemClock.today())?,
        Some(arg) => arg.parse::<JalaliDate>()?,
    };
    let view = CalendarView::current(&converter, today)?;
    jalali_picker::utils::print_month(&view);

    let gregorian_today = converter.to_gregorian(today)?;
    log::debug!("{} is {} {}", today, gregorian_today, gregorian_today.weekday());

    let mut document = MemoryDocument::new();
    let input = document.add_input("date", &["datepicker"]);
    document.set_geometry(input, Offset { top: 0.0, left: 0.0 }, 24.0);

    let mut picker = PickerController::with_clock(document, converter, FixedClock(gregorian_today));
    picker.bind()?;
    picker.activate(input)?;
    if let Some(popup) = picker.popup_element() {
        if let Some(html) = picker.document().to_html(popup) {
            println!("\n{}", html);
        }
    }
    Ok(())
}
