//! Default filter values computed from the current local date.

use time::Date;

use super::state::{DateMode, FilterState, TypeSelection};

/// Date fields for [DateMode::Ym]: the current year and month, unpadded.
pub fn ym_defaults(today: Date) -> FilterState {
    FilterState {
        date_mode: DateMode::Ym,
        year: Some(today.year().to_string()),
        month: Some(u8::from(today.month()).to_string()),
        start: None,
        end: None,
        ..Default::default()
    }
}

/// Date fields for [DateMode::Range]: the first of the current month through today.
pub fn range_defaults(today: Date) -> FilterState {
    FilterState {
        date_mode: DateMode::Range,
        year: None,
        month: None,
        start: Some(format!(
            "{:04}-{:02}-01",
            today.year(),
            u8::from(today.month())
        )),
        end: Some(today.to_string()),
        ..Default::default()
    }
}

/// Date fields for `mode`.
pub fn dates_for_mode(mode: DateMode, today: Date) -> FilterState {
    match mode {
        DateMode::Ym => ym_defaults(today),
        DateMode::Range => range_defaults(today),
    }
}

/// The state used when the URL carries no filter parameters.
pub fn initial_state(today: Date) -> FilterState {
    FilterState {
        types: TypeSelection::all(),
        ..ym_defaults(today)
    }
}
