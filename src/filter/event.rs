//! Discrete filter events emitted by the controls.

use time::Date;

use super::{
    defaults::dates_for_mode,
    query::FilterParams,
    state::FilterState,
};

/// The control name of the date mode radios.
pub const DATE_MODE_CONTROL: &str = "dateMode";
/// The control name of the reset button.
pub const RESET_CONTROL: &str = "reset";

/// Whether a submission by `trigger_name` changes values shown in the controls.
///
/// Date mode changes and resets fill in new dates, so their responses must
/// render the controls again. Other changes only need the results.
pub fn rewrites_controls(trigger_name: Option<&str>) -> bool {
    matches!(trigger_name, Some(DATE_MODE_CONTROL | RESET_CONTROL))
}

/// A change made through the filter controls.
///
/// Each variant carries every control value as read at the time of the event,
/// never a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// A year, month, date, type, category or search control changed.
    ControlsChanged(FilterState),
    /// The date mode radio changed, the date fields take the new mode's defaults.
    DateModeChanged(FilterState),
    /// The reset button was pressed, the date fields take the current mode's defaults.
    Reset(FilterState),
}

impl FilterEvent {
    /// Build an event from a submission of the filter form.
    ///
    /// `trigger_name` is the name of the control that caused the submission,
    /// as reported by the `HX-Trigger-Name` header.
    pub fn from_submission(trigger_name: Option<&str>, query: &str) -> Self {
        let controls = FilterParams::parse(query).to_state();

        match trigger_name {
            Some(DATE_MODE_CONTROL) => Self::DateModeChanged(controls),
            Some(RESET_CONTROL) => Self::Reset(controls),
            _ => Self::ControlsChanged(controls),
        }
    }

    /// Produce the state that results from this event.
    pub fn reduce(self, today: Date) -> FilterState {
        match self {
            Self::ControlsChanged(controls) => controls,
            Self::DateModeChanged(controls) | Self::Reset(controls) => {
                let mode = controls.date_mode;
                controls.with_dates_from(dates_for_mode(mode, today))
            }
        }
    }
}
