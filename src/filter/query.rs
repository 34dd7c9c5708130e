//! Query string encoding and decoding of [FilterState].
//!
//! The same encoding is used for the address bar and for the backend request,
//! so the backend sees exactly what the user sees in the URL.

use super::state::{DateMode, FilterState, TransactionType, TypeSelection, non_empty};

/// The query parameters understood by the filters, including the legacy `day`.
pub const RECOGNIZED_PARAMS: [&str; 9] = [
    "year", "month", "start", "end", "type", "category", "q", "dateMode", "day",
];

/// The `type` value sent when no transaction type is selected.
///
/// Without it an empty selection would encode the same as a full one, since a
/// missing `type` parameter means "every type".
pub const NO_TYPES_SENTINEL: &str = "none";

/// The key/value pairs of a query string, in order and with repeated keys kept.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pairs: Vec<(String, String)>,
}

impl FilterParams {
    /// Parse a query string without the leading `?`.
    ///
    /// An unparsable query string is treated as empty.
    pub fn parse(query: &str) -> Self {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .inspect_err(|error| tracing::warn!("could not parse query string {query:?}: {error}"))
            .unwrap_or_default();

        Self { pairs }
    }

    /// Whether any recognized filter parameter is present, even with an empty value.
    pub fn has_filters(&self) -> bool {
        self.pairs
            .iter()
            .any(|(key, _)| RECOGNIZED_PARAMS.contains(&key.as_str()))
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Build the filter state described by these parameters.
    ///
    /// Missing parameters are left empty, except `type` where a missing
    /// parameter selects every type. A legacy `day` is read as a one day range.
    pub fn to_state(&self) -> FilterState {
        let mut start = non_empty(self.first("start"));
        let mut end = non_empty(self.first("end"));
        let mut date_mode = self.first("dateMode").and_then(DateMode::from_query_value);

        if start.is_none() && end.is_none() {
            if let Some(day) = non_empty(self.first("day")) {
                start = Some(day.clone());
                end = Some(day);
                date_mode = Some(DateMode::Range);
            }
        }

        let date_mode = date_mode.unwrap_or(if start.is_some() || end.is_some() {
            DateMode::Range
        } else {
            DateMode::Ym
        });

        FilterState {
            date_mode,
            year: non_empty(self.first("year")),
            month: self.first("month").map(|month| month.trim().to_owned()),
            start,
            end,
            types: self.type_selection(),
            category: non_empty(self.first("category")),
            q: non_empty(self.first("q")),
        }
    }

    fn type_selection(&self) -> TypeSelection {
        let mut values = self.all("type").peekable();

        if values.peek().is_none() {
            return TypeSelection::all();
        }

        values
            .filter(|value| *value != NO_TYPES_SENTINEL)
            .filter_map(TransactionType::from_query_value)
            .collect()
    }
}

/// Decode `query` into a filter state.
///
/// Returns `None` if the query string carries no recognized filter parameter,
/// in which case callers should fall back to the defaults.
pub fn decode(query: &str) -> Option<FilterState> {
    let params = FilterParams::parse(query);

    params.has_filters().then(|| params.to_state())
}

/// Encode `state` as a query string without the leading `?`.
pub fn encode(state: &FilterState) -> String {
    let mut pairs: Vec<(&str, &str)> = vec![("dateMode", state.date_mode.as_query_value())];

    if let Some(year) = state.year.as_deref().filter(|year| !year.is_empty()) {
        pairs.push(("year", year));
    }

    // An empty month is kept, it means "all months".
    if let Some(month) = state.month.as_deref() {
        pairs.push(("month", month));
    }

    if let Some(start) = state.start.as_deref().filter(|start| !start.is_empty()) {
        pairs.push(("start", start));
    }

    if let Some(end) = state.end.as_deref().filter(|end| !end.is_empty()) {
        pairs.push(("end", end));
    }

    if state.types.is_empty() {
        pairs.push(("type", NO_TYPES_SENTINEL));
    } else if !state.types.is_all() {
        pairs.extend(
            state
                .types
                .iter()
                .map(|transaction_type| ("type", transaction_type.as_query_value())),
        );
    }

    if let Some(category) = state.category.as_deref().filter(|value| !value.is_empty()) {
        pairs.push(("category", category));
    }

    if let Some(q) = state.q.as_deref().filter(|value| !value.is_empty()) {
        pairs.push(("q", q));
    }

    serde_urlencoded::to_string(&pairs)
        .inspect_err(|error| tracing::error!("could not encode filters {state:?}: {error}"))
        .unwrap_or_default()
}
