//! The filter selection shared by the dashboard views.

use std::collections::BTreeSet;

/// Selects whether dates are filtered by a year/month pair or an explicit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    /// Filter by year and (optionally) month.
    #[default]
    Ym,
    /// Filter by a start and end date.
    Range,
}

impl DateMode {
    /// The value used for this mode in query strings and form controls.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ym => "ym",
            Self::Range => "range",
        }
    }

    /// Parse a query string value, returning `None` for unknown values.
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "ym" => Some(Self::Ym),
            "range" => Some(Self::Range),
            _ => None,
        }
    }
}

/// A transaction type tag as understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionType {
    /// A debit card purchase.
    Debito,
    /// A credit card purchase.
    Credito,
    /// A bank transfer.
    Transferencia,
}

impl TransactionType {
    /// Every known transaction type, in display order.
    pub const ALL: [TransactionType; 3] = [Self::Debito, Self::Credito, Self::Transferencia];

    /// The tag used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Debito => "debito",
            Self::Credito => "credito",
            Self::Transferencia => "transferencia",
        }
    }

    /// Parse a query string tag, returning `None` for unknown tags.
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "debito" => Some(Self::Debito),
            "credito" => Some(Self::Credito),
            "transferencia" => Some(Self::Transferencia),
            _ => None,
        }
    }

    /// The human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Debito => "Debit",
            Self::Credito => "Credit",
            Self::Transferencia => "Transfer",
        }
    }
}

/// The set of selected transaction types.
///
/// An empty selection means that no type is selected, it is never a shorthand
/// for "all". Whether every type is selected is only known by comparing the
/// size of the selection with [TransactionType::ALL].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSelection(BTreeSet<TransactionType>);

impl TypeSelection {
    /// A selection containing every transaction type.
    pub fn all() -> Self {
        Self(TransactionType::ALL.into_iter().collect())
    }

    /// A selection containing no transaction types.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Whether every known type is selected.
    pub fn is_all(&self) -> bool {
        self.0.len() == TransactionType::ALL.len()
    }

    /// Whether no type is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `transaction_type` is selected.
    pub fn contains(&self, transaction_type: TransactionType) -> bool {
        self.0.contains(&transaction_type)
    }

    /// Add `transaction_type` to the selection.
    pub fn insert(&mut self, transaction_type: TransactionType) {
        self.0.insert(transaction_type);
    }

    /// The selected types in display order.
    pub fn iter(&self) -> impl Iterator<Item = TransactionType> + '_ {
        self.0.iter().copied()
    }

    /// The text shown on the type dropdown button.
    pub fn summary_label(&self) -> String {
        if self.is_all() {
            return "All".to_owned();
        }

        if self.is_empty() {
            return "None".to_owned();
        }

        self.iter()
            .map(TransactionType::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<TransactionType> for TypeSelection {
    fn from_iter<I: IntoIterator<Item = TransactionType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The authoritative record of the active dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Which date group is active.
    pub date_mode: DateMode,
    /// Four digit year, used in [DateMode::Ym].
    pub year: Option<String>,
    /// Month number without padding, used in [DateMode::Ym].
    ///
    /// `Some("")` means "all months" and is distinct from `None`.
    pub month: Option<String>,
    /// ISO start date, used in [DateMode::Range].
    pub start: Option<String>,
    /// ISO end date, used in [DateMode::Range].
    pub end: Option<String>,
    /// The selected transaction types.
    pub types: TypeSelection,
    /// Category text filter.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

impl FilterState {
    /// Copy the date fields from `dates`, keeping the type, category and
    /// search selections of `self`.
    pub fn with_dates_from(self, dates: FilterState) -> Self {
        Self {
            date_mode: dates.date_mode,
            year: dates.year,
            month: dates.month,
            start: dates.start,
            end: dates.end,
            ..self
        }
    }
}

/// Trim `value` and map empty strings to `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
