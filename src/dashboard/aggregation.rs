//! Groups transactions by category for the dashboard charts.

use indexmap::IndexMap;

use crate::backend::Transaction;

/// The category used for transactions without one.
pub(super) const UNCATEGORIZED_LABEL: &str = "otros";

/// The amount spent per category.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct CategoryTotals {
    /// Sum per lowercased category, in the order categories were first seen.
    pub by_category: IndexMap<String, f64>,
    /// Sum of every transaction amount.
    pub total: f64,
}

impl CategoryTotals {
    /// The category names in display order.
    pub fn labels(&self) -> Vec<String> {
        self.by_category.keys().cloned().collect()
    }

    /// The sums in display order.
    pub fn values(&self) -> Vec<f64> {
        self.by_category.values().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// Sum transaction amounts per category.
///
/// Categories are compared case-insensitively by lowercasing them. Missing or
/// empty categories are counted as [UNCATEGORIZED_LABEL].
pub(super) fn aggregate_by_category(transactions: &[Transaction]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();

    for transaction in transactions {
        let category = transaction
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED_LABEL)
            .to_lowercase();

        *totals.by_category.entry(category).or_insert(0.0) += transaction.amount;
        totals.total += transaction.amount;
    }

    totals
}

/// The hue in degrees for `category`.
///
/// Computed from a 32-bit rolling hash over the UTF-16 code units so that a
/// category keeps its colour across page loads.
pub(super) fn category_hue(category: &str) -> u16 {
    let hash = category.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    });

    (i64::from(hash).abs() % 360) as u16
}

/// The CSS colour for `category`.
pub(super) fn color_for_category(category: &str) -> String {
    format!("hsl({}, 70%, 55%)", category_hue(category))
}

#[cfg(test)]
mod tests {
    use crate::backend::Transaction;

    use super::{aggregate_by_category, category_hue, color_for_category};

    fn transaction(category: Option<&str>, amount: f64) -> Transaction {
        Transaction {
            id: 0,
            date: "2025-06-01".to_owned(),
            amount,
            merchant: None,
            transaction_type: None,
            category: category.map(str::to_owned),
            description: None,
        }
    }

    #[test]
    fn sums_amounts_per_category() {
        let transactions = [
            transaction(Some("comida"), 1000.0),
            transaction(Some("comida"), 500.0),
            transaction(Some("otros"), 200.0),
        ];

        let got = aggregate_by_category(&transactions);

        assert_eq!(got.labels(), ["comida", "otros"]);
        assert_eq!(got.values(), [1500.0, 200.0]);
        assert_eq!(got.total, 1700.0);
    }

    #[test]
    fn missing_categories_are_grouped_as_otros() {
        let transactions = [
            transaction(None, 100.0),
            transaction(Some(""), 50.0),
            transaction(Some("Transporte"), 30.0),
            transaction(Some("OTROS"), 20.0),
        ];

        let got = aggregate_by_category(&transactions);

        assert_eq!(got.labels(), ["otros", "transporte"]);
        assert_eq!(got.values(), [170.0, 30.0]);
    }

    #[test]
    fn keeps_first_seen_order() {
        let transactions = [
            transaction(Some("salud"), 1.0),
            transaction(Some("comida"), 1.0),
            transaction(Some("Salud"), 1.0),
        ];

        assert_eq!(aggregate_by_category(&transactions).labels(), ["salud", "comida"]);
    }

    #[test]
    fn empty_input_has_zero_total() {
        let got = aggregate_by_category(&[]);

        assert!(got.is_empty());
        assert_eq!(got.total, 0.0);
    }

    #[test]
    fn hue_matches_known_values() {
        assert_eq!(category_hue("comida"), 235);
        assert_eq!(category_hue("otros"), 297);
        assert_eq!(category_hue("transporte"), 188);
        assert_eq!(category_hue("café"), 321);
        assert_eq!(category_hue(""), 0);
    }

    #[test]
    fn color_is_stable() {
        assert_eq!(color_for_category("comida"), "hsl(235, 70%, 55%)");
        assert_eq!(color_for_category("comida"), color_for_category("comida"));
    }
}
