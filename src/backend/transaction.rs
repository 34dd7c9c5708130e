//! The transaction records served by the backend.

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::SerializeMap,
};

/// A transaction as returned by `GET /api/transactions`.
///
/// Records are displayed as received, only [Transaction::amount] is
/// normalised so that a missing or null amount reads as zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    /// The backend ID of the transaction.
    pub id: i64,
    /// ISO 8601 date or date-time.
    #[serde(default)]
    pub date: String,
    /// The amount in pesos.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub amount: f64,
    /// Where the money was spent.
    #[serde(default)]
    pub merchant: Option<String>,
    /// The transaction type tag, e.g. "debito".
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// User assigned category.
    #[serde(default)]
    pub category: Option<String>,
    /// User assigned description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// The current value of an editable field.
    pub fn field(&self, field: EditableField) -> Option<&str> {
        match field {
            EditableField::Category => self.category.as_deref(),
            EditableField::Description => self.description.as_deref(),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A transaction field that can be edited inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditableField {
    /// The category, used for grouping on the dashboard.
    Category,
    /// The free text description.
    Description,
}

impl EditableField {
    /// The field name used by the backend and in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Description => "description",
        }
    }
}

/// A single field update for `POST /api/update_transaction`.
///
/// Serialises as `{"id": <id>, "<field>": <value>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPatch {
    /// The transaction to update.
    pub id: i64,
    /// The field to update.
    pub field: EditableField,
    /// The new value, which may be empty.
    pub value: String,
}

impl Serialize for TransactionPatch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(self.field.as_str(), &self.value)?;
        map.end()
    }
}
