//! Inline editing of a transaction's category or description.
//!
//! Double-clicking a cell swaps in a text input. Leaving the input or pressing
//! Enter posts the value once and swaps the display cell back in with the new
//! value, whether or not the backend accepted it. A failed update also shows
//! an error alert.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    alert::Alert,
    app_state::ViewState,
    backend::{EditableField, TransactionPatch, UpdateOutcome},
    endpoints::{self, format_endpoint},
    html::{FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE},
};

/// The current or new value of an edited field.
#[derive(Debug, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub value: String,
}

fn cell_id(id: i64, field: EditableField) -> String {
    format!("transaction-{id}-{}", field.as_str())
}

fn field_url(endpoint: &str, id: i64, field: EditableField) -> String {
    format_endpoint(&format_endpoint(endpoint, id), field.as_str())
}

/// The table cell showing `value`. Double-click to edit.
pub(super) fn field_cell(id: i64, field: EditableField, value: &str) -> Markup {
    let edit_url = field_url(endpoints::EDIT_TRANSACTION_FIELD_VIEW, id, field);
    let current_value = serde_json::json!({ "value": value }).to_string();

    html! {
        td
            id=(cell_id(id, field))
            class={ (TABLE_CELL_STYLE) " cursor-pointer" }
            data-field=(field.as_str())
            title="Double-click to edit"
            hx-get=(edit_url)
            hx-trigger="dblclick"
            hx-vals=(current_value)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            (value)
        }
    }
}

fn field_editor(id: i64, field: EditableField, value: &str) -> Markup {
    let save_url = field_url(endpoints::TRANSACTION_FIELD, id, field);

    html! {
        td id=(cell_id(id, field)) class=(TABLE_CELL_STYLE) data-field=(field.as_str())
        {
            input
                type="text"
                name="value"
                value=(value)
                aria-label=(field.as_str())
                autofocus
                hx-post=(save_url)
                hx-trigger="blur, keyup[key=='Enter']"
                hx-target="closest td"
                hx-swap="outerHTML"
                hx-sync="this:drop"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// Get the inline editor for one field, filled with its current value.
pub async fn get_field_editor(
    Path((id, field)): Path<(i64, EditableField)>,
    Query(current): Query<FieldValue>,
) -> Markup {
    field_editor(id, field, &current.value)
}

/// Save one field and return the display cell with the new value.
pub async fn update_transaction_field(
    State(state): State<ViewState>,
    Path((id, field)): Path<(i64, EditableField)>,
    headers: HeaderMap,
    Form(new): Form<FieldValue>,
) -> Response {
    let patch = TransactionPatch {
        id,
        field,
        value: new.value,
    };

    let outcome = state
        .backend
        .for_session(headers.get(COOKIE))
        .update_transaction(&patch)
        .await;
    let cell = field_cell(id, field, &patch.value);

    match outcome {
        UpdateOutcome::Saved => cell.into_response(),
        UpdateOutcome::Unauthenticated => {
            (HxRedirect(state.log_in_url), StatusCode::OK).into_response()
        }
        UpdateOutcome::Failed(message) => {
            let alert = Alert::ErrorSimple { message }.into_html();

            html! {
                (cell)
                (alert)
            }
            .into_response()
        }
    }
}
