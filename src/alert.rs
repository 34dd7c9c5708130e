//! Alerts for displaying error messages to users.
//!
//! Alerts are rendered as the `#alert-container` element with an out-of-band
//! swap, so they can be returned on their own (e.g., as the target of
//! `hx-target-error`) or appended to another fragment.

use maud::{Markup, html};

/// An error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn message(&self) -> &str {
        match self {
            Alert::Error { message, .. } | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Error { details, .. } => Some(details.as_str()).filter(|details| !details.is_empty()),
            Alert::ErrorSimple { .. } => None,
        }
    }

    pub fn into_html(self) -> Markup {
        let text_style = "text-red-800 dark:text-red-400";

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class="flex items-start p-4 rounded border border-red-300 bg-red-50
                        dark:bg-gray-800 dark:border-red-800"
                    role="alert"
                {
                    div class={ "flex-1 " (text_style) }
                    {
                        p class="text-sm font-medium" { (self.message()) }

                        @if let Some(details) = self.details() {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class={ "ms-3 text-sm font-medium " (text_style) }
                        aria-label="Dismiss"
                        onclick="this.closest('#alert-container').replaceChildren()"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}
