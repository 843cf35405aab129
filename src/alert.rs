//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as an out-of-band swap into the `#alert-container`
//! element of the base layout, so any HTMX response can carry one.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message shown in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked, with extra details below the message.
    Success { message: String, details: String },
    /// Something failed, with details on how to fix it.
    Error { message: String, details: String },
    /// Something failed and there is nothing more to say.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                Some(details),
                "p-4 mb-4 rounded-lg border text-green-800 border-green-300 \
                bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                Some(details),
                "p-4 mb-4 rounded-lg border text-red-800 border-red-300 \
                bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "!",
            ),
            Alert::ErrorSimple { message } => (
                message,
                None,
                "p-4 mb-4 rounded-lg border text-red-800 border-red-300 \
                bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "!",
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="flex items-start gap-3"
                    {
                        span class="font-bold" aria-hidden="true" { (icon) }

                        div class="flex-1"
                        {
                            p class="text-sm font-medium" { (message) }

                            @if let Some(details) = details.filter(|details| !details.is_empty()) {
                                p class="mt-1 text-sm opacity-80" { (details) }
                            }
                        }

                        button
                            type="button"
                            class="ms-auto text-sm font-semibold opacity-70 hover:opacity-100"
                            aria-label="Close"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "×"
                        }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
