//! Status and connection badge components.

use dioxus::prelude::*;
use dispatch_core::{ConnectionState, JobStatus};

/// Badge for displaying job status.
#[component]
pub fn StatusBadge(status: JobStatus) -> Element {
    let bg_class = match status {
        JobStatus::New => "badge-new",
        JobStatus::Assigned => "badge-assigned",
        JobStatus::InProgress => "badge-in-progress",
        JobStatus::Completed => "badge-completed",
    };
    let text = status.label();

    rsx! {
        span {
            class: "status-badge {bg_class}",
            {text}
        }
    }
}

/// Pill showing whether live updates are flowing.
#[component]
pub fn ConnectionPill(state: ConnectionState) -> Element {
    let (class, text) = match state {
        ConnectionState::Connected => ("pill-live", "Live"),
        ConnectionState::Disconnected => ("pill-offline", "Offline"),
    };

    rsx! {
        span {
            class: "connection-pill {class}",
            span { class: "pill-dot" }
            {text}
        }
    }
}
