//! Transient notices shown in the corner of the dashboard.

use dioxus::prelude::*;
use dispatch_core::{Notice, NoticeTone};

/// How long a notice stays up.
const NOTICE_TTL_MS: u32 = 4_000;
/// Older notices are dropped past this many.
const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Handle to the notice queue.
#[derive(Clone, Copy, PartialEq)]
pub struct Toasts {
    items: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl Toasts {
    /// Show a notice and schedule its removal.
    pub fn push(&mut self, notice: Notice) {
        let id = {
            let mut next = self.next_id.write();
            *next += 1;
            *next
        };

        {
            let mut items = self.items.write();
            items.push(Toast { id, notice });
            let overflow = items.len().saturating_sub(MAX_VISIBLE);
            items.drain(..overflow);
        }

        let mut toasts = *self;
        spawn(async move {
            sleep_ms(NOTICE_TTL_MS).await;
            toasts.dismiss(id);
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.write().retain(|t| t.id != id);
    }

    pub fn items(&self) -> Vec<Toast> {
        self.items.read().clone()
    }
}

/// Create the notice queue for this component tree.
pub fn use_toasts() -> Toasts {
    let items = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    Toasts { items, next_id }
}

async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

/// Stack of notices with a dismiss button each.
#[component]
pub fn NoticeList(toasts: Vec<Toast>, on_dismiss: EventHandler<u64>) -> Element {
    rsx! {
        div { class: "notice-stack",
            for toast in toasts {
                NoticeItem { key: "{toast.id}", toast, on_dismiss }
            }
        }
    }
}

#[component]
fn NoticeItem(toast: Toast, on_dismiss: EventHandler<u64>) -> Element {
    let tone = match toast.notice.tone() {
        NoticeTone::Success => "notice-success",
        NoticeTone::Info => "notice-info",
        NoticeTone::Error => "notice-error",
    };
    let message = toast.notice.message();
    let id = toast.id;

    rsx! {
        div { class: "notice {tone}",
            span { "{message}" }
            button {
                class: "notice-close",
                onclick: move |_| on_dismiss.call(id),
                "x"
            }
        }
    }
}
