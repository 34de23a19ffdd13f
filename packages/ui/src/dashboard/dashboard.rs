//! Main dashboard: snapshot load, live feed and the derived views.

use std::cell::RefCell;
use std::rc::Rc;

use api::{FeedHandle, HttpTransport, LiveFeed, ReconnectPolicy};
use dioxus::prelude::*;
use dispatch_core::{GeoPoint, Job, Reconciler};

use super::{ConnectionPill, JobMap, NoticeList, Sidebar, use_toasts};
use crate::auth::use_auth;

/// Dashboard for signed-in users.
#[component]
pub fn Dashboard() -> Element {
    let mut reconciler = use_signal(Reconciler::new);
    let mut loading = use_signal(|| true);
    let mut toasts = use_toasts();
    let mut auth = use_auth();
    let feed = use_hook(|| Rc::new(RefCell::new(None::<FeedHandle>)));

    // Initial snapshot
    use_effect(move || {
        spawn(async move {
            let notice = match api::list_jobs().await {
                Ok(jobs) => reconciler.write().load_snapshot(jobs),
                Err(e) => reconciler.write().snapshot_failed(&e.to_string()),
            };
            loading.set(false);
            toasts.push(notice);
        });
    });

    // Live updates, client side only
    let feed_for_start = feed.clone();
    use_effect(move || {
        let transport = HttpTransport::new(api::events_url());
        let live = LiveFeed::new(transport, ReconnectPolicy::default());
        let (handle, task) = live.start(move |signal| {
            let notice = reconciler.write().handle(signal);
            if let Some(notice) = notice {
                toasts.push(notice);
            }
        });

        if let Some(previous) = feed_for_start.borrow_mut().replace(handle) {
            previous.stop();
        }
        spawn(async move {
            let exit = task.await;
            tracing::info!("Live feed ended: {:?}", exit);
        });
    });

    let feed_for_drop = feed.clone();
    use_drop(move || {
        if let Some(handle) = feed_for_drop.borrow_mut().take() {
            handle.stop();
        }
    });

    let state = reconciler.read();
    let board = state.board();
    let markers: Vec<(Job, GeoPoint)> = board
        .map_markers()
        .map(|(job, point)| (job.clone(), point))
        .collect();
    let job_count = board.len();
    let overview = board.overview();
    let standings = board.standings().to_vec();
    let connection = state.connection();
    drop(state);

    let count_label = job_count_label(loading(), job_count);
    let username = auth.current_user().map(|u| u.username);

    rsx! {
        div { class: "dashboard",
            header { class: "dashboard-header",
                h1 { "Job Dispatch" }
                ConnectionPill { state: connection }
                span { class: "job-count", "{count_label}" }

                div { class: "header-user",
                    if let Some(name) = username {
                        span { class: "user-name", "{name}" }
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| auth.logout(),
                        "Logout"
                    }
                }
            }

            div { class: "dashboard-body",
                main { class: "map-panel",
                    JobMap { markers }
                }
                Sidebar { overview, standings }
            }

            NoticeList {
                toasts: toasts.items(),
                on_dismiss: move |id| toasts.dismiss(id),
            }
        }
    }
}

fn job_count_label(loading: bool, count: usize) -> String {
    if loading {
        "Loading...".to_string()
    } else {
        format!("{count} jobs")
    }
}
