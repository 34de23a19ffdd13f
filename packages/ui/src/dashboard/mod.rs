//! Dashboard components.

mod dashboard;
mod job_map;
mod notices;
mod sidebar;
mod status_badge;

pub use dashboard::Dashboard;
pub use job_map::JobMap;
pub use notices::{NoticeList, Toast, Toasts, use_toasts};
pub use sidebar::Sidebar;
pub use status_badge::{ConnectionPill, StatusBadge};
