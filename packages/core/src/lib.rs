//! Core domain types for the dispatch board.
//!
//! This crate contains shared types used across all packages:
//! - Job, JobStatus and Coordinate for job records
//! - JobEvent and StreamFrame for the live update wire format
//! - JobBoard and Reconciler for merging snapshots with streamed events
//! - Contractor standings and the job overview
//! - Auth models and form validation

mod auth;
mod board;
mod coordinate;
mod events;
mod job;
mod leaderboard;
mod reconciler;

pub use auth::{AuthResponse, FieldErrors, LoginForm, RegisterForm, User};
pub use board::{JobBoard, Upsert};
pub use coordinate::{Coordinate, GeoPoint};
pub use events::{ConnectedMarker, EventKind, FrameError, JobEvent, MarkerKind, StreamFrame};
pub use job::{Job, JobId, JobStatus};
pub use leaderboard::{ContractorStanding, JobOverview, contractor_standings};
pub use reconciler::{ConnectionState, FeedSignal, Notice, NoticeTone, Reconciler};
