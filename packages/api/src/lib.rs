//! Fullstack API for the dispatch dashboard.
//!
//! - Server functions: job snapshot, login, registration
//! - Live feed: SSE decoding and the reconnecting event stream consumer
//! - Session: token persistence on the client

mod auth;
mod jobs;
pub mod live;
pub mod session;

pub use auth::*;
pub use jobs::*;
pub use live::{
    FeedError, FeedExit, FeedHandle, FeedStream, FeedTask, FeedTransport, HttpTransport, LiveFeed,
    ReconnectPolicy, SseDecoder, events_url,
};
pub use session::{
    AuthSession, DefaultSessionStore, MemorySessionStore, SessionError, SessionStore,
    StoredSession,
};

#[cfg(feature = "server")]
mod init;

#[cfg(feature = "server")]
pub use init::*;

// Re-export core types for convenience
pub use dispatch_core::{
    AuthResponse, FeedSignal, FieldErrors, Job, JobEvent, JobId, JobStatus, LoginForm,
    RegisterForm, User,
};
