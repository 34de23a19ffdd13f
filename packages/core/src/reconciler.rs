//! Client-side state machine merging the snapshot with the live stream.

use serde::{Deserialize, Serialize};

use crate::{EventKind, Job, JobBoard, JobStatus, StreamFrame};

/// Whether the live stream is currently delivering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial state, and the state after any stream error.
    #[default]
    Disconnected,
    /// The connection marker has been received.
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Input produced by the live feed transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSignal {
    /// Payload of one `data:` frame.
    Frame(String),
    /// The stream failed or closed; the reason is for logging only.
    Lost(String),
}

/// Tone of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Success,
    Info,
    Error,
}

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SnapshotLoaded { count: usize },
    SnapshotFailed,
    LiveConnected,
    LiveLost,
    JobAdded { title: String },
    JobUpdated { title: String, status: JobStatus },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::SnapshotLoaded { count } => format!("Loaded {count} jobs from API"),
            Notice::SnapshotFailed => "Failed to load jobs from API".to_string(),
            Notice::LiveConnected => "Connected to live updates!".to_string(),
            Notice::LiveLost => "Disconnected from live updates. Retrying...".to_string(),
            Notice::JobAdded { title } => format!("New Job Added: {title}"),
            Notice::JobUpdated { title, status } => {
                format!("Job Updated: {title} is now {status}")
            }
        }
    }

    pub fn tone(&self) -> NoticeTone {
        match self {
            Notice::SnapshotLoaded { .. } | Notice::LiveConnected | Notice::JobAdded { .. } => {
                NoticeTone::Success
            }
            Notice::JobUpdated { .. } => NoticeTone::Info,
            Notice::SnapshotFailed | Notice::LiveLost => NoticeTone::Error,
        }
    }
}

/// Connection state and job data, kept apart so either can be driven alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciler {
    connection: ConnectionState,
    board: JobBoard,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn board(&self) -> &JobBoard {
        &self.board
    }

    /// Replace the board with the bulk snapshot.
    pub fn load_snapshot(&mut self, jobs: Vec<Job>) -> Notice {
        self.board.replace_all(jobs);
        Notice::SnapshotLoaded {
            count: self.board.len(),
        }
    }

    /// Record a failed bulk fetch. The board keeps whatever it had.
    pub fn snapshot_failed(&mut self, reason: &str) -> Notice {
        tracing::error!("Error fetching jobs: {}", reason);
        Notice::SnapshotFailed
    }

    /// Feed one signal from the live stream.
    pub fn handle(&mut self, signal: FeedSignal) -> Option<Notice> {
        match signal {
            FeedSignal::Frame(data) => self.apply_frame(&data),
            FeedSignal::Lost(reason) => {
                tracing::warn!("Live stream lost: {}", reason);
                self.connection = ConnectionState::Disconnected;
                Some(Notice::LiveLost)
            }
        }
    }

    /// Apply the JSON payload of one frame. Malformed payloads are dropped.
    pub fn apply_frame(&mut self, data: &str) -> Option<Notice> {
        let frame = match StreamFrame::parse(data) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Dropping stream frame: {}", e);
                return None;
            }
        };

        match frame {
            StreamFrame::Connected(_) => {
                self.connection = ConnectionState::Connected;
                Some(Notice::LiveConnected)
            }
            StreamFrame::Event(event) => {
                let kind = event.kind();
                let job = event.job();
                let (title, status) = (job.title.clone(), job.status);
                let outcome = self.board.apply(event);
                tracing::debug!("Applied {} ({:?}) for '{}'", kind, outcome, title);

                Some(match kind {
                    EventKind::NewJob => Notice::JobAdded { title },
                    EventKind::StatusUpdate => Notice::JobUpdated { title, status },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobId;
    use serde_json::json;

    const MARKER: &str = r#"{"type":"connected","message":"SSE connection established"}"#;

    fn frame(event: &str, id: i64, title: &str, status: &str, contractor: Option<&str>) -> String {
        json!({
            "event": event,
            "data": {
                "id": id,
                "title": title,
                "status": status,
                "contractor": contractor,
                "latitude": "1.0",
                "longitude": "2.0",
                "address": "Y"
            }
        })
        .to_string()
    }

    #[test]
    fn starts_disconnected_and_connects_on_marker() {
        let mut reconciler = Reconciler::new();
        assert_eq!(reconciler.connection(), ConnectionState::Disconnected);

        let notice = reconciler.handle(FeedSignal::Frame(MARKER.to_string()));

        assert_eq!(notice, Some(Notice::LiveConnected));
        assert!(reconciler.connection().is_connected());
        assert!(reconciler.board().is_empty());
    }

    #[test]
    fn lost_stream_disconnects_without_touching_jobs() {
        let mut reconciler = Reconciler::new();
        reconciler.load_snapshot(vec![Job::new(1, "a", 1.0, 2.0, "x")]);
        reconciler.handle(FeedSignal::Frame(MARKER.to_string()));

        let notice = reconciler.handle(FeedSignal::Lost("reset by peer".into()));

        assert_eq!(notice, Some(Notice::LiveLost));
        assert_eq!(reconciler.connection(), ConnectionState::Disconnected);
        assert_eq!(reconciler.board().len(), 1);
    }

    #[test]
    fn reconnect_cycle_returns_to_connected() {
        let mut reconciler = Reconciler::new();
        reconciler.handle(FeedSignal::Frame(MARKER.to_string()));
        reconciler.handle(FeedSignal::Lost("eof".into()));
        reconciler.handle(FeedSignal::Frame(MARKER.to_string()));
        assert!(reconciler.connection().is_connected());
    }

    #[test]
    fn new_job_event_inserts_and_notifies() {
        let mut reconciler = Reconciler::new();
        let notice = reconciler.handle(FeedSignal::Frame(frame("new-job", 42, "X", "new", None)));

        assert_eq!(notice, Some(Notice::JobAdded { title: "X".into() }));
        assert_eq!(reconciler.board().len(), 1);
        let job = reconciler.board().get(JobId(42)).unwrap();
        assert!(job.latitude.is_numeric());
    }

    #[test]
    fn status_update_replaces_and_recomputes_standings() {
        let mut reconciler = Reconciler::new();
        reconciler.load_snapshot(vec![
            Job::new(1, "a", 1.0, 2.0, "x"),
            Job::new(2, "b", 1.0, 2.0, "x"),
        ]);

        let notice = reconciler.handle(FeedSignal::Frame(frame(
            "status-update",
            1,
            "a",
            "assigned",
            Some("John Doe"),
        )));

        assert_eq!(
            notice,
            Some(Notice::JobUpdated {
                title: "a".into(),
                status: JobStatus::Assigned
            })
        );
        assert_eq!(reconciler.board().len(), 2);
        assert_eq!(reconciler.board().standings()[0].name, "John Doe");
    }

    #[test]
    fn malformed_frames_are_dropped() {
        let mut reconciler = Reconciler::new();
        reconciler.load_snapshot(vec![Job::new(1, "a", 1.0, 2.0, "x")]);
        let before = reconciler.clone();

        assert_eq!(reconciler.handle(FeedSignal::Frame("{not json".into())), None);
        assert_eq!(
            reconciler.handle(FeedSignal::Frame(r#"{"event":"new-job"}"#.into())),
            None
        );
        assert_eq!(reconciler, before);
    }

    #[test]
    fn failed_snapshot_keeps_previous_jobs() {
        let mut reconciler = Reconciler::new();
        reconciler.load_snapshot(vec![Job::new(1, "a", 1.0, 2.0, "x")]);

        assert_eq!(reconciler.snapshot_failed("HTTP 502"), Notice::SnapshotFailed);
        assert_eq!(reconciler.board().len(), 1);
    }

    #[test]
    fn notice_messages() {
        assert_eq!(
            Notice::SnapshotLoaded { count: 3 }.message(),
            "Loaded 3 jobs from API"
        );
        assert_eq!(
            Notice::JobUpdated {
                title: "Boiler".into(),
                status: JobStatus::InProgress
            }
            .message(),
            "Job Updated: Boiler is now in_progress"
        );
        assert_eq!(Notice::LiveLost.tone(), NoticeTone::Error);
    }
}
