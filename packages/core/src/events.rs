//! Event types for real-time updates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Job;

/// Events carried from the webhook to every connected board.
///
/// Wire shape is `{"event": "new-job" | "status-update", "data": <Job>}`.
/// Unknown kinds and extra envelope keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", deny_unknown_fields)]
pub enum JobEvent {
    /// A job was created upstream.
    NewJob(Job),
    /// An existing job changed status or assignment.
    StatusUpdate(Job),
}

/// Kind tag of a [`JobEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    NewJob,
    StatusUpdate,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::NewJob => "new-job",
            EventKind::StatusUpdate => "status-update",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobEvent {
    /// Get the kind tag of the event.
    pub fn kind(&self) -> EventKind {
        match self {
            JobEvent::NewJob(_) => EventKind::NewJob,
            JobEvent::StatusUpdate(_) => EventKind::StatusUpdate,
        }
    }

    /// Get the job payload.
    pub fn job(&self) -> &Job {
        match self {
            JobEvent::NewJob(job) | JobEvent::StatusUpdate(job) => job,
        }
    }

    /// Take the job payload out of the envelope.
    pub fn into_job(self) -> Job {
        match self {
            JobEvent::NewJob(job) | JobEvent::StatusUpdate(job) => job,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            JobEvent::NewJob(job) => format!("Job {} '{}' created", job.id, job.title),
            JobEvent::StatusUpdate(job) => format!("Job {} -> {}", job.id, job.status),
        }
    }
}

/// Tag of the marker frame that opens every live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Connected,
}

/// First frame on every live stream, so clients can tell "ready" from "quiet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub message: String,
}

impl ConnectedMarker {
    pub fn new() -> Self {
        Self {
            kind: MarkerKind::Connected,
            message: "SSE connection established".to_string(),
        }
    }
}

impl Default for ConnectedMarker {
    fn default() -> Self {
        Self::new()
    }
}

/// Any payload that can appear in a `data:` line of the live stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamFrame {
    Connected(ConnectedMarker),
    Event(JobEvent),
}

impl StreamFrame {
    /// Parse the JSON payload of one stream frame.
    pub fn parse(data: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Serialize to the JSON text written after `data: `.
    pub fn to_json(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<JobEvent> for StreamFrame {
    fn from(event: JobEvent) -> Self {
        StreamFrame::Event(event)
    }
}

/// Frame errors.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, JobId, JobStatus};
    use serde_json::json;

    fn envelope() -> serde_json::Value {
        json!({
            "event": "new-job",
            "data": {
                "id": 42,
                "title": "X",
                "status": "new",
                "contractor": null,
                "latitude": "1.0",
                "longitude": "2.0",
                "address": "Y"
            }
        })
    }

    #[test]
    fn parses_new_job_envelope() {
        let event: JobEvent = serde_json::from_value(envelope()).unwrap();
        assert_eq!(event.kind(), EventKind::NewJob);
        assert_eq!(event.job().id, JobId(42));
        assert_eq!(event.job().latitude, Coordinate::Text("1.0".into()));
    }

    #[test]
    fn reserializes_to_the_posted_envelope() {
        let event: JobEvent = serde_json::from_value(envelope()).unwrap();
        assert_eq!(serde_json::to_value(&event).unwrap(), envelope());
    }

    #[test]
    fn parses_status_update() {
        let event: JobEvent = serde_json::from_value(json!({
            "event": "status-update",
            "data": {
                "id": 1,
                "title": "Updated Test Job",
                "status": "assigned",
                "contractor": "John Doe",
                "latitude": 40.7128,
                "longitude": -74.006,
                "address": "123 Updated St"
            }
        }))
        .unwrap();
        assert_eq!(event.kind(), EventKind::StatusUpdate);
        assert_eq!(event.job().status, JobStatus::Assigned);
        assert_eq!(event.description(), "Job 1 -> assigned");
    }

    #[test]
    fn rejects_missing_event_tag() {
        let mut value = envelope();
        value.as_object_mut().unwrap().remove("event");
        assert!(serde_json::from_value::<JobEvent>(value).is_err());
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut value = envelope();
        value["event"] = json!("job-deleted");
        assert!(serde_json::from_value::<JobEvent>(value).is_err());
    }

    #[test]
    fn rejects_unknown_envelope_keys() {
        let mut value = envelope();
        value["extra"] = json!(true);
        assert!(serde_json::from_value::<JobEvent>(value).is_err());
    }

    #[test]
    fn rejects_missing_job_fields() {
        let mut value = envelope();
        value["data"].as_object_mut().unwrap().remove("title");
        assert!(serde_json::from_value::<JobEvent>(value).is_err());
    }

    #[test]
    fn connected_marker_wire_shape() {
        let frame = StreamFrame::Connected(ConnectedMarker::new());
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"type": "connected", "message": "SSE connection established"})
        );
    }

    #[test]
    fn parses_both_frame_kinds() {
        let marker = StreamFrame::parse(r#"{"type":"connected","message":"hi"}"#).unwrap();
        assert!(matches!(marker, StreamFrame::Connected(_)));

        let event = StreamFrame::parse(&envelope().to_string()).unwrap();
        assert!(matches!(event, StreamFrame::Event(JobEvent::NewJob(_))));
    }

    #[test]
    fn garbage_frame_is_an_error() {
        assert!(StreamFrame::parse("not json").is_err());
        assert!(StreamFrame::parse(r#"{"type":"heartbeat"}"#).is_err());
    }
}
