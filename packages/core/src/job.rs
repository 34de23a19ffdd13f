//! Job domain types for dispatched work.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coordinate::{Coordinate, GeoPoint};

/// Identifier of a job as assigned by the upstream jobs API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl From<i64> for JobId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current status of a job in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job was created and nobody picked it up yet.
    #[default]
    New,
    /// A contractor has been assigned.
    Assigned,
    /// The contractor is working on it.
    InProgress,
    /// Work is done.
    Completed,
}

impl JobStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::New => "new",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::New => "New",
            JobStatus::Assigned => "Assigned",
            JobStatus::InProgress => "In progress",
            JobStatus::Completed => "Completed",
        }
    }

    /// Whether the job counts as assigned work (neither new nor completed).
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Assigned | JobStatus::InProgress)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job is one unit of work shown on the dispatch board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier, used as the reconciliation key.
    pub id: JobId,
    /// Short label shown on markers and notices.
    pub title: String,
    /// Optional numeric job type passed through from the jobs API.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<i64>,
    /// Current status.
    pub status: JobStatus,
    /// Name of the assigned contractor, `None` when unassigned.
    #[serde(default)]
    pub contractor: Option<String>,
    /// Latitude, numeric or text as received.
    pub latitude: Coordinate,
    /// Longitude, numeric or text as received.
    pub longitude: Coordinate,
    /// Street address.
    pub address: String,
    /// Fields this crate does not model, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Create a new unassigned job.
    pub fn new(
        id: i64,
        title: impl Into<String>,
        latitude: impl Into<Coordinate>,
        longitude: impl Into<Coordinate>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: JobId(id),
            title: title.into(),
            job_type: None,
            status: JobStatus::New,
            contractor: None,
            latitude: latitude.into(),
            longitude: longitude.into(),
            address: address.into(),
            extra: Map::new(),
        }
    }

    /// Set the status for this job.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Assign a contractor to this job.
    pub fn with_contractor(mut self, contractor: impl Into<String>) -> Self {
        self.contractor = Some(contractor.into());
        self
    }

    /// Convert textual coordinates to numbers where they parse.
    pub fn normalized(mut self) -> Self {
        self.latitude = self.latitude.normalized();
        self.longitude = self.longitude.normalized();
        self
    }

    /// Map position, or `None` when either coordinate is not numeric.
    pub fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            lat: self.latitude.value()?,
            lng: self.longitude.value()?,
        })
    }

    /// Assigned contractor, ignoring empty names.
    pub fn contractor_name(&self) -> Option<&str> {
        self.contractor.as_deref().filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_text_coordinates_and_null_contractor() {
        let job: Job = serde_json::from_value(json!({
            "id": 7,
            "title": "Fix boiler",
            "status": "in_progress",
            "contractor": null,
            "latitude": "3.139",
            "longitude": "101.6869",
            "address": "Jalan Ampang"
        }))
        .unwrap();

        assert_eq!(job.id, JobId(7));
        assert_eq!(job.status, JobStatus::InProgress);
        assert_eq!(job.contractor, None);
        assert_eq!(job.latitude, Coordinate::Text("3.139".into()));
        assert_eq!(job.position(), Some(GeoPoint { lat: 3.139, lng: 101.6869 }));
    }

    #[test]
    fn missing_contractor_is_unassigned() {
        let job: Job = serde_json::from_value(json!({
            "id": 1,
            "title": "t",
            "status": "new",
            "latitude": 1.0,
            "longitude": 2.0,
            "address": "a"
        }))
        .unwrap();
        assert!(job.contractor.is_none());
    }

    #[test]
    fn rejects_unknown_status() {
        let result = serde_json::from_value::<Job>(json!({
            "id": 1,
            "title": "t",
            "status": "archived",
            "latitude": 1.0,
            "longitude": 2.0,
            "address": "a"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_type_only_when_present() {
        let mut job = Job::new(3, "Paint", 1.0, 2.0, "Somewhere");
        let value = serde_json::to_value(&job).unwrap();
        assert!(value.get("type").is_none());
        assert_eq!(value["contractor"], serde_json::Value::Null);

        job.job_type = Some(4);
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], json!(4));
    }

    #[test]
    fn unknown_fields_round_trip() {
        let wire = json!({
            "id": 9,
            "title": "Gutter",
            "status": "completed",
            "contractor": "Ann",
            "latitude": 40,
            "longitude": "-74.0",
            "address": "3 Elm St",
            "created_at": "2024-05-01T10:00:00Z",
            "priority": {"level": 2}
        });
        let job: Job = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(job.extra["created_at"], json!("2024-05-01T10:00:00Z"));
        assert_eq!(serde_json::to_value(&job).unwrap(), wire);
    }

    #[test]
    fn active_statuses() {
        assert!(!JobStatus::New.is_active());
        assert!(JobStatus::Assigned.is_active());
        assert!(JobStatus::InProgress.is_active());
        assert!(!JobStatus::Completed.is_active());
    }

    #[test]
    fn empty_contractor_name_counts_as_unassigned() {
        let job = Job::new(1, "t", 0.0, 0.0, "a").with_contractor("");
        assert_eq!(job.contractor_name(), None);
    }
}
