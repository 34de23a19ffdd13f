//! The client-side job collection.

use std::collections::HashMap;

use crate::leaderboard::{ContractorStanding, JobOverview, contractor_standings};
use crate::{GeoPoint, Job, JobEvent, JobId};

/// What an upsert did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Ordered collection of jobs holding at most one entry per id.
///
/// Every mutation recomputes the contractor standings and the overview, so
/// readers never see stale aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobBoard {
    jobs: Vec<Job>,
    index: HashMap<JobId, usize>,
    standings: Vec<ContractorStanding>,
    overview: JobOverview,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every job with a fresh snapshot.
    ///
    /// Coordinates are normalized on the way in. A snapshot that repeats an
    /// id keeps the first position and the last payload.
    pub fn replace_all(&mut self, jobs: impl IntoIterator<Item = Job>) {
        self.jobs.clear();
        self.index.clear();
        for job in jobs {
            self.upsert_entry(job.normalized());
        }
        self.refresh();
    }

    /// Insert the job, or replace the entry sharing its id in place.
    pub fn upsert(&mut self, job: Job) -> Upsert {
        let outcome = self.upsert_entry(job.normalized());
        self.refresh();
        outcome
    }

    /// Apply a streamed event. Both kinds upsert by id.
    pub fn apply(&mut self, event: JobEvent) -> Upsert {
        self.upsert(event.into_job())
    }

    fn upsert_entry(&mut self, job: Job) -> Upsert {
        match self.index.get(&job.id) {
            Some(&position) => {
                self.jobs[position] = job;
                Upsert::Replaced
            }
            None => {
                self.index.insert(job.id, self.jobs.len());
                self.jobs.push(job);
                Upsert::Inserted
            }
        }
    }

    fn refresh(&mut self) {
        self.standings = contractor_standings(&self.jobs);
        self.overview = JobOverview::from_jobs(&self.jobs);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.index.get(&id).map(|&position| &self.jobs[position])
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Contractors ranked by assigned job count.
    pub fn standings(&self) -> &[ContractorStanding] {
        &self.standings
    }

    pub fn overview(&self) -> JobOverview {
        self.overview
    }

    /// Jobs that can be placed on the map, with their positions.
    ///
    /// Jobs with a non-numeric coordinate stay on the board but are left off
    /// the map.
    pub fn map_markers(&self) -> impl Iterator<Item = (&Job, GeoPoint)> {
        self.jobs.iter().filter_map(|job| match job.position() {
            Some(point) => Some((job, point)),
            None => {
                tracing::debug!(
                    "Job {} has invalid coordinates: {:?}, {:?}",
                    job.id,
                    job.latitude,
                    job.longitude
                );
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, JobStatus};

    fn job(id: i64, title: &str) -> Job {
        Job::new(id, title, "3.1", "101.7", "Kuala Lumpur")
    }

    #[test]
    fn new_id_is_inserted_once() {
        let mut board = JobBoard::new();
        board.replace_all(vec![job(1, "a"), job(2, "b")]);

        let outcome = board.apply(JobEvent::NewJob(job(3, "c")));

        assert_eq!(outcome, Upsert::Inserted);
        assert_eq!(board.len(), 3);
        assert_eq!(board.jobs().last().map(|j| j.id), Some(JobId(3)));
    }

    #[test]
    fn update_replaces_in_place() {
        let mut board = JobBoard::new();
        board.replace_all(vec![job(1, "a"), job(2, "b"), job(3, "c")]);

        let updated = job(2, "b2")
            .with_status(JobStatus::Assigned)
            .with_contractor("Dana");
        let outcome = board.apply(JobEvent::StatusUpdate(updated));

        assert_eq!(outcome, Upsert::Replaced);
        assert_eq!(board.len(), 3);
        let ids: Vec<i64> = board.jobs().iter().map(|j| j.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(board.jobs()[1].title, "b2");
        assert_eq!(board.standings()[0].name, "Dana");
        assert_eq!(board.overview().assigned, 1);
    }

    #[test]
    fn kind_does_not_decide_insert_or_replace() {
        let mut board = JobBoard::new();
        board.apply(JobEvent::StatusUpdate(job(9, "late update")));
        board.apply(JobEvent::NewJob(job(9, "duplicate create")));

        assert_eq!(board.len(), 1);
        assert_eq!(board.jobs()[0].title, "duplicate create");
    }

    #[test]
    fn snapshot_normalizes_coordinates() {
        let mut board = JobBoard::new();
        board.replace_all(vec![job(1, "a")]);

        let stored = board.get(JobId(1)).unwrap();
        assert_eq!(stored.latitude, Coordinate::from(3.1));
        assert_eq!(stored.longitude, Coordinate::from(101.7));
    }

    #[test]
    fn snapshot_replaces_previous_jobs() {
        let mut board = JobBoard::new();
        board.replace_all(vec![job(1, "a"), job(2, "b")]);
        board.replace_all(vec![job(5, "e")]);

        assert_eq!(board.len(), 1);
        assert!(board.get(JobId(1)).is_none());
        assert_eq!(board.overview().total, 1);
    }

    #[test]
    fn snapshot_collapses_duplicate_ids() {
        let mut board = JobBoard::new();
        board.replace_all(vec![job(1, "first"), job(2, "b"), job(1, "second")]);

        assert_eq!(board.len(), 2);
        assert_eq!(board.jobs()[0].title, "second");
    }

    #[test]
    fn invalid_coordinates_stay_on_board_but_off_map() {
        let mut board = JobBoard::new();
        board.replace_all(vec![
            job(1, "ok"),
            Job::new(2, "broken", "n/a", "101.7", "Nowhere"),
        ]);

        assert_eq!(board.len(), 2);
        let on_map: Vec<i64> = board.map_markers().map(|(j, _)| j.id.0).collect();
        assert_eq!(on_map, vec![1]);
    }
}
