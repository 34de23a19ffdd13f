//! Aggregates derived from the current set of jobs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Job;

/// Number of jobs currently assigned to one contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorStanding {
    pub name: String,
    pub count: usize,
}

/// Group jobs by contractor and rank by job count, highest first.
///
/// Unassigned jobs are skipped. Ties keep the order in which each name was
/// first seen in `jobs`.
pub fn contractor_standings(jobs: &[Job]) -> Vec<ContractorStanding> {
    let mut standings: Vec<ContractorStanding> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for name in jobs.iter().filter_map(Job::contractor_name) {
        match positions.get(name) {
            Some(&index) => standings[index].count += 1,
            None => {
                positions.insert(name, standings.len());
                standings.push(ContractorStanding {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, ties stay in first-seen order
    standings.sort_by(|a, b| b.count.cmp(&a.count));
    standings
}

/// Headline numbers for the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOverview {
    /// All jobs on the board.
    pub total: usize,
    /// Jobs that are neither new nor completed.
    pub assigned: usize,
}

impl JobOverview {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        Self {
            total: jobs.len(),
            assigned: jobs.iter().filter(|job| job.status.is_active()).count(),
        }
    }
}
