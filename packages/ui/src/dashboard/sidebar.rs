//! Sidebar: job overview and contractor leaderboard.

use dioxus::prelude::*;
use dispatch_core::{ContractorStanding, JobOverview};

/// Headline counts plus the contractors ranked by assigned jobs.
#[component]
pub fn Sidebar(overview: JobOverview, standings: Vec<ContractorStanding>) -> Element {
    rsx! {
        aside { class: "sidebar",
            section { class: "sidebar-section",
                h2 { "Job Overview" }
                div { class: "overview-grid",
                    div { class: "overview-card",
                        span { class: "overview-value", "{overview.total}" }
                        span { class: "overview-label", "Total jobs" }
                    }
                    div { class: "overview-card",
                        span { class: "overview-value", "{overview.assigned}" }
                        span { class: "overview-label", "Assigned" }
                    }
                }
            }

            section { class: "sidebar-section",
                h2 { "Contractor Leaderboard" }
                if standings.is_empty() {
                    p { class: "empty-state", "No contractors assigned yet" }
                } else {
                    ol { class: "leaderboard",
                        for (rank, standing) in standings.iter().enumerate() {
                            li {
                                key: "{standing.name}",
                                class: if rank == 0 { "leaderboard-row leaderboard-top" } else { "leaderboard-row" },
                                span { class: "leaderboard-rank", "{rank_marker(rank)}" }
                                span { class: "leaderboard-name", "{standing.name}" }
                                span { class: "leaderboard-count", "{standing.count} jobs" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Trophy for the leader, 1-based position for everyone else.
fn rank_marker(rank: usize) -> String {
    if rank == 0 {
        "🏆".to_string()
    } else {
        (rank + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_gets_the_trophy() {
        assert_eq!(rank_marker(0), "🏆");
        assert_eq!(rank_marker(1), "2");
        assert_eq!(rank_marker(9), "10");
    }
}
