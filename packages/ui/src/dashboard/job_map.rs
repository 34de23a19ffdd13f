//! Job map: one marker per job with a usable position.

use dioxus::prelude::*;
use dispatch_core::{GeoPoint, Job, JobId, JobStatus};

use super::StatusBadge;

/// Lat/lng box that all markers are fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MapBounds {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl MapBounds {
    /// Smallest span shown, in degrees, so a lone marker is not stretched.
    const MIN_SPAN: f64 = 0.01;

    fn fit(points: impl Iterator<Item = GeoPoint>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for p in points {
            bounds = Some(match bounds {
                None => Self {
                    min_lat: p.lat,
                    max_lat: p.lat,
                    min_lng: p.lng,
                    max_lng: p.lng,
                },
                Some(b) => Self {
                    min_lat: b.min_lat.min(p.lat),
                    max_lat: b.max_lat.max(p.lat),
                    min_lng: b.min_lng.min(p.lng),
                    max_lng: b.max_lng.max(p.lng),
                },
            });
        }
        bounds
    }

    /// Position as (left %, top %), with a 5% margin on every side.
    fn project(&self, p: GeoPoint) -> (f64, f64) {
        let lat_span = (self.max_lat - self.min_lat).max(Self::MIN_SPAN);
        let lng_span = (self.max_lng - self.min_lng).max(Self::MIN_SPAN);
        let lat_mid = (self.max_lat + self.min_lat) / 2.0;
        let lng_mid = (self.max_lng + self.min_lng) / 2.0;

        let x = 0.5 + (p.lng - lng_mid) / lng_span;
        let y = 0.5 - (p.lat - lat_mid) / lat_span;
        (5.0 + x * 90.0, 5.0 + y * 90.0)
    }
}

/// Marker layer for the jobs that have numeric coordinates.
#[component]
pub fn JobMap(markers: Vec<(Job, GeoPoint)>) -> Element {
    let selected = use_signal(|| None::<JobId>);

    let bounds = MapBounds::fit(markers.iter().map(|(_, p)| *p));
    let placed: Vec<(Job, GeoPoint, f64, f64)> = match bounds {
        Some(bounds) => markers
            .iter()
            .map(|(job, point)| {
                let (left, top) = bounds.project(*point);
                (job.clone(), *point, left, top)
            })
            .collect(),
        None => Vec::new(),
    };

    rsx! {
        div { class: "job-map",
            if placed.is_empty() {
                div { class: "map-empty", "No jobs to show on the map" }
            }
            for (job, point, left, top) in placed {
                MapMarker { key: "{job.id}", job, point, left, top, selected }
            }
        }
    }
}

#[component]
fn MapMarker(
    job: Job,
    point: GeoPoint,
    left: f64,
    top: f64,
    mut selected: Signal<Option<JobId>>,
) -> Element {
    let id = job.id;
    let is_selected = selected() == Some(id);
    let class = marker_class(job.status, is_selected);

    rsx! {
        div {
            class: "{class}",
            style: "left: {left:.2}%; top: {top:.2}%;",
            title: "{job.title}",
            onclick: move |_| {
                if selected() == Some(id) {
                    selected.set(None);
                } else {
                    selected.set(Some(id));
                }
            },
            if is_selected {
                MarkerPopup { job: job.clone(), point }
            }
        }
    }
}

/// Marker classes: blue for new, orange while assigned or in progress,
/// green once completed.
fn marker_class(status: JobStatus, selected: bool) -> String {
    let tone = match status {
        JobStatus::New => "marker-new",
        JobStatus::Assigned | JobStatus::InProgress => "marker-active",
        JobStatus::Completed => "marker-completed",
    };
    if selected {
        format!("map-marker {tone} selected")
    } else {
        format!("map-marker {tone}")
    }
}

#[component]
fn MarkerPopup(job: Job, point: GeoPoint) -> Element {
    let contractor = job.contractor_name().unwrap_or("Unassigned").to_string();

    rsx! {
        div { class: "marker-popup",
            h4 { "{job.title}" }
            StatusBadge { status: job.status }
            if let Some(job_type) = job.job_type {
                p { class: "popup-type", "Type: {job_type}" }
            }
            p { class: "popup-contractor", "Contractor: {contractor}" }
            p { class: "popup-address", "{job.address}" }
            p { class: "popup-coords", "{point.lat:.4}, {point.lng:.4}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_color_follows_status() {
        assert_eq!(marker_class(JobStatus::New, false), "map-marker marker-new");
        assert_eq!(marker_class(JobStatus::Assigned, false), "map-marker marker-active");
        assert_eq!(marker_class(JobStatus::InProgress, false), "map-marker marker-active");
        assert_eq!(
            marker_class(JobStatus::Completed, true),
            "map-marker marker-completed selected"
        );
    }

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    #[test]
    fn corners_land_inside_margins() {
        let bounds = MapBounds::fit([point(10.0, 20.0), point(20.0, 40.0)].into_iter()).unwrap();

        assert_eq!(bounds.project(point(20.0, 20.0)), (5.0, 5.0));
        assert_eq!(bounds.project(point(10.0, 40.0)), (95.0, 95.0));
    }

    #[test]
    fn single_marker_is_centered() {
        let bounds = MapBounds::fit(std::iter::once(point(3.1, 101.7))).unwrap();
        assert_eq!(bounds.project(point(3.1, 101.7)), (50.0, 50.0));
    }

    #[test]
    fn no_points_no_bounds() {
        assert!(MapBounds::fit(std::iter::empty()).is_none());
    }
}
