//! Controller owning the point collection, filter selections, and view state.

use rand::Rng;
use serde::Deserialize;

use crate::distance::{assign_simulated_distances, sort_by_distance_ascending};
use crate::filter::{FilterState, MAX_DISTANCE_KM, matches};
use crate::model::{LocationFix, Point, PointId, ScheduleFilter, ViewMode};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
/// Behaviour switches for [`PointBrowser`].
pub struct BrowserSettings {
    /// Also hide points farther than the slider radius once distances are known.
    #[serde(default)]
    pub enforce_max_distance: bool,
}

/// Single owner of everything the point list is rendered from.
///
/// Selections only change what is shown once [`PointBrowser::apply_filters`] runs.
/// Visibility is tracked per position, so points sharing an id are filtered independently.
#[derive(Debug)]
pub struct PointBrowser {
    points: Vec<Point>,
    state: FilterState,
    view: ViewMode,
    visible: Vec<bool>,
    last_fix: Option<LocationFix>,
    settings: BrowserSettings,
}

impl PointBrowser {
    /// Start a session showing every point.
    #[must_use]
    pub fn new(points: Vec<Point>, settings: BrowserSettings) -> Self {
        let visible = vec![true; points.len()];
        Self {
            points,
            state: FilterState::default(),
            view: ViewMode::default(),
            visible,
            last_fix: None,
            settings,
        }
    }

    /// All points in their current order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Look up a point by id.
    #[must_use]
    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.iter().find(|point| &point.id == id)
    }

    /// Current, possibly unapplied, filter selections.
    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Current card layout.
    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Fix used for the current distance ordering.
    #[must_use]
    pub fn last_fix(&self) -> Option<&LocationFix> {
        self.last_fix.as_ref()
    }

    /// Select or deselect a material; see [`FilterState::toggle_material`].
    pub fn toggle_material(&mut self, tag: &str, selected: bool) -> bool {
        let changed = self.state.toggle_material(tag, selected);
        tracing::debug!(tag, selected, changed, "material filter toggled");
        changed
    }

    /// Select or deselect a schedule category.
    pub fn toggle_schedule(&mut self, filter: ScheduleFilter, selected: bool) -> bool {
        let slug = filter.to_string();
        let changed = self.state.toggle_schedule(filter, selected);
        tracing::debug!(filter = %slug, selected, changed, "schedule filter toggled");
        changed
    }

    /// Move the distance slider, clamping to its bounds.
    pub fn set_max_distance(&mut self, km: i32) {
        self.state.set_max_distance(km);
        tracing::debug!(km = self.state.max_distance_km(), "distance radius set");
    }

    /// Badge count for the apply button.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    /// Slider label such as `5 km`.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{} km", self.state.max_distance_km())
    }

    /// Share of the slider track that is filled, in percent.
    #[must_use]
    pub fn distance_fill_percent(&self) -> f64 {
        f64::from(self.state.max_distance_km()) * 100.0 / f64::from(MAX_DISTANCE_KM)
    }

    /// Recompute the shown points from the current selections.
    ///
    /// Returns how many points are shown.
    pub fn apply_filters(&mut self) -> usize {
        let radius = f64::from(self.state.max_distance_km());
        let enforce = self.settings.enforce_max_distance;

        self.visible = self
            .points
            .iter()
            .map(|point| {
                matches(point, &self.state)
                    && (!enforce || point.distance_km.is_none_or(|distance| distance <= radius))
            })
            .collect();

        let shown = self.visible.iter().filter(|&&flag| flag).count();
        tracing::info!(
            visible = shown,
            total = self.points.len(),
            filters = self.state.active_filter_count(),
            "filters applied"
        );
        shown
    }

    /// Whether a point with this id was shown by the last apply.
    #[must_use]
    pub fn is_visible(&self, id: &PointId) -> bool {
        self.visible_points().any(|point| &point.id == id)
    }

    /// Shown points in their current order.
    pub fn visible_points(&self) -> impl Iterator<Item = &Point> {
        self.points
            .iter()
            .zip(&self.visible)
            .filter_map(|(point, &shown)| shown.then_some(point))
    }

    /// Switch the card layout. Returns `false` when already in `mode`.
    pub fn switch_view(&mut self, mode: ViewMode) -> bool {
        if self.view == mode {
            return false;
        }
        self.view = mode;
        tracing::debug!(?mode, "view switched");
        true
    }

    /// Simulate distances from `fix`, reorder nearest first, and re-apply filters.
    ///
    /// Visibility is recomputed after the sort so it stays aligned with `points`.
    ///
    /// Returns how many points are shown afterwards.
    pub fn apply_location<R: Rng>(&mut self, fix: LocationFix, rng: &mut R) -> usize {
        assign_simulated_distances(&mut self.points, &fix, rng);
        sort_by_distance_ascending(&mut self.points);
        self.last_fix = Some(fix);
        self.apply_filters()
    }
}
