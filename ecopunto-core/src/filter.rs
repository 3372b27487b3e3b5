//! Filter selections and the visibility predicate over drop-off points.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Point, ScheduleFilter};

/// Smallest radius the distance slider allows.
pub const MIN_DISTANCE_KM: u8 = 1;
/// Largest radius the distance slider allows.
pub const MAX_DISTANCE_KM: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFilterState")]
/// Current filter selections.
///
/// Material tags are stored lower-cased so that "Vidrio" and "vidrio" are one entry.
/// Deserialized values go through the same clamping and lower-casing as the setters.
pub struct FilterState {
    max_distance_km: u8,
    selected_materials: BTreeSet<String>,
    selected_schedules: BTreeSet<ScheduleFilter>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            max_distance_km: MIN_DISTANCE_KM,
            selected_materials: BTreeSet::new(),
            selected_schedules: BTreeSet::new(),
        }
    }
}

/// Unvalidated wire form of [`FilterState`].
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawFilterState {
    max_distance_km: i32,
    selected_materials: Vec<String>,
    selected_schedules: Vec<ScheduleFilter>,
}

impl From<RawFilterState> for FilterState {
    fn from(raw: RawFilterState) -> Self {
        let mut state = Self::default();
        state.set_max_distance(raw.max_distance_km);
        for tag in &raw.selected_materials {
            state.toggle_material(tag, true);
        }
        for filter in raw.selected_schedules {
            state.toggle_schedule(filter, true);
        }
        state
    }
}

impl FilterState {
    /// Radius chosen on the slider, always within the slider bounds.
    #[must_use]
    pub fn max_distance_km(&self) -> u8 {
        self.max_distance_km
    }

    /// Selected material tags, lower-cased.
    #[must_use]
    pub fn selected_materials(&self) -> &BTreeSet<String> {
        &self.selected_materials
    }

    /// Selected schedule categories.
    #[must_use]
    pub fn selected_schedules(&self) -> &BTreeSet<ScheduleFilter> {
        &self.selected_schedules
    }

    /// Whether `tag` is currently selected, ignoring case.
    #[must_use]
    pub fn is_material_selected(&self, tag: &str) -> bool {
        self.selected_materials.contains(&tag.to_lowercase())
    }

    /// Whether `filter` is currently selected.
    #[must_use]
    pub fn is_schedule_selected(&self, filter: &ScheduleFilter) -> bool {
        self.selected_schedules.contains(filter)
    }

    /// Select or deselect a material tag.
    ///
    /// Returns `true` when membership changed.
    pub fn toggle_material(&mut self, tag: &str, selected: bool) -> bool {
        let tag = tag.to_lowercase();
        if selected {
            self.selected_materials.insert(tag)
        } else {
            self.selected_materials.remove(&tag)
        }
    }

    /// Select or deselect a schedule category.
    ///
    /// Unknown tags are kept but never match a point. Returns `true` when membership changed.
    pub fn toggle_schedule<F: Into<ScheduleFilter>>(&mut self, filter: F, selected: bool) -> bool {
        let filter = filter.into();
        if selected {
            self.selected_schedules.insert(filter)
        } else {
            self.selected_schedules.remove(&filter)
        }
    }

    /// Set the slider radius, clamping out-of-range input.
    pub fn set_max_distance(&mut self, km: i32) {
        let clamped = km.clamp(i32::from(MIN_DISTANCE_KM), i32::from(MAX_DISTANCE_KM));
        self.max_distance_km = u8::try_from(clamped).unwrap_or(MIN_DISTANCE_KM);
    }

    /// Number of selected materials plus selected schedules.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.selected_materials.len() + self.selected_schedules.len()
    }
}

/// Whether a schedule category applies to a free-text schedule.
///
/// `schedule_text` must already be lower-cased.
#[inline]
fn schedule_matches(filter: &ScheduleFilter, schedule_text: &str) -> bool {
    match filter {
        ScheduleFilter::AllDay => schedule_text.contains("24 horas"),
        ScheduleFilter::Commercial => {
            schedule_text.contains("8:00") || schedule_text.contains("9:00")
        }
        ScheduleFilter::Weekends => schedule_text.contains("sáb") || schedule_text.contains("dom"),
        ScheduleFilter::Weekdays => {
            schedule_text.contains("lun-vie") || schedule_text.contains("lun-fri")
        }
        ScheduleFilter::Other(_) => false,
    }
}

/// Check if a point passes the material and schedule filters.
///
/// Each category is OR-ed internally and an empty category passes. The slider
/// radius is not consulted here.
#[must_use]
pub fn matches(point: &Point, state: &FilterState) -> bool {
    // Material test: substring match, so "vid" also selects "Vidrio"
    if !state.selected_materials.is_empty() {
        let materials: Vec<String> = point
            .materials
            .iter()
            .map(|material| material.to_lowercase())
            .collect();
        let has_material = state.selected_materials.iter().any(|wanted| {
            materials
                .iter()
                .any(|material| material.contains(wanted.as_str()))
        });
        if !has_material {
            return false;
        }
    }

    if !state.selected_schedules.is_empty() {
        let schedule = point.schedule_text.to_lowercase();
        let has_schedule = state
            .selected_schedules
            .iter()
            .any(|filter| schedule_matches(filter, &schedule));
        if !has_schedule {
            return false;
        }
    }

    true
}

/// Points matching `state`, in their input order.
pub fn compute_visible_points<'points>(
    points: &'points [Point],
    state: &'points FilterState,
) -> impl Iterator<Item = &'points Point> + 'points {
    points.iter().filter(move |point| matches(point, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointId;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new("p1", "Punto Verde Palermo", &["Vidrio"], "Lun-Vie 8:00-18:00"),
            Point::new("p2", "Ecopunto Belgrano", &["Plástico"], "Abierto 24 horas"),
            Point::new(
                "p3",
                "Centro Verde Barracas",
                &["Papel", "Cartón"],
                "Sáb-Dom 9:00-13:00",
            ),
        ]
    }

    #[test]
    fn toggling_twice_is_idempotent() {
        let mut state = FilterState::default();
        assert!(state.toggle_material("vidrio", true));
        let once = state.clone();
        assert!(!state.toggle_material("vidrio", true));
        assert_eq!(state, once);
    }

    #[test]
    fn toggle_on_then_off_restores_selection() {
        let mut state = FilterState::default();
        state.toggle_material("papel", true);
        let before = state.selected_materials().clone();

        state.toggle_material("vidrio", true);
        state.toggle_material("vidrio", false);

        assert_eq!(state.selected_materials(), &before);
    }

    #[test]
    fn material_selection_ignores_case() {
        let mut state = FilterState::default();
        state.toggle_material("Vidrio", true);
        state.toggle_material("VIDRIO", true);
        assert_eq!(state.selected_materials().len(), 1);
        assert!(state.is_material_selected("vidrio"));
    }

    #[test]
    fn removing_absent_tag_is_a_no_op() {
        let mut state = FilterState::default();
        assert!(!state.toggle_schedule("fines", false));
        assert!(state.selected_schedules().is_empty());
    }

    #[test]
    fn distance_is_clamped() {
        let mut state = FilterState::default();
        assert_eq!(state.max_distance_km(), 1);

        state.set_max_distance(0);
        assert_eq!(state.max_distance_km(), 1);

        state.set_max_distance(99);
        assert_eq!(state.max_distance_km(), 20);

        state.set_max_distance(-5);
        assert_eq!(state.max_distance_km(), 1);

        state.set_max_distance(7);
        assert_eq!(state.max_distance_km(), 7);
    }

    #[test]
    fn deserialized_state_is_normalised() {
        let raw = "max_distance_km = 99\nselected_materials = [\"VIDRIO\", \"vidrio\"]\n";
        let state: FilterState = toml::from_str(raw).expect("filter state parses");

        assert_eq!(state.max_distance_km(), 20);
        assert_eq!(state.selected_materials().len(), 1);
        assert!(state.is_material_selected("vidrio"));

        let point = Point::new("p1", "Punto Verde Palermo", &["Vidrio"], "Lun-Vie 8:00-18:00");
        assert!(matches(&point, &state));
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let state: FilterState =
            toml::from_str("max_distance_km = -4\n").expect("filter state parses");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn material_filter_selects_matching_points() {
        let points = vec![
            Point::new("p1", "P1", &["Vidrio"], ""),
            Point::new("p2", "P2", &["Plástico"], ""),
        ];
        let mut state = FilterState::default();
        state.toggle_material("vidrio", true);

        let visible: Vec<&PointId> = compute_visible_points(&points, &state)
            .map(|point| &point.id)
            .collect();
        assert_eq!(visible, vec![&PointId("p1".to_owned())]);
    }

    #[test]
    fn material_filter_uses_substring_match() {
        let point = Point::new("p1", "P1", &["Vidrio verde"], "");
        let mut state = FilterState::default();
        state.toggle_material("vid", true);
        assert!(matches(&point, &state));
    }

    #[test]
    fn all_day_schedule() {
        let point = Point::new("q", "Q", &[], "Abierto 24 horas");
        let mut state = FilterState::default();

        state.toggle_schedule("24h", true);
        assert!(matches(&point, &state));

        state.toggle_schedule("24h", false);
        state.toggle_schedule("fines", true);
        assert!(!matches(&point, &state));
    }

    #[test]
    fn schedule_predicates_ignore_case() {
        let points = sample_points();
        let mut state = FilterState::default();
        state.toggle_schedule(ScheduleFilter::Weekends, true);

        let names: Vec<&str> = compute_visible_points(&points, &state)
            .map(|point| point.name.as_str())
            .collect();
        assert_eq!(names, vec!["Centro Verde Barracas"]);
    }

    #[test]
    fn commercial_schedule_matches_morning_openings() {
        let points = sample_points();
        let mut state = FilterState::default();
        state.toggle_schedule(ScheduleFilter::Commercial, true);

        assert_eq!(compute_visible_points(&points, &state).count(), 2);
    }

    #[test]
    fn unknown_schedule_never_matches() {
        let points = sample_points();
        let mut state = FilterState::default();
        state.toggle_schedule("nocturno", true);

        assert_eq!(compute_visible_points(&points, &state).count(), 0);
    }

    #[test]
    fn categories_are_and_combined() {
        let points = sample_points();
        let mut state = FilterState::default();
        state.toggle_material("vidrio", true);
        state.toggle_material("papel", true);
        state.toggle_schedule(ScheduleFilter::Weekdays, true);

        let names: Vec<&str> = compute_visible_points(&points, &state)
            .map(|point| point.name.as_str())
            .collect();
        assert_eq!(names, vec!["Punto Verde Palermo"]);
    }

    #[test]
    fn empty_filters_show_everything_in_order() {
        let points = sample_points();
        let state = FilterState::default();

        let visible: Vec<&Point> = compute_visible_points(&points, &state).collect();
        let expected: Vec<&Point> = points.iter().collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn distance_does_not_affect_visibility() {
        let mut points = sample_points();
        for point in &mut points {
            point.distance_km = Some(4.9);
        }
        let state = FilterState::default();

        assert_eq!(compute_visible_points(&points, &state).count(), points.len());
    }

    #[test]
    fn active_filter_count_sums_both_categories() {
        let mut state = FilterState::default();
        state.toggle_material("vidrio", true);
        state.toggle_material("papel", true);
        state.toggle_schedule("24h", true);
        assert_eq!(state.active_filter_count(), 3);
    }
}
