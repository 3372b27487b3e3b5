use std::sync::Arc;
use std::time::Duration;

use ecopunto_core::{
    engine::PointBrowser,
    filter::FilterState,
    locate::LocateTask,
    model::{KNOWN_MATERIALS, Point, ScheduleFilter, ViewMode},
    ports::LocationPort,
};
use rand::Rng;

/// Cards per row in grid view.
pub(crate) const GRID_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Filters,
    Points,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterItem {
    Material(&'static str),
    Schedule(ScheduleFilter),
    Distance,
}

impl FilterItem {
    pub(crate) fn is_checked(&self, state: &FilterState) -> bool {
        match self {
            FilterItem::Material(tag) => state.is_material_selected(tag),
            FilterItem::Schedule(filter) => state.is_schedule_selected(filter),
            FilterItem::Distance => false,
        }
    }
}

pub(crate) struct App {
    pub browser: PointBrowser,
    pub catalog_name: String,

    pub location: Arc<dyn LocationPort>,
    pub locate: LocateTask,
    pub search_delay: Duration,

    pub focus: Focus,
    pub filter_items: Vec<FilterItem>,
    pub filter_index: usize,
    pub point_index: usize,

    pub fullscreen: bool,
    pub show_details: bool,

    pub status_message: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        browser: PointBrowser,
        catalog_name: String,
        location: Arc<dyn LocationPort>,
        search_delay: Duration,
    ) -> Self {
        let filter_items = KNOWN_MATERIALS
            .iter()
            .map(|&tag| FilterItem::Material(tag))
            .chain(ScheduleFilter::KNOWN.into_iter().map(FilterItem::Schedule))
            .chain(std::iter::once(FilterItem::Distance))
            .collect();

        Self {
            browser,
            catalog_name,
            location,
            locate: LocateTask::new(),
            search_delay,
            focus: Focus::Filters,
            filter_items,
            filter_index: 0,
            point_index: 0,
            fullscreen: false,
            show_details: false,
            status_message: None,
            error_message: None,
        }
    }

    pub(crate) fn current_filter(&self) -> Option<&FilterItem> {
        self.filter_items.get(self.filter_index)
    }

    pub(crate) fn toggle_current_filter(&mut self) {
        let Some(item) = self.current_filter().cloned() else {
            return;
        };
        let selected = !item.is_checked(self.browser.state());
        match item {
            FilterItem::Material(tag) => {
                self.browser.toggle_material(tag, selected);
            }
            FilterItem::Schedule(filter) => {
                self.browser.toggle_schedule(filter, selected);
            }
            FilterItem::Distance => {}
        }
    }

    pub(crate) fn adjust_distance(&mut self, delta: i32) {
        let current = i32::from(self.browser.state().max_distance_km());
        self.browser.set_max_distance(current + delta);
    }

    pub(crate) fn apply_filters(&mut self) {
        let shown = self.browser.apply_filters();
        self.clamp_point_index();
        self.error_message = None;
        self.status_message = Some(format!(
            "{shown} of {} points shown",
            self.browser.points().len()
        ));
    }

    pub(crate) fn visible_count(&self) -> usize {
        self.browser.visible_points().count()
    }

    pub(crate) fn selected_point(&self) -> Option<&Point> {
        self.browser.visible_points().nth(self.point_index)
    }

    pub(crate) fn move_point_selection(&mut self, delta: isize) {
        let count = self.visible_count();
        if count == 0 {
            self.point_index = 0;
            return;
        }
        let target = self.point_index.saturating_add_signed(delta);
        self.point_index = target.min(count - 1);
    }

    pub(crate) fn switch_view(&mut self, mode: ViewMode) {
        if self.browser.switch_view(mode) {
            self.clamp_point_index();
        }
    }

    pub(crate) fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        if self.fullscreen {
            self.focus = Focus::Points;
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.locate.is_busy()
    }

    /// Kick off a location lookup unless one is already pending.
    pub(crate) fn start_locate(&mut self) {
        match self
            .locate
            .start(Arc::clone(&self.location), self.search_delay)
        {
            Ok(()) => {
                self.error_message = None;
                self.status_message = None;
            }
            Err(err) => {
                self.error_message = Some(err.to_string());
            }
        }
    }

    pub(crate) fn cancel_locate(&mut self) {
        if self.locate.cancel() {
            self.status_message = Some("Location lookup cancelled".into());
        }
    }

    /// Apply a finished lookup, if any. Returns `true` when one finished.
    pub(crate) fn poll_locate<R: Rng>(&mut self, rng: &mut R) -> bool {
        let Some(result) = self.locate.try_finish() else {
            return false;
        };

        match result {
            Ok(fix) => {
                let shown = self.browser.apply_location(fix, rng);
                self.point_index = 0;
                self.error_message = None;
                self.status_message = Some(format!(
                    "Sorted by distance from {:.4}, {:.4} · {shown} points shown",
                    fix.latitude, fix.longitude
                ));
            }
            Err(err) => {
                tracing::warn!(error = %err, "location lookup failed");
                self.error_message = Some(format!(
                    "Could not get your location ({err}). Check the location permission."
                ));
            }
        }
        true
    }

    fn clamp_point_index(&mut self) {
        let count = self.visible_count();
        self.point_index = self.point_index.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecopunto_core::engine::BrowserSettings;
    use ecopunto_provider_local::FixedLocation;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app() -> App {
        let points = vec![
            Point::new(
                "p1",
                "Punto Verde Palermo",
                &["Plástico", "Vidrio"],
                "Lun-Vie 8:00-18:00",
            ),
            Point::new("p2", "Ecopunto Belgrano", &["Metal"], "Abierto 24 horas"),
            Point::new("p3", "Eco San Telmo", &["Vidrio"], "Dom 10:00-19:00"),
        ];
        App::new(
            PointBrowser::new(points, BrowserSettings::default()),
            "test".to_owned(),
            Arc::new(FixedLocation::new(-34.6, -58.4)),
            Duration::from_millis(10),
        )
    }

    #[test]
    fn space_toggles_the_focused_checkbox() {
        let mut app = app();
        app.filter_index = 1; // vidrio
        app.toggle_current_filter();
        assert!(app.browser.state().is_material_selected("vidrio"));

        app.toggle_current_filter();
        assert!(!app.browser.state().is_material_selected("vidrio"));
    }

    #[test]
    fn applying_filters_clamps_the_selection() {
        let mut app = app();
        app.point_index = 2;
        app.browser.toggle_schedule(ScheduleFilter::AllDay, true);

        app.apply_filters();

        assert_eq!(app.visible_count(), 1);
        assert_eq!(app.point_index, 0);
        assert_eq!(
            app.selected_point().map(|point| point.name.as_str()),
            Some("Ecopunto Belgrano")
        );
    }

    #[test]
    fn slider_steps_stay_in_bounds() {
        let mut app = app();
        app.adjust_distance(-3);
        assert_eq!(app.browser.state().max_distance_km(), 1);
        app.adjust_distance(50);
        assert_eq!(app.browser.state().max_distance_km(), 20);
    }

    #[test]
    fn selection_moves_within_visible_points() {
        let mut app = app();
        app.move_point_selection(-1);
        assert_eq!(app.point_index, 0);
        app.move_point_selection(5);
        assert_eq!(app.point_index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn locate_reorders_points_when_finished() {
        let mut app = app();
        let mut rng = StdRng::seed_from_u64(9);

        app.start_locate();
        assert!(app.is_busy());
        app.start_locate();
        assert!(app.error_message.is_some());

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(app.poll_locate(&mut rng));
        assert!(!app.is_busy());
        assert!(app.browser.last_fix().is_some());
        assert!(app.browser.points().iter().all(|point| point.distance_km.is_some()));
    }
}
