use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ecopunto_core::model::ViewMode;

use crate::app::{App, FilterItem, Focus, GRID_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    // Details popup swallows everything but its close keys
    if app.show_details {
        if matches!(key.code, Esc | Enter | Backspace | Char('d')) {
            app.show_details = false;
        }
        return Action::None;
    }

    match key.code {
        Char('l') => {
            app.switch_view(ViewMode::List);
            return Action::None;
        }
        Char('g') => {
            app.switch_view(ViewMode::Grid);
            return Action::None;
        }
        Char('m') => {
            app.start_locate();
            return Action::None;
        }
        Char('c') => {
            app.cancel_locate();
            return Action::None;
        }
        Char('f') => {
            app.toggle_fullscreen();
            return Action::None;
        }
        Char('a') => {
            app.apply_filters();
            return Action::None;
        }
        Tab if !app.fullscreen => {
            app.focus = match app.focus {
                Focus::Filters => Focus::Points,
                Focus::Points => Focus::Filters,
            };
            return Action::None;
        }
        _ => {}
    }

    match app.focus {
        Focus::Filters => match key.code {
            Up | Char('k') => {
                app.filter_index = app.filter_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.filter_index + 1 < app.filter_items.len() {
                    app.filter_index += 1;
                }
            }
            Char(' ') => {
                app.toggle_current_filter();
            }
            Left | Char('-') => {
                if app.current_filter() == Some(&FilterItem::Distance) {
                    app.adjust_distance(-1);
                }
            }
            Right | Char('+') => {
                if app.current_filter() == Some(&FilterItem::Distance) {
                    app.adjust_distance(1);
                }
            }
            Enter => {
                app.apply_filters();
            }
            _ => {}
        },

        Focus::Points => {
            let row_step = match app.browser.view() {
                ViewMode::List => 1,
                ViewMode::Grid => isize::try_from(GRID_COLUMNS).unwrap_or(1),
            };
            match key.code {
                Up | Char('k') => app.move_point_selection(-row_step),
                Down | Char('j') => app.move_point_selection(row_step),
                Left => app.move_point_selection(-1),
                Right => app.move_point_selection(1),
                Enter | Char('d') => {
                    app.show_details = app.selected_point().is_some();
                }
                _ => {}
            }
        }
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use ecopunto_core::engine::{BrowserSettings, PointBrowser};
    use ecopunto_core::model::Point;
    use ecopunto_provider_local::FixedLocation;

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

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn distance_row(app: &App) -> usize {
        app.filter_items
            .iter()
            .position(|item| *item == FilterItem::Distance)
            .expect("distance row")
    }

    #[test]
    fn arrows_move_the_slider_only_on_the_distance_row() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.browser.state().max_distance_km(), 1);
        assert_eq!(app.browser.active_filter_count(), 0);

        app.filter_index = distance_row(&app);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.browser.state().max_distance_km(), 3);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.browser.state().max_distance_km(), 2);
    }

    #[test]
    fn tab_is_ignored_in_fullscreen() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Points);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Filters);

        press(&mut app, KeyCode::Char('f'));
        assert!(app.fullscreen);
        assert_eq!(app.focus, Focus::Points);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Points);
    }

    #[test]
    fn details_popup_swallows_keys_until_closed() {
        let mut app = app();
        app.focus = Focus::Points;
        press(&mut app, KeyCode::Enter);
        assert!(app.show_details);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Tab);
        assert!(app.show_details);
        assert_eq!(app.point_index, 0);
        assert_eq!(app.browser.view(), ViewMode::List);
        assert_eq!(app.focus, Focus::Points);

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_details);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.show_details);
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.show_details);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_not() {
        let mut app = app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &mut app), Action::Quit);
        assert_eq!(press(&mut app, KeyCode::Char('c')), Action::None);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = app();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('q'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(handle_key_event(release, &mut app), Action::None);
    }

    #[tokio::test(start_paused = true)]
    async fn c_cancels_a_pending_lookup() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.is_busy());

        press(&mut app, KeyCode::Char('c'));
        assert!(!app.is_busy());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Location lookup cancelled")
        );
    }

    #[test]
    fn grid_rows_step_by_column_count() {
        let mut app = app();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.browser.view(), ViewMode::Grid);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.point_index, GRID_COLUMNS);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.point_index, 0);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.point_index, 1);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.point_index, 2);
    }
}
