use ecopunto_core::{
    distance::format_distance,
    model::{Point, ViewMode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, FilterItem, Focus, GRID_COLUMNS};

/// Height of one card in grid view, borders included.
const CARD_HEIGHT: u16 = 6;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new(format!(
        "ecopunto – recycling drop-off points · {}",
        app.catalog_name
    ))
    .block(Block::default().borders(Borders::ALL).title("Ecopunto"));
    frame.render_widget(header, *header_area);

    if app.fullscreen {
        draw_points(frame, app, *content_area);
    } else {
        let column_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0)])
            .split(*content_area);
        let columns = column_chunks.as_ref();
        let [filters_area, points_area] = columns else {
            return;
        };
        draw_filters(frame, app, *filters_area);
        draw_points(frame, app, *points_area);
    }

    draw_status(frame, app, *status_area);

    if app.show_details {
        draw_details(frame, app, area);
    }
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = if app.show_details {
        "Esc/Enter close details · q/Ctrl-C quit"
    } else {
        match app.focus {
            Focus::Filters => concat!(
                "↑/↓ move · Space toggle · ←/→ distance · Enter/a apply · Tab points",
                " · m locate · l/g view · f fullscreen · q quit"
            ),
            Focus::Points => concat!(
                "↑/↓ move · Enter/d details · a apply · Tab filters",
                " · m locate · l/g view · f fullscreen · q quit"
            ),
        }
    };

    let status_text = if app.is_busy() {
        format!("Getting your location… (c cancels) · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else if let Some(msg) = &app.status_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_busy() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn draw_filters(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Filters;
    let state = app.browser.state();

    let mut materials = Vec::new();
    let mut schedules = Vec::new();
    for (idx, item) in app.filter_items.iter().enumerate() {
        let cursor = if focused && idx == app.filter_index {
            "> "
        } else {
            "  "
        };
        let mark = if item.is_checked(state) { "[x]" } else { "[ ]" };
        match item {
            FilterItem::Material(tag) => {
                materials.push(ListItem::new(format!("{cursor}{mark} {tag}")));
            }
            FilterItem::Schedule(filter) => {
                schedules.push(ListItem::new(format!("{cursor}{mark} {}", filter.label())));
            }
            FilterItem::Distance => {}
        }
    }

    let material_height = u16::try_from(materials.len()).unwrap_or(u16::MAX).saturating_add(2);
    let schedule_height = u16::try_from(schedules.len()).unwrap_or(u16::MAX).saturating_add(2);

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(material_height),
            Constraint::Length(schedule_height),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [material_area, schedule_area, distance_area, apply_area, _rest] = chunks else {
        return;
    };

    frame.render_widget(
        List::new(materials).block(Block::default().borders(Borders::ALL).title("Materials")),
        *material_area,
    );
    frame.render_widget(
        List::new(schedules).block(Block::default().borders(Borders::ALL).title("Opening hours")),
        *schedule_area,
    );

    let slider_focused = focused && app.current_filter() == Some(&FilterItem::Distance);
    let slider_title = if slider_focused {
        "> Distance (←/→)"
    } else {
        "Distance"
    };
    let slider = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(slider_title))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(app.browser.distance_fill_percent() / 100.0)
        .label(app.browser.distance_label());
    frame.render_widget(slider, *distance_area);

    let pending = app.browser.active_filter_count();
    let (apply_text, apply_color) = if pending > 0 {
        (format!("Apply filters ({pending})"), Color::Yellow)
    } else {
        ("Apply filters".to_owned(), Color::Green)
    };
    let apply = Paragraph::new(apply_text)
        .style(Style::default().fg(apply_color).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Enter / a"));
    frame.render_widget(apply, *apply_area);
}

fn draw_points(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let shown = app.visible_count();
    let total = app.browser.points().len();
    let view = match app.browser.view() {
        ViewMode::List => "list",
        ViewMode::Grid => "grid",
    };
    let order = if app.browser.last_fix().is_some() {
        " · nearest first"
    } else {
        ""
    };
    let title = format!("Points ({shown} of {total}) · {view} view{order}");

    if shown == 0 {
        let paragraph = Paragraph::new("No points match the applied filters.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    match app.browser.view() {
        ViewMode::List => draw_point_list(frame, app, area, title),
        ViewMode::Grid => draw_point_grid(frame, app, area, title),
    }
}

fn card_lines(point: &Point) -> Vec<Line<'_>> {
    let mut heading = vec![Span::styled(
        point.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(distance) = point.distance_km {
        heading.push(Span::styled(
            format!("  {}", format_distance(distance)),
            Style::default().fg(Color::Green),
        ));
    }

    vec![
        Line::from(heading),
        Line::from(point.address.as_deref().unwrap_or("")),
        Line::from(format!("Accepts: {}", point.materials.join(", "))),
        Line::from(format!("Hours: {}", point.schedule_text)),
    ]
}

fn draw_point_list(frame: &mut Frame<'_>, app: &App, area: Rect, title: String) {
    let items = app
        .browser
        .visible_points()
        .map(|point| ListItem::new(Text::from(card_lines(point))))
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if app.focus == Focus::Points {
        state.select(Some(app.point_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_point_grid(frame: &mut Frame<'_>, app: &App, area: Rect, title: String) {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let points: Vec<&Point> = app.browser.visible_points().collect();
    let rows_fit = usize::from((inner.height / CARD_HEIGHT).max(1));
    let selected_row = app.point_index / GRID_COLUMNS;
    let first_row = selected_row.saturating_sub(rows_fit - 1);

    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows_fit])
        .split(inner);

    let columns = u32::try_from(GRID_COLUMNS).unwrap_or(1);
    let rows = points.chunks(GRID_COLUMNS).enumerate().skip(first_row);

    for (row_area, (row_idx, row)) in row_chunks.iter().zip(rows) {
        let cell_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns); GRID_COLUMNS])
            .split(*row_area);

        for (cell_area, (col_idx, point)) in cell_chunks.iter().zip(row.iter().enumerate()) {
            let selected =
                app.focus == Focus::Points && row_idx * GRID_COLUMNS + col_idx == app.point_index;
            let border_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let card = Paragraph::new(Text::from(card_lines(point)))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(card, *cell_area);
        }
    }
}

fn draw_details(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(point) = app.selected_point() else {
        return;
    };

    let distance = point.distance_km.map_or_else(
        || "unknown (press m to use your location)".to_owned(),
        format_distance,
    );
    let fix = app.browser.last_fix().map_or_else(
        || "no location yet".to_owned(),
        |fix| {
            format!(
                "{:.4}, {:.4} at {}",
                fix.latitude,
                fix.longitude,
                fix.acquired_at.format("%H:%M:%S")
            )
        },
    );

    let lines = vec![
        Line::from(Span::styled(
            point.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Address:   {}", point.address.as_deref().unwrap_or("-"))),
        Line::from(format!("Accepts:   {}", point.materials.join(", "))),
        Line::from(format!("Hours:     {}", point.schedule_text)),
        Line::from(format!("Distance:  {distance}")),
        Line::from(format!("Location:  {fix}")),
        Line::from(format!("Id:        {}", point.id)),
    ];

    let popup_area = centered(area, 60, 50);
    let popup = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Details (Esc to close)"),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let scale = |length: u16, percent: u16| {
        u16::try_from(u32::from(length) * u32::from(percent) / 100).unwrap_or(length)
    };
    let width = scale(area.width, width_percent);
    let height = scale(area.height, height_percent).max(10).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
