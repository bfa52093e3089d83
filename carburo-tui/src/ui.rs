use carburo_core::{schedule::WeekInstant, render::StationView};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Labeled, Picker, Screen};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, selection summary, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, summary_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new(format!(
        "carburo – fuel prices from {}",
        app.service.provider().name
    ))
    .block(Block::default().borders(Borders::ALL).title("Carburo"));
    frame.render_widget(header, *header_area);

    draw_summary(frame, app, *summary_area);

    // Main screen
    match app.screen {
        Screen::ProvinceSelect => draw_picker(
            frame,
            &app.provinces,
            "Province (type to filter, Enter)",
            "Loading provinces…",
            *content_area,
        ),
        Screen::MunicipalitySelect => {
            let empty_text = if app.selection.province().is_some() {
                "Loading municipalities…"
            } else {
                "Select a province first (← back)"
            };
            draw_picker(
                frame,
                &app.municipalities,
                "Municipality (type to filter, Enter)",
                empty_text,
                *content_area,
            );
        }
        Screen::FuelTypeSelect => draw_picker(
            frame,
            &app.fuel_types,
            "Fuel type (type to filter, Enter)",
            "Loading fuel types…",
            *content_area,
        ),
        Screen::Results => draw_results(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::ProvinceSelect => {
            "↑/↓ move · type to filter · Enter select · Tab/→ next · Del clear · Ctrl-O open now · Esc/Ctrl-C quit"
        }
        Screen::MunicipalitySelect | Screen::FuelTypeSelect => {
            "↑/↓ move · type to filter · Enter select · Tab/→ next · ←/Esc back · Del clear · Ctrl-O open now"
        }
        Screen::Results => "↑/↓ scroll · o open now · r refresh · ←/Esc/b back · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading() {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_summary(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let open_only = if app.selection.open_only() { "[x]" } else { "[ ]" };
    let summary = format!(
        "Province: {} · Municipality: {} · Fuel: {} · {open_only} open now",
        app.province_name().unwrap_or("–"),
        app.municipality_name().unwrap_or("–"),
        app.fuel_type_name().unwrap_or("–"),
    );

    let paragraph = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title("Selection"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_picker<T: Labeled>(
    frame: &mut Frame<'_>,
    picker: &Picker<T>,
    title: &str,
    empty_text: &str,
    area: Rect,
) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter
            Constraint::Min(0),    // entries
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [filter_area, list_area] = chunks else {
        return;
    };

    let filter = Paragraph::new(picker.filter())
        .block(Block::default().borders(Borders::ALL).title("Filter"));
    frame.render_widget(filter, *filter_area);

    let visible = picker.visible();
    let items = if picker.is_empty() {
        vec![ListItem::new(empty_text.to_owned())]
    } else if visible.is_empty() {
        vec![ListItem::new("Nothing matches the filter.")]
    } else {
        visible
            .iter()
            .map(|item| ListItem::new(item.label().to_owned()))
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(picker.index()));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);
}

fn draw_results(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = match app.evaluated_at {
        Some(at) if app.selection.open_only() => {
            format!("Stations open at {} (←/b to go back)", instant_label(at))
        }
        _ => "Stations (←/b to go back)".to_owned(),
    };

    if let Some(message) = app.results.message() {
        let text = if app.station_request.is_pending() {
            "Loading stations…"
        } else {
            message
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app
        .results
        .stations()
        .iter()
        .enumerate()
        .map(|(idx, station)| {
            let mut style = Style::default().fg(open_color(station));
            if idx == app.result_index {
                style = style.add_modifier(Modifier::REVERSED);
            }

            Row::new(vec![
                Cell::from(format!("{} €", station.price)),
                Cell::from(open_label(station)),
                Cell::from(station.brand.clone().unwrap_or_default()),
                Cell::from(station.address.clone()),
                Cell::from(format!("{} ({})", station.locality, station.province)),
                Cell::from(station.schedule.clone()),
            ])
            .style(style)
        });

    let column_widths = [
        Constraint::Length(9),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Min(24),
        Constraint::Length(24),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Price", "Open", "Brand", "Address", "Locality", "Schedule"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn open_label(station: &StationView) -> &'static str {
    match station.open_now {
        Some(true) => "open",
        Some(false) => "closed",
        None => "?",
    }
}

fn open_color(station: &StationView) -> Color {
    match station.open_now {
        Some(true) => Color::Green,
        Some(false) => Color::Gray,
        None => Color::Magenta,
    }
}

fn instant_label(at: WeekInstant) -> String {
    let day = WEEKDAYS
        .get(usize::from(at.day()))
        .copied()
        .unwrap_or("?");
    format!("{day} {:02}:{:02}", at.minute() / 60, at.minute() % 60)
}
