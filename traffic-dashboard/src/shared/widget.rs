//! Ratatui display surface for the traffic dashboard

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::{
    acquisition::SnapshotSource, app::DashboardApp, mode::ConnectionMode,
    websocket::ConnectionStatus,
};

const C_BG: Color = Color::Rgb(15, 15, 25);
const C_DIM: Color = Color::Rgb(128, 128, 150);
const C_BRIGHT: Color = Color::Rgb(230, 230, 240);
const C_ACCENT: Color = Color::Rgb(100, 149, 237);
const C_GOLD: Color = Color::Rgb(255, 215, 0);
const C_UP: Color = Color::Rgb(0, 255, 127);
const C_DOWN: Color = Color::Rgb(255, 69, 58);

/// Draw the whole dashboard
pub fn render_dashboard(f: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(f.area());

    render_status_bar(f, chunks[0], app);

    let Some(fields) = app.fields.as_ref() else {
        let waiting = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for data...",
                Style::default().fg(C_DIM).add_modifier(Modifier::ITALIC),
            )),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().bg(C_BG));
        f.render_widget(waiting, chunks[1]);
        render_toggle(f, chunks[4], app);
        return;
    };

    let counts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);
    render_tile(f, counts[0], "MAIN ROUTE", &fields.main_count, C_BRIGHT);
    render_tile(f, counts[1], "CORRIDOR", &fields.corridor_count, C_BRIGHT);
    render_tile(f, counts[2], "AMBULANCES", &fields.amb_count, C_BRIGHT);
    render_tile(
        f,
        counts[3],
        "AMB VIOLATION",
        &fields.violation_status,
        fields.violation_tone.color(),
    );

    let readings = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[2]);
    render_tile(f, readings[0], "LATENCY", &fields.latency, C_ACCENT);
    render_tile(f, readings[1], "OVER 2%", &fields.over2, C_ACCENT);
    render_tile(f, readings[2], "CO2", &fields.co2, C_ACCENT);

    let corridor = Paragraph::new(Line::from(Span::styled(
        fields.corridor_status.as_str(),
        Style::default()
            .fg(fields.corridor_tone.color())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(fields.corridor_tone.color()))
            .title_top(Line::from(" CORRIDOR STATUS ").alignment(Alignment::Center))
            .style(Style::default().bg(C_BG)),
    );
    f.render_widget(corridor, chunks[3]);

    render_toggle(f, chunks[4], app);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let (symbol, status_color) = match app.status {
        ConnectionStatus::Connected => ("●", C_UP),
        ConnectionStatus::Connecting => ("◌", C_GOLD),
        ConnectionStatus::Disconnected => ("○", C_DOWN),
    };

    let mode_color = match app.mode {
        ConnectionMode::Live => C_UP,
        ConnectionMode::Mock => C_GOLD,
    };

    let updated = match (app.last_update, app.source) {
        (Some(time), Some(source)) => Span::styled(
            format!(" ⏱  {} {} ", time.format("%H:%M:%S"), source.as_str()),
            Style::default().fg(source_color(source)),
        ),
        _ => Span::styled(" ⏱  --:--:-- ", Style::default().fg(C_DIM)),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} {} ", symbol, app.status.as_str()),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" MODE {} ", app.mode),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        ),
        updated,
        Span::styled(
            " ◆ CORRIDOR TRAFFIC MONITOR ◆ ",
            Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" [M] Toggle  [Q] Quit ", Style::default().fg(C_DIM)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(138, 43, 226)))
        .style(Style::default().bg(Color::Rgb(18, 18, 28)));

    f.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_tile(f: &mut Frame, area: Rect, title: &str, value: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title_top(
            Line::from(Span::styled(
                format!(" {} ", title),
                Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
        )
        .style(Style::default().bg(C_BG));

    let paragraph = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(paragraph, area);
}

fn render_toggle(f: &mut Frame, area: Rect, app: &DashboardApp) {
    let counts = format!("  live {} / mock {}", app.live_count, app.mock_count);

    let line = Line::from(vec![
        Span::styled(
            format!("[ {} ]", app.toggle_label),
            Style::default()
                .fg(Color::Rgb(18, 18, 28))
                .bg(C_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(counts, Style::default().fg(C_DIM)),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Colour used for a snapshot source marker
pub fn source_color(source: SnapshotSource) -> Color {
    match source {
        SnapshotSource::Live => C_UP,
        SnapshotSource::Mock => C_GOLD,
    }
}
