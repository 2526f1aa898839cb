use crate::app::{App, CardFace, GRID_COLUMNS, SKELETON_CARDS};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_board(frame, root[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
    if app.congrats.is_some() {
        draw_congrats(frame, app);
    }
    if app.name_prompt.is_some() {
        draw_name_prompt(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;
    let title = format!("Play the Flip card game | Hint: {}", app.next_hint());
    let mut score = vec![
        Span::raw(format!("Moves: {}  ", engine.moves())),
        Span::raw(format!("Hits: {}  ", engine.hits())),
        Span::raw(format!("Misses: {}", engine.misses())),
    ];
    if let Some(best) = engine.best_score() {
        score.push(Span::raw(format!("  Best Score: {best}")));
    }
    let lines = vec![
        Line::from(title.bold()),
        Line::from("Select two cards with the same content consecutively"),
        Line::from(format!(
            "Your name: {}",
            engine.player_name().unwrap_or("-")
        )),
        Line::from(score),
        Line::from(format!(
            "Face: {}",
            app.card_artifact(app.cursor).unwrap_or("-")
        )),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Flip");
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Cards [{}]", app.engine.phase().label()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let count = app.card_count();
    let loading = count == 0;
    let cells = if loading { SKELETON_CARDS } else { count };
    let rows = cells.div_ceil(GRID_COLUMNS);
    let lines: Vec<Line<'_>> = (0..rows)
        .map(|row| {
            let spans: Vec<Span<'_>> = (0..GRID_COLUMNS)
                .map(|col| row * GRID_COLUMNS + col)
                .filter(|idx| *idx < cells)
                .map(|idx| {
                    if loading {
                        let style = Style::default().fg(Color::DarkGray);
                        Span::styled(" [░░░░░░░░] ", style)
                    } else {
                        card_span(app, idx)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    let mut text = lines;
    if loading {
        text.push(Line::from(""));
        text.push(Line::from("loading cards..."));
    }
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn card_span(app: &App, position: usize) -> Span<'static> {
    let mut style = match app.card_face(position) {
        CardFace::Hidden => Style::default().fg(Color::Cyan),
        CardFace::Revealed(_) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        CardFace::Cleared(_) => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    };
    if app.engine.is_input_locked() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if position == app.cursor {
        style = style.bg(Color::Blue);
    }
    Span::styled(format!(" [{}] ", app.card_label(position)), style)
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Events");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("arrows/hjkl move | enter/space reveal"),
        Line::from("r restart | ? help | q quit"),
        Line::from("esc closes dialogs"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_congrats(frame: &mut Frame, app: &App) {
    let Some(congrats) = app.congrats.as_ref() else {
        return;
    };
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(
            format!(
                "Hurray!!! You completed the challenge {}",
                congrats.player_name.as_deref().unwrap_or("")
            )
            .bold(),
        ),
        Line::from(""),
        Line::from(format!(
            "You completed the game in {} moves. Your best score is {} moves.",
            congrats.moves, congrats.best_score
        )),
        Line::from(""),
        Line::from("Enter=restart  Esc=close"),
    ];
    let block = Block::default()
        .title("Congratulations")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_name_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);
    let input = app.name_prompt.as_deref().unwrap_or_default();
    let save_hint = if app.can_submit_name() {
        Span::styled("Enter=save", Style::default().fg(Color::Green))
    } else {
        Span::styled("Enter=save", Style::default().fg(Color::DarkGray))
    };
    let lines = vec![
        Line::from("Please, type your name before playing"),
        Line::from(""),
        Line::from(format!("> {input}")),
        Line::from(""),
        Line::from(save_hint),
    ];
    let block = Block::default()
        .title("Type your name")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
