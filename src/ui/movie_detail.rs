use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::types::Movie;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(movie) = &app.current_movie else {
        let block = Block::default().borders(Borders::ALL).title("Movie");
        let empty = Paragraph::new("No movie selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_header(frame, movie, &app.image_base_url, chunks[0]);
    render_overview(frame, movie, app.scroll_offset, chunks[1]);
}

fn release_label(movie: &Movie) -> String {
    match movie.release() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None if movie.release_date.is_empty() => "Unknown".to_string(),
        None => movie.release_date.clone(),
    }
}

fn render_header(frame: &mut Frame, movie: &Movie, image_base_url: &str, area: Rect) {
    let poster = movie
        .poster_url(image_base_url)
        .unwrap_or_else(|| "none".to_string());

    let lines = vec![
        Line::from(Span::styled(
            movie.title().unwrap_or("No Title").to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("★ {:.1}", movie.vote_average),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled("Release Date: ", Style::default().fg(Color::Gray)),
            Span::raw(release_label(movie)),
        ]),
        Line::from(vec![
            Span::styled("Poster: ", Style::default().fg(Color::Gray)),
            Span::styled(poster, Style::default().fg(Color::Cyan)),
        ]),
    ];

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(header, area);
}

fn render_overview(frame: &mut Frame, movie: &Movie, scroll: u16, area: Rect) {
    let text = if movie.overview.is_empty() {
        "No overview available."
    } else {
        movie.overview.as_str()
    };

    let body = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::ALL).title("Overview"))
        .wrap(Wrap { trim: true })
        .scroll((scroll, 0));
    frame.render_widget(body, area);
}
