mod movie_detail;
pub mod movie_grid;
mod suggestions;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::MovieList => movie_grid::render(frame, app, chunks[1]),
        Screen::MovieDetail => movie_detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::MovieList => {
            let query = app.list.query().trim();
            if query.is_empty() {
                "flick - Popular movies".to_string()
            } else {
                format!("flick - Search: {}", truncate(query, 50))
            }
        }
        Screen::MovieDetail => match app.current_movie.as_ref().and_then(|m| m.title()) {
            Some(title) => format!("flick - {}", truncate(title, 60)),
            None => "flick - Movie Details".to_string(),
        },
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )])
    } else if app.screen == Screen::MovieList && app.list.is_loading() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.screen {
            Screen::MovieList if app.search_focused => {
                "type to search | Up/Down: suggestions | Enter: search | Esc: done"
            }
            Screen::MovieList => {
                "/: search | hjkl: move | Enter: details | n: more | r: reload | q: quit"
            }
            Screen::MovieDetail => "j/k: scroll | o: open in browser | y: copy URL | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Shorten to at most `max` chars, marking the cut with "...".
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate("Alien", 10), "Alien");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("The Lord of the Rings", 10), "The Lor...");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("Amélie Poulain", 6), "Amé...");
    }
}
