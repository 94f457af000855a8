use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::controller::UiState;
use crate::types::Movie;

use super::{suggestions, truncate};

pub const CARD_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 4;

/// Number of grid columns that fit in `width` cells.
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// First grid row to draw so the selected row stays visible.
fn first_visible_row(selected: usize, columns: usize, visible_rows: usize) -> usize {
    let selected_row = selected / columns.max(1);
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_search_bar(frame, app, chunks[0]);

    match app.list.state() {
        UiState::Loading => render_message(frame, chunks[1], "Loading movies...", Color::Yellow),
        UiState::Error(message) => render_message(
            frame,
            chunks[1],
            &format!("{}\n\nPress r to retry", message),
            Color::Red,
        ),
        UiState::Success { movies, .. } if movies.is_empty() => {
            render_message(frame, chunks[1], "No movies found", Color::Gray)
        }
        UiState::Success {
            movies,
            has_next_page,
        } => render_grid(frame, app, movies, *has_next_page, chunks[1]),
    }

    if app.search_focused && !app.list.suggestions().is_empty() {
        suggestions::render(
            frame,
            app.list.suggestions(),
            app.suggestion_index,
            chunks[0],
            area,
        );
    }
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let query = app.list.query();
    let (text, style) = if query.is_empty() && !app.search_focused {
        ("Search movies...".to_string(), Style::default().fg(Color::DarkGray))
    } else if app.search_focused {
        (format!("{}_", query), Style::default().fg(Color::White))
    } else {
        (query.to_string(), Style::default().fg(Color::Gray))
    };

    let border_style = if app.search_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let bar = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search "),
    );
    frame.render_widget(bar, area);
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(" Movies ");
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_grid(frame: &mut Frame, app: &App, movies: &[Movie], has_next_page: bool, area: Rect) {
    let more = if has_next_page { "" } else { ", end" };
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Movies ({}, page {}{}) ",
        movies.len(),
        app.list.current_page(),
        more
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = columns_for(inner.width);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(app.movie_index, columns, visible_rows);
    let card_width = inner.width / columns as u16;

    for row in 0..visible_rows {
        let y = inner.y + row as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        for col in 0..columns {
            let index = (first_row + row) * columns + col;
            let Some(movie) = movies.get(index) else {
                return;
            };
            let card = Rect::new(inner.x + col as u16 * card_width, y, card_width, CARD_HEIGHT);
            render_card(frame, movie, index == app.movie_index, card);
        }
    }
}

fn render_card(frame: &mut Frame, movie: &Movie, selected: bool, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;

    let (title_style, border_style) = if selected {
        (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            Style::default().add_modifier(Modifier::BOLD),
            Style::default().fg(Color::DarkGray),
        )
    };

    let title = movie.title().unwrap_or("Untitled");
    let year = movie.release_year().unwrap_or_else(|| "----".to_string());

    let lines = vec![
        Line::from(Span::styled(truncate(title, width), title_style)),
        Line::from(vec![
            Span::styled(year, Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                format!("★ {:.1}", movie.vote_average),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_never_zero() {
        assert_eq!(columns_for(0), 1);
        assert_eq!(columns_for(CARD_WIDTH - 1), 1);
        assert_eq!(columns_for(CARD_WIDTH * 4 + 3), 4);
    }

    #[test]
    fn selection_in_first_screen_starts_at_top() {
        assert_eq!(first_visible_row(5, 3, 4), 0);
    }

    #[test]
    fn selection_below_screen_scrolls() {
        // row 6 selected, 4 rows visible -> rows 3..=6
        assert_eq!(first_visible_row(19, 3, 4), 3);
    }
}
