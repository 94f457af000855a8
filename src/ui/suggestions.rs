use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

/// Dropdown of title suggestions, drawn just below the search bar and on top
/// of whatever is underneath.
pub fn render(
    frame: &mut Frame,
    suggestions: &[String],
    selected: Option<usize>,
    anchor: Rect,
    bounds: Rect,
) {
    let area = dropdown_rect(suggestions.len(), anchor, bounds);
    if area.height < 3 {
        return;
    }
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let is_selected = Some(i) == selected;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if is_selected { "> " } else { "  " };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", prefix, title),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    let mut state = ListState::default();
    state.select(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn dropdown_rect(count: usize, anchor: Rect, bounds: Rect) -> Rect {
    let y = anchor.y + anchor.height;
    let bottom = bounds.y + bounds.height;
    let wanted = count as u16 + 2; // +2 for borders
    let height = wanted.min(bottom.saturating_sub(y));
    Rect::new(anchor.x + 1, y, anchor.width.saturating_sub(2), height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropdown_sits_below_anchor() {
        let anchor = Rect::new(0, 1, 80, 3);
        let bounds = Rect::new(0, 1, 80, 30);
        assert_eq!(dropdown_rect(5, anchor, bounds), Rect::new(1, 4, 78, 7));
    }

    #[test]
    fn dropdown_is_clipped_to_bounds() {
        let anchor = Rect::new(0, 0, 40, 3);
        let bounds = Rect::new(0, 0, 40, 6);
        assert_eq!(dropdown_rect(5, anchor, bounds).height, 3);
    }
}
