//! Toast notification overlay

use crate::app::App;
use crate::state::ToastType;
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Rows needed to show `message` wrapped at `inner_width` columns.
#[allow(clippy::cast_possible_truncation)]
fn wrapped_lines(message: &str, inner_width: usize) -> u16 {
    if inner_width == 0 {
        return 1;
    }
    let lines: usize = message
        .lines()
        .map(|line| line.chars().count().div_ceil(inner_width).max(1))
        .sum();
    lines.max(1) as u16
}

/// Render toast notification
pub fn render(frame: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };

    let area = frame.area();
    let width = (area.width / 3).clamp(30, 60).min(area.width);

    // Horizontal padding of two cells per side.
    let inner_width = width.saturating_sub(4) as usize;
    let text_lines = wrapped_lines(&toast.message, inner_width);

    let height = (text_lines + 4).max(7).min(area.height);

    // Centred over the scene.
    let toast_area = Rect {
        x: area.x + (area.width / 2).saturating_sub(width / 2),
        y: area.y + (area.height / 2).saturating_sub(height / 2),
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);

    let (title, color) = match toast.toast_type {
        ToastType::Info => (" INFO ", theme::INFO),
        ToastType::Success => (" SUCCESS ", theme::SUCCESS),
        ToastType::Warning => (" WARNING ", theme::WARNING),
        ToastType::Error => (" GAME OVER ", theme::ERROR),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let [_, text_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(text_lines),
        Constraint::Fill(1),
    ])
    .areas(inner_area);

    let paragraph = Paragraph::new(toast.message.as_str())
        .style(
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, text_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_lines_counts_each_paragraph() {
        assert_eq!(wrapped_lines("YOU WIN!", 26), 1);
        assert_eq!(wrapped_lines("Fell into a hole\n\nReplay finished.", 26), 3);
        assert_eq!(wrapped_lines(&"x".repeat(53), 26), 3);
        assert_eq!(wrapped_lines("", 26), 1);
    }
}
