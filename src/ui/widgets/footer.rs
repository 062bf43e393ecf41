//! Footer widget with scene-aware keybinding hints

use crate::app::{App, Scene};
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Shortcuts available in the current scene.
fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let pause = if app.playback.is_paused() {
        ("p", "Resume")
    } else {
        ("p", "Pause")
    };
    match app.scene {
        Scene::AirHockey(_) => vec![
            ("mouse", "Move"),
            ("←↑↓→", "Nudge"),
            ("r", "Restart"),
            pause,
            ("q", "Quit"),
        ],
        Scene::MountainCar(_) | Scene::FrozenLake(_) => {
            vec![pause, ("s", "Speed"), ("q", "Quit")]
        }
    }
}

/// Render footer with scene shortcuts and branding
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [hints_area, brand_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(18)]).areas(area);

    let mut spans = vec![Span::raw(" ")];
    let mut current_width = 1;
    let max_width = hints_area.width as usize;

    for (i, (key, action)) in hints(app).into_iter().enumerate() {
        // " │ " separator before every hint but the first.
        let sep_width = if i > 0 { 3 } else { 0 };
        let item_width = key.chars().count() + 1 + action.len() + sep_width;
        if current_width + item_width > max_width {
            break;
        }

        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(theme::SEPARATOR)));
        }
        spans.push(Span::styled(
            key,
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(action, Style::default().fg(theme::TEXT_SECONDARY)));
        current_width += item_width;
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), hints_area);

    let branding = Line::from(Span::styled(
        format!(
            "{} v{} ",
            crate::constants::APP_NAME,
            crate::constants::APP_VERSION
        ),
        Style::default().fg(theme::NORD_POLAR_NIGHT_4),
    ));
    frame.render_widget(
        Paragraph::new(branding).alignment(Alignment::Right),
        brand_area,
    );
}
