//! UI rendering module

mod air_hockey;
mod frozen_lake;
mod mountain_car;
mod overlays;
mod widgets;

use crate::agent::StateEncoder;
use crate::app::replay::{Narrate, Replay};
use crate::app::{App, Scene};
use crate::state::{PlaybackSpeed, PlaybackState};
use crate::theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

/// Width of the statistics panel on the right.
const PANEL_WIDTH: u16 = 34;
/// Most recent episode results listed in replay panels.
const RESULTS_SHOWN: usize = 10;

/// Main render function - dispatches to the active scene
pub fn render(frame: &mut Frame, app: &mut App) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
    let [scene_area, panel_area] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(PANEL_WIDTH)]).areas(body);
    let playback = (app.playback, app.speed);

    match &app.scene {
        Scene::MountainCar(replay) => {
            mountain_car::render(frame, replay, scene_area, panel_area, playback);
        }
        Scene::FrozenLake(replay) => {
            frozen_lake::render(frame, replay, scene_area, panel_area, playback);
        }
        Scene::AirHockey(game) => {
            app.playfield = air_hockey::render(frame, game, scene_area, panel_area, app.playback);
        }
    }

    widgets::footer::render(frame, app, footer);

    if app.toast.is_some() {
        overlays::toast::render(frame, app);
    }
}

/// Bordered block with a padded title.
fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
}

/// `label` in muted text followed by `value`.
fn stat_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<10}"),
            Style::default().fg(theme::TEXT_SECONDARY),
        ),
        Span::styled(value.into(), Style::default().fg(theme::TEXT_PRIMARY)),
    ])
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme::ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    ))
}

fn playback_line(playback: (PlaybackState, PlaybackSpeed)) -> Line<'static> {
    let (state, speed) = playback;
    if state.is_paused() {
        Line::from(vec![
            Span::styled(" Playback  ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(
                "PAUSED",
                Style::default()
                    .fg(theme::WARNING)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        stat_line("Playback", speed.label())
    }
}

/// Episode counters shared by every replay panel.
fn replay_header<E, C>(
    replay: &Replay<E, C>,
    playback: (PlaybackState, PlaybackSpeed),
) -> Vec<Line<'static>>
where
    E: Narrate,
    C: StateEncoder<E::Observation>,
{
    vec![
        stat_line(
            "Episode",
            format!("{} / {}", replay.episode(), replay.episodes()),
        ),
        stat_line("Step", replay.steps().to_string()),
        stat_line("Return", format!("{:.1}", replay.reward())),
        playback_line(playback),
    ]
}

/// The latest finished episodes, newest last.
fn replay_results<E, C>(replay: &Replay<E, C>) -> Vec<Line<'static>>
where
    E: Narrate,
    C: StateEncoder<E::Observation>,
{
    let results = replay.results();
    let mut lines = vec![Line::default(), section("Results")];
    if results.is_empty() {
        lines.push(Line::from(Span::styled(
            " none yet",
            Style::default().fg(theme::TEXT_SECONDARY),
        )));
        return lines;
    }

    let skip = results.len().saturating_sub(RESULTS_SHOWN);
    for (i, summary) in results.iter().enumerate().skip(skip) {
        let (mark, color) = if summary.success {
            ("✔", theme::SUCCESS)
        } else {
            ("✘", theme::ERROR)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" #{:<4}", i + 1),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
            Span::styled(mark, Style::default().fg(color)),
            Span::styled(
                format!(" {:>4} steps  {:>7.1}", summary.length, summary.reward),
                Style::default().fg(theme::TEXT_PRIMARY),
            ),
        ]));
    }

    let solved = results.iter().filter(|s| s.success).count();
    lines.push(Line::default());
    lines.push(stat_line("Solved", format!("{solved} / {}", results.len())));
    lines
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
