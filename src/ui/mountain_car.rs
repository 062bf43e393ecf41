//! Mountain car replay view.

use super::{replay_header, replay_results, section, stat_line, titled_block};
use crate::app::CarReplay;
use crate::constants::ENV_MOUNTAIN_CAR;
use crate::env::mountain_car::{height, GOAL_POSITION, MAX_POSITION, MIN_POSITION};
use crate::state::{PlaybackSpeed, PlaybackState};
use crate::theme;
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points, Rectangle},
        Paragraph,
    },
    Frame,
};

/// Samples along the track.
const TRACK_SAMPLES: usize = 240;
const CAR_WIDTH: f64 = 0.08;
const CAR_HEIGHT: f64 = 0.05;
const FLAG_HEIGHT: f64 = 0.12;

#[allow(clippy::cast_precision_loss)]
fn track() -> Vec<(f64, f64)> {
    (0..=TRACK_SAMPLES)
        .map(|i| {
            let x = MIN_POSITION + (MAX_POSITION - MIN_POSITION) * i as f64 / TRACK_SAMPLES as f64;
            (x, height(x))
        })
        .collect()
}

pub fn render(
    frame: &mut Frame,
    replay: &CarReplay,
    area: Rect,
    panel: Rect,
    playback: (PlaybackState, PlaybackSpeed),
) {
    let car = replay.env().state();
    let hill = track();
    let flag_base = height(GOAL_POSITION);

    let canvas = Canvas::default()
        .block(titled_block(ENV_MOUNTAIN_CAR))
        .marker(Marker::Braille)
        .x_bounds([MIN_POSITION, MAX_POSITION])
        .y_bounds([0.0, 1.0 + FLAG_HEIGHT + 0.05])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &hill,
                color: theme::HILL,
            });
            ctx.draw(&CanvasLine {
                x1: GOAL_POSITION,
                y1: flag_base,
                x2: GOAL_POSITION,
                y2: flag_base + FLAG_HEIGHT,
                color: theme::FLAG,
            });
            ctx.print(
                GOAL_POSITION,
                flag_base + FLAG_HEIGHT,
                Span::styled("⚑", Style::default().fg(theme::FLAG)),
            );
            ctx.layer();
            ctx.draw(&Rectangle {
                x: car.position - CAR_WIDTH / 2.0,
                y: height(car.position),
                width: CAR_WIDTH,
                height: CAR_HEIGHT,
                color: theme::CAR,
            });
        });
    frame.render_widget(canvas, area);

    let mut lines = replay_header(replay, playback);
    lines.push(Line::default());
    lines.push(section("Car"));
    lines.push(stat_line("Position", format!("{:+.3}", car.position)));
    lines.push(stat_line("Velocity", format!("{:+.4}", car.velocity)));
    lines.push(stat_line(
        "Action",
        replay
            .last_action()
            .map_or_else(|| "-".to_string(), |a| a.to_string()),
    ));
    lines.extend(replay_results(replay));

    frame.render_widget(Paragraph::new(lines).block(titled_block("Replay")), panel);
}
