//! Air hockey rink and scoreboard.

use super::{section, stat_line, titled_block};
use crate::app::HockeyMatch;
use crate::env::air_hockey::{goal_posts, HEIGHT, MAX_STEPS, WIDTH};
use crate::state::{MatchPhase, PlaybackState};
use crate::theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Paragraph,
    },
    Frame,
};

/// Largest rink that keeps the table's proportions inside `area`.
///
/// Terminal cells are roughly twice as tall as they are wide.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rink_area(area: Rect) -> Rect {
    let avail_w = f64::from(area.width.saturating_sub(2));
    let avail_h = f64::from(area.height.saturating_sub(2));
    let cells_per_row = 2.0 * WIDTH / HEIGHT;
    let rows = avail_h.min(avail_w / cells_per_row).floor();
    let cols = (rows * cells_per_row).round();

    let width = (cols as u16).saturating_add(2).min(area.width);
    let height = (rows as u16).saturating_add(2).min(area.height);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Draws the match and returns the playfield's screen area.
pub fn render(
    frame: &mut Frame,
    game: &HockeyMatch,
    area: Rect,
    panel: Rect,
    playback: PlaybackState,
) -> Rect {
    let env = game.env();
    let ball = env.ball();
    let ai = env.agent_paddle();
    let player = env.opponent_paddle();
    let (left_post, right_post) = goal_posts();
    // Rink y grows downwards, canvas y grows upwards.
    let flip = |y: f64| HEIGHT - y;

    let rink = rink_area(area);
    let block = Block::bordered().border_style(Style::default().fg(theme::BORDER_FOCUSED));
    let playfield = block.inner(rink);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, WIDTH])
        .y_bounds([0.0, HEIGHT])
        .paint(|ctx| {
            ctx.draw(&CanvasLine::new(
                0.0,
                HEIGHT / 2.0,
                WIDTH,
                HEIGHT / 2.0,
                theme::RINK_CENTRE,
            ));
            ctx.draw(&Circle {
                x: WIDTH / 2.0,
                y: HEIGHT / 2.0,
                radius: 50.0,
                color: theme::RINK_LINE,
            });
            for y in [0.0, HEIGHT] {
                ctx.draw(&CanvasLine::new(left_post, y, right_post, y, theme::GOAL_MOUTH));
            }
            ctx.layer();

            for (disc, color) in [(ai, theme::AI_PADDLE), (player, theme::PLAYER_PADDLE)] {
                for scale in [1.0, 0.6, 0.25] {
                    ctx.draw(&Circle {
                        x: disc.position.x,
                        y: flip(disc.position.y),
                        radius: disc.radius * scale,
                        color,
                    });
                }
            }
            for scale in [1.0, 0.5] {
                ctx.draw(&Circle {
                    x: ball.position.x,
                    y: flip(ball.position.y),
                    radius: ball.radius * scale,
                    color: theme::BALL,
                });
            }
        });
    frame.render_widget(canvas, rink);

    render_panel(frame, game, panel, playback);
    playfield
}

fn render_panel(frame: &mut Frame, game: &HockeyMatch, area: Rect, playback: PlaybackState) {
    let score = game.score();
    let env = game.env();

    let status = match game.phase() {
        _ if playback.is_paused() => Span::styled(
            "PAUSED",
            Style::default()
                .fg(theme::WARNING)
                .add_modifier(Modifier::BOLD),
        ),
        MatchPhase::Playing => Span::styled("playing", Style::default().fg(theme::SUCCESS)),
        MatchPhase::Celebrating { .. } => Span::styled(
            "GOAL!",
            Style::default()
                .fg(theme::FLAG)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let lines = vec![
        section("Score"),
        Line::from(vec![
            Span::styled(" YOU ", Style::default().fg(theme::PLAYER_PADDLE)),
            Span::styled(
                format!("{:>3} : {:<3}", score.player, score.ai),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" AI", Style::default().fg(theme::AI_PADDLE)),
        ]),
        stat_line("Draws", score.draws.to_string()),
        Line::default(),
        section("Match"),
        Line::from(vec![
            Span::styled(
                format!(" {:<10}", "Status"),
                Style::default().fg(theme::TEXT_SECONDARY),
            ),
            status,
        ]),
        stat_line("Step", format!("{} / {MAX_STEPS}", env.steps())),
        stat_line("Ball", format!("{:.0} px/s", env.ball().velocity.length())),
        Line::default(),
        section("You"),
        stat_line("Paddle", "bottom"),
        stat_line("Attack", "top goal"),
    ];

    frame.render_widget(Paragraph::new(lines).block(titled_block("Air Hockey")), area);
}
