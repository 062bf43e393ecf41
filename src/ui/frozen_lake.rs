//! Frozen lake replay view.

use super::{centered_rect, replay_header, replay_results, section, stat_line, titled_block};
use crate::app::LakeReplay;
use crate::constants::ENV_FROZEN_LAKE;
use crate::env::frozen_lake::{LakeMap, Tile};
use crate::state::{PlaybackSpeed, PlaybackState};
use crate::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Cell size in terminal columns and rows, largest first.
const CELL_SIZES: [(u16, u16); 2] = [(5, 2), (3, 1)];

fn tile_style(tile: Tile) -> (&'static str, Style) {
    match tile {
        Tile::Start => ("S", Style::default().fg(theme::TEXT_SECONDARY).bg(theme::START_BG)),
        Tile::Frozen => ("·", Style::default().fg(theme::NORD_FROST_2).bg(theme::ICE_BG)),
        Tile::Hole => ("H", Style::default().fg(theme::NORD_POLAR_NIGHT_4).bg(theme::HOLE_BG)),
        Tile::Goal => (
            "G",
            Style::default()
                .fg(theme::FLAG)
                .bg(theme::GOAL_BG)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Picks the biggest cell that lets the whole lake fit in `area`.
fn cell_size(map: &LakeMap, area: Rect) -> (u16, u16) {
    let cols = u16::try_from(map.cols()).unwrap_or(u16::MAX);
    let rows = u16::try_from(map.rows()).unwrap_or(u16::MAX);
    CELL_SIZES
        .into_iter()
        .find(|(w, h)| {
            cols.saturating_mul(*w).saturating_add(2) <= area.width
                && rows.saturating_mul(*h).saturating_add(2) <= area.height
        })
        .unwrap_or((1, 1))
}

fn grid_lines(map: &LakeMap, agent: usize, cell: (u16, u16)) -> Vec<Line<'static>> {
    let (width, height) = (usize::from(cell.0), usize::from(cell.1));
    let pad = " ".repeat(width / 2);
    let blank = " ".repeat(width);
    let mut lines = Vec::with_capacity(map.rows() * height);

    for row in 0..map.rows() {
        for sub in 0..height {
            let spans: Vec<Span<'static>> = (0..map.cols())
                .map(|col| {
                    let state = row * map.cols() + col;
                    let (glyph, style) = tile_style(map.tile(state));
                    if sub + 1 < height {
                        return Span::styled(blank.clone(), style);
                    }
                    if state == agent {
                        let style = style.fg(theme::AGENT).add_modifier(Modifier::BOLD);
                        Span::styled(format!("{pad}@{pad}"), style)
                    } else {
                        Span::styled(format!("{pad}{glyph}{pad}"), style)
                    }
                })
                .collect();
            lines.push(Line::from(spans));
        }
    }
    lines
}

pub fn render(
    frame: &mut Frame,
    replay: &LakeReplay,
    area: Rect,
    panel: Rect,
    playback: (PlaybackState, PlaybackSpeed),
) {
    let env = replay.env();
    let map = env.map();

    let outer = titled_block(ENV_FROZEN_LAKE);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let cell = cell_size(map, inner);
    let cols = u16::try_from(map.cols()).unwrap_or(u16::MAX);
    let rows = u16::try_from(map.rows()).unwrap_or(u16::MAX);
    let grid_area = centered_rect(
        cols.saturating_mul(cell.0).saturating_add(2),
        rows.saturating_mul(cell.1).saturating_add(2),
        inner,
    );
    let grid = Paragraph::new(grid_lines(map, env.position(), cell)).block(
        Block::bordered().border_style(Style::default().fg(theme::BORDER_FOCUSED)),
    );
    frame.render_widget(grid, grid_area);

    let mut lines = replay_header(replay, playback);
    lines.push(Line::default());
    lines.push(section("Lake"));
    lines.push(stat_line(
        "Map",
        format!(
            "{}x{} {}",
            map.rows(),
            map.cols(),
            if env.is_slippery() { "slippery" } else { "still" }
        ),
    ));
    lines.push(stat_line(
        "Chosen",
        replay
            .last_action()
            .map_or_else(|| "-".to_string(), |m| m.arrow().to_string()),
    ));
    let taken = env.last_move().map_or('-', |m| m.arrow());
    let (label, color) = if replay.slipped() {
        (format!("{taken} slipped"), theme::SLIP)
    } else {
        (taken.to_string(), theme::TEXT_PRIMARY)
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!(" {:<10}", "Taken"),
            Style::default().fg(theme::TEXT_SECONDARY),
        ),
        Span::styled(label, Style::default().fg(color)),
    ]));
    lines.extend(replay_results(replay));

    frame.render_widget(Paragraph::new(lines).block(titled_block("Replay")), panel);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lake() -> LakeMap {
        LakeMap::from_layout("SFFF/FHFH/FFFH/HFFG").unwrap()
    }

    #[test]
    fn test_cell_size_shrinks_to_fit() {
        let map = lake();
        assert_eq!(cell_size(&map, Rect::new(0, 0, 40, 20)), (5, 2));
        assert_eq!(cell_size(&map, Rect::new(0, 0, 16, 8)), (3, 1));
        assert_eq!(cell_size(&map, Rect::new(0, 0, 4, 4)), (1, 1));
    }

    #[test]
    fn test_grid_marks_agent() {
        let lines = grid_lines(&lake(), 5, (3, 1));
        assert_eq!(lines.len(), 4);
        let second: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(second, " ·  @  ·  H ");
    }

    #[test]
    fn test_tall_cells_repeat_rows() {
        let lines = grid_lines(&lake(), 0, (5, 2));
        assert_eq!(lines.len(), 8);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first.trim(), "");
    }
}
