//! Viewer colours.
//!
//! Built on the Nord palette. Widgets use the semantic names below, never
//! the raw palette entries.

use ratatui::style::Color;

// === Palette ===

pub const NORD_POLAR_NIGHT_1: Color = Color::Rgb(46, 52, 64);
pub const NORD_POLAR_NIGHT_3: Color = Color::Rgb(67, 76, 94);
pub const NORD_POLAR_NIGHT_4: Color = Color::Rgb(76, 86, 106);
pub const NORD_SNOW_STORM_1: Color = Color::Rgb(216, 222, 233);
pub const NORD_SNOW_STORM_3: Color = Color::Rgb(236, 239, 244);
pub const NORD_FROST_1: Color = Color::Rgb(143, 188, 187);
pub const NORD_FROST_2: Color = Color::Rgb(136, 192, 208);
pub const NORD_FROST_4: Color = Color::Rgb(94, 129, 172);
pub const NORD_RED: Color = Color::Rgb(191, 97, 106);
pub const NORD_ORANGE: Color = Color::Rgb(208, 135, 112);
pub const NORD_YELLOW: Color = Color::Rgb(235, 203, 139);
pub const NORD_GREEN: Color = Color::Rgb(163, 190, 140);
pub const NORD_PURPLE: Color = Color::Rgb(180, 142, 173);

// === Text and Status ===

pub const TEXT_PRIMARY: Color = NORD_SNOW_STORM_1;
/// Labels, hints and other secondary text.
pub const TEXT_SECONDARY: Color = NORD_POLAR_NIGHT_4;
/// Key names and section titles.
pub const ACCENT_PRIMARY: Color = NORD_FROST_2;
pub const SUCCESS: Color = NORD_GREEN;
pub const WARNING: Color = NORD_YELLOW;
pub const ERROR: Color = NORD_RED;
pub const INFO: Color = NORD_FROST_2;

// === Chrome ===

pub const BORDER_DEFAULT: Color = NORD_POLAR_NIGHT_3;
/// Border of the scene being simulated.
pub const BORDER_FOCUSED: Color = NORD_FROST_2;
/// Footer hint separator.
pub const SEPARATOR: Color = Color::Rgb(50, 50, 50);

// === Scenes ===

/// Mountain car track.
pub const HILL: Color = NORD_FROST_4;
pub const CAR: Color = NORD_ORANGE;
pub const FLAG: Color = NORD_YELLOW;

/// Frozen lake tiles.
pub const ICE_BG: Color = Color::Rgb(40, 58, 74);
pub const HOLE_BG: Color = NORD_POLAR_NIGHT_1;
pub const GOAL_BG: Color = Color::Rgb(74, 92, 60);
pub const START_BG: Color = NORD_POLAR_NIGHT_3;
pub const AGENT: Color = NORD_SNOW_STORM_3;
/// Highlight for a move that slid sideways.
pub const SLIP: Color = NORD_PURPLE;

/// Air hockey rink.
pub const RINK_LINE: Color = NORD_POLAR_NIGHT_4;
pub const RINK_CENTRE: Color = NORD_RED;
pub const GOAL_MOUTH: Color = NORD_YELLOW;
pub const BALL: Color = NORD_SNOW_STORM_3;
pub const AI_PADDLE: Color = NORD_RED;
pub const PLAYER_PADDLE: Color = NORD_FROST_1;
