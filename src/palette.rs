//! Color palette and semantic roles for the ecoprompt UI.

use ratatui::style::Color;

pub const ECO_GREEN_RGB: (u8, u8, u8) = (64, 160, 92); // #40A05C
pub const ECO_LEAF_RGB: (u8, u8, u8) = (120, 198, 130);
pub const ECO_WATER_RGB: (u8, u8, u8) = (84, 158, 227);
pub const ECO_AMBER_RGB: (u8, u8, u8) = (228, 170, 60);
pub const ECO_RED_RGB: (u8, u8, u8) = (226, 80, 96);
pub const ECO_INK_RGB: (u8, u8, u8) = (14, 24, 18);

pub const ECO_GREEN: Color = Color::Rgb(ECO_GREEN_RGB.0, ECO_GREEN_RGB.1, ECO_GREEN_RGB.2);
pub const ECO_LEAF: Color = Color::Rgb(ECO_LEAF_RGB.0, ECO_LEAF_RGB.1, ECO_LEAF_RGB.2);
pub const ECO_WATER: Color = Color::Rgb(ECO_WATER_RGB.0, ECO_WATER_RGB.1, ECO_WATER_RGB.2);
pub const ECO_AMBER: Color = Color::Rgb(ECO_AMBER_RGB.0, ECO_AMBER_RGB.1, ECO_AMBER_RGB.2);
pub const ECO_RED: Color = Color::Rgb(ECO_RED_RGB.0, ECO_RED_RGB.1, ECO_RED_RGB.2);
pub const ECO_INK: Color = Color::Rgb(ECO_INK_RGB.0, ECO_INK_RGB.1, ECO_INK_RGB.2);

pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_MUTED: Color = Color::DarkGray;

pub const STATUS_SUCCESS: Color = ECO_GREEN;
pub const STATUS_LOADING: Color = ECO_AMBER;
pub const STATUS_ERROR: Color = ECO_RED;

/// Strikethrough tint for removed prompt segments.
pub const REMOVED_TEXT: Color = ECO_RED;
/// Tint for the retained/optimized prompt text.
pub const KEPT_TEXT: Color = ECO_LEAF;

pub const COMPOSER_BG: Color = ECO_INK;
