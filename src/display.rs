//! Terminal rendering. All terminal output happens here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! host. No game logic is performed; this module only maps the 720×1280
//! world onto the fitted block of terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use star_catcher::arcade::Sprite;
use star_catcher::config::{parse_hex_color, ButtonConfig, DisplayConfig};
use star_catcher::engine::Systems;
use star_catcher::entities::{TEX_BOMB, TEX_DUDE, TEX_GROUND, TEX_STAR};
use star_catcher::host::{Host, Viewport};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY: Color = Color::Rgb { r: 18, g: 32, b: 72 };
const C_SKY_DOT: Color = Color::Rgb { r: 60, g: 80, b: 130 };
const C_GROUND: Color = Color::Green;
const C_STAR: Color = Color::Yellow;
const C_BOMB: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "← → : Move   ↑ : Jump   ENTER : Start   Q : Quit";

/// Terminal cells covered by the fitted game area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && col < self.col.saturating_add(self.width)
            && row >= self.row
            && row < self.row.saturating_add(self.height)
    }
}

/// Pixel viewport of a terminal of `cols`×`rows` cells.
pub fn viewport_for(cols: u16, rows: u16, display: &DisplayConfig) -> Viewport {
    Viewport {
        width: u32::from(cols).saturating_mul(display.cell_width),
        height: u32::from(rows).saturating_mul(display.cell_height),
    }
}

pub fn layout(host: &Host, display: &DisplayConfig) -> Layout {
    let viewport = host.viewport();
    let area = host.game_area();
    let term_cols = (viewport.width / display.cell_width) as u16;
    let term_rows = (viewport.height / display.cell_height) as u16;
    let cols = ((area.width / display.cell_width) as u16).clamp(1, term_cols.max(1));
    let rows = ((area.height / display.cell_height) as u16).clamp(1, term_rows.max(1));
    Layout {
        col: (term_cols - cols.min(term_cols)) / 2,
        row: (term_rows - rows.min(term_rows)) / 2,
        cols,
        rows,
    }
}

/// Where the start control sits: centred in the game area.
pub fn button_rect(layout: &Layout, button: &ButtonConfig) -> Rect {
    let label = u16::try_from(button.text.chars().count()).unwrap_or(u16::MAX);
    let width = label.saturating_add(button.padding.saturating_mul(2));
    Rect {
        col: layout.col.saturating_add(layout.cols.saturating_sub(width) / 2),
        row: layout.row.saturating_add(layout.rows / 2),
        width,
        height: 1,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    host: &Host,
    button: &ButtonConfig,
    display: &DisplayConfig,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let layout = layout(host, display);
    draw_sky(out, &layout)?;

    if let Some(game) = host.game() {
        draw_scene(out, &layout, game.systems())?;
    }

    if host.start_button_visible() {
        draw_start_button(out, &layout, button, host.last_score())?;
    }

    draw_controls_hint(out, host, display)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_sky<W: Write>(out: &mut W, layout: &Layout) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(C_SKY))?;
    out.queue(style::SetForegroundColor(C_SKY_DOT))?;
    for r in 0..layout.rows {
        out.queue(cursor::MoveTo(layout.col, layout.row + r))?;
        let line: String = (0..layout.cols)
            .map(|c| if (c * 7 + r * 13) % 29 == 0 { '·' } else { ' ' })
            .collect();
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Scene ─────────────────────────────────────────────────────────────────────

struct Mapper {
    layout: Layout,
    world_w: f32,
    world_h: f32,
}

impl Mapper {
    fn col(&self, x: f32) -> u16 {
        let c = (x / self.world_w * self.layout.cols as f32).floor();
        self.layout.col + (c.max(0.0) as u16).min(self.layout.cols - 1)
    }

    fn row(&self, y: f32) -> u16 {
        let r = (y / self.world_h * self.layout.rows as f32).floor();
        self.layout.row + (r.max(0.0) as u16).min(self.layout.rows - 1)
    }
}

fn draw_scene<W: Write>(out: &mut W, layout: &Layout, sys: &Systems) -> std::io::Result<()> {
    let mapper = Mapper {
        layout: *layout,
        world_w: sys.physics.bounds.width,
        world_h: sys.physics.bounds.height,
    };

    for (_, sprite) in sys.physics.sprites() {
        if !sprite.visible {
            continue;
        }
        match sprite.texture.as_str() {
            TEX_GROUND => draw_platform(out, &mapper, sprite)?,
            TEX_STAR => draw_glyph(out, &mapper, sprite, "*", C_STAR)?,
            TEX_BOMB => draw_glyph(out, &mapper, sprite, "●", C_BOMB)?,
            TEX_DUDE => {
                let color = match sprite.tint {
                    Some(tint) => tint_color(tint),
                    None => C_PLAYER,
                };
                draw_glyph(out, &mapper, sprite, player_glyph(sprite.frame), color)?;
            }
            _ => draw_glyph(out, &mapper, sprite, "?", Color::Red)?,
        }
    }

    for text in &sys.texts {
        out.queue(cursor::MoveTo(mapper.col(text.x), mapper.row(text.y)))?;
        out.queue(style::SetForegroundColor(tint_color(text.color)))?;
        out.queue(style::SetAttribute(style::Attribute::Bold))?;
        out.queue(Print(&text.content))?;
        out.queue(style::SetAttribute(style::Attribute::NormalIntensity))?;
    }
    Ok(())
}

fn draw_platform<W: Write>(out: &mut W, mapper: &Mapper, sprite: &Sprite) -> std::io::Result<()> {
    let size = sprite.display_size();
    let left = mapper.col(sprite.x() - size.x / 2.0);
    let right = mapper.col(sprite.x() + size.x / 2.0 - 1.0);
    let top = mapper.row(sprite.y() - size.y / 2.0);
    let bottom = mapper.row(sprite.y() + size.y / 2.0 - 1.0);
    out.queue(style::SetForegroundColor(C_GROUND))?;
    for row in top..=bottom {
        out.queue(cursor::MoveTo(left, row))?;
        let glyph = if row == top { "▀" } else { "█" };
        out.queue(Print(glyph.repeat(usize::from(right.saturating_sub(left) + 1))))?;
    }
    Ok(())
}

fn draw_glyph<W: Write>(
    out: &mut W,
    mapper: &Mapper,
    sprite: &Sprite,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(mapper.col(sprite.x()), mapper.row(sprite.y())))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Frames 0–3 walk left, 4 faces front, 5–8 walk right.
fn player_glyph(frame: u16) -> &'static str {
    match frame {
        0..=3 => "◀",
        4 => "☻",
        _ => "▶",
    }
}

fn tint_color(rgb: u32) -> Color {
    Color::Rgb {
        r: (rgb >> 16) as u8,
        g: (rgb >> 8) as u8,
        b: rgb as u8,
    }
}

fn hex_color(raw: &str, fallback: Color) -> Color {
    parse_hex_color(raw)
        .map(|(r, g, b)| Color::Rgb { r, g, b })
        .unwrap_or(fallback)
}

// ── Start control ─────────────────────────────────────────────────────────────

fn draw_start_button<W: Write>(
    out: &mut W,
    layout: &Layout,
    button: &ButtonConfig,
    last_score: Option<u32>,
) -> std::io::Result<()> {
    let rect = button_rect(layout, button);
    let pad = " ".repeat(usize::from(button.padding));
    out.queue(cursor::MoveTo(rect.col, rect.row))?;
    out.queue(style::SetBackgroundColor(hex_color(&button.bg, Color::Green)))?;
    out.queue(style::SetForegroundColor(hex_color(&button.fg, Color::White)))?;
    out.queue(style::SetAttribute(style::Attribute::Bold))?;
    out.queue(Print(format!("{pad}{}{pad}", button.text)))?;
    out.queue(style::SetAttribute(style::Attribute::NormalIntensity))?;

    if let Some(score) = last_score {
        let line = format!("Score: {score}");
        let col = layout.col + layout.cols.saturating_sub(line.chars().count() as u16) / 2;
        out.queue(cursor::MoveTo(col, rect.row.saturating_sub(2)))?;
        out.queue(style::SetBackgroundColor(C_SKY))?;
        out.queue(style::SetForegroundColor(C_STAR))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, host: &Host, display: &DisplayConfig) -> std::io::Result<()> {
    let rows = (host.viewport().height / display.cell_height) as u16;
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Layout = Layout { col: 0, row: 0, cols: 80, rows: 24 };

    #[test]
    fn button_is_centred() {
        let rect = button_rect(&SCREEN, &ButtonConfig::default());
        assert_eq!(rect, Rect { col: 33, row: 12, width: 14, height: 1 });
        assert!(rect.contains(33, 12));
        assert!(!rect.contains(47, 12));
    }

    #[test]
    fn oversized_button_saturates() {
        let button = ButtonConfig { padding: 40_000, ..ButtonConfig::default() };
        let rect = button_rect(&SCREEN, &button);
        assert_eq!(rect.width, u16::MAX);
        assert_eq!(rect.col, 0);
        assert!(rect.contains(79, 12));
    }

    #[test]
    fn rect_at_the_far_edge_does_not_overflow() {
        let rect = Rect { col: u16::MAX - 2, row: u16::MAX - 2, width: 10, height: 10 };
        assert!(rect.contains(u16::MAX - 1, u16::MAX - 1));
        assert!(!rect.contains(0, 0));
    }
}
