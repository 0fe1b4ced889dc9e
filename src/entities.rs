//! Gameplay entity types and the fixed level layout. Pure data, no logic.

use crate::arcade::{GroupId, RuleId, SpriteId};
use crate::engine::TextId;

// ── Texture keys ──────────────────────────────────────────────────────────────

pub const TEX_SKY: &str = "sky";
pub const TEX_GROUND: &str = "ground";
pub const TEX_STAR: &str = "star";
pub const TEX_BOMB: &str = "bomb";
pub const TEX_DUDE: &str = "dude";

/// Character spritesheet frame size in pixels.
pub const DUDE_FRAME_WIDTH: u32 = 32;
pub const DUDE_FRAME_HEIGHT: u32 = 48;

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const SCORE_PER_STAR: u32 = 10;
pub const STAR_COUNT: usize = 12;
pub const STAR_START_X: f32 = 12.0;
pub const STAR_STEP_X: f32 = 63.0;
pub const STAR_BOUNCE_MIN: f32 = 0.4;
pub const STAR_BOUNCE_MAX: f32 = 0.8;

pub const PLAYER_START: (f32, f32) = (100.0, 930.0);
pub const PLAYER_BOUNCE: f32 = 0.2;
pub const PLAYER_RUN_SPEED: f32 = 160.0;
pub const PLAYER_JUMP_SPEED: f32 = 330.0;
/// Tint applied to the player when a bomb hits.
pub const HIT_TINT: u32 = 0xff0000;

/// Player x below which the next bomb drops on the right half, and vice versa.
pub const BOMB_SIDE_SPLIT: f32 = 400.0;
pub const BOMB_SPAWN_Y: f32 = 16.0;
pub const BOMB_MAX_SPEED_X: i32 = 200;
pub const BOMB_FALL_SPEED: f32 = 20.0;

pub const SCORE_TEXT_POS: (f32, f32) = (16.0, 36.0);
pub const SCORE_FONT_PX: u32 = 32;
pub const SCORE_COLOR: u32 = 0xffffff;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformPlacement {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Ground first, then the three ledges.
pub const PLATFORMS: [PlatformPlacement; 4] = [
    PlatformPlacement { x: 360.0, y: 1248.0, scale: 2.0 },
    PlatformPlacement { x: 560.0, y: 1080.0, scale: 1.0 },
    PlatformPlacement { x: 45.0, y: 930.0, scale: 1.0 },
    PlatformPlacement { x: 675.0, y: 900.0, scale: 1.0 },
];

// ── Animations ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimKey {
    Left,
    Turn,
    Right,
}

impl AnimKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimKey::Left => "left",
            AnimKey::Turn => "turn",
            AnimKey::Right => "right",
        }
    }
}

// ── Scene state ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Everything the game scene tracks between callbacks. Positions and
/// velocities live in the physics world; this holds handles into it.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub player: SpriteId,
    pub platforms: GroupId,
    pub stars: GroupId,
    pub bombs: GroupId,
    pub score_text: TextId,
    /// Player ↔ stars overlap.
    pub star_pickup: RuleId,
    /// Player ↔ bombs collider.
    pub bomb_hit: RuleId,
    pub score: u32,
    pub status: GameStatus,
}
