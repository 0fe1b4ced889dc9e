//! Gameplay rules.
//!
//! Each rule takes the scene state and the engine systems it acts on and
//! mutates nothing else. All randomness comes through an injected `rng` so
//! callers control determinism (tests use a seeded `StdRng`).

use rand::Rng;

use crate::arcade::SpriteId;
use crate::engine::Systems;
use crate::entities::{
    AnimKey, GameStatus, SceneState, BOMB_FALL_SPEED, BOMB_MAX_SPEED_X, BOMB_SIDE_SPLIT, BOMB_SPAWN_Y,
    HIT_TINT, PLAYER_JUMP_SPEED, PLAYER_RUN_SPEED, SCORE_PER_STAR, TEX_BOMB,
};
use crate::input::CursorKeys;

/// Outcome of a player ↔ star overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarPickup {
    Collected,
    /// That was the last active star: the batch is back and a bomb dropped.
    BatchRespawned { bomb: SpriteId },
    /// The game is over or the star was already collected.
    Ignored,
}

pub fn score_label(score: u32) -> String {
    format!("Score: {score}")
}

/// Bombs drop on the half of the screen away from the player.
pub fn bomb_spawn_x(player_x: f32, rng: &mut impl Rng) -> f32 {
    let x: i32 = if player_x < BOMB_SIDE_SPLIT {
        rng.gen_range(400..=800)
    } else {
        rng.gen_range(0..=400)
    };
    x as f32
}

// ── Star pickup ───────────────────────────────────────────────────────────────

pub fn collect_star(
    state: &mut SceneState,
    sys: &mut Systems,
    star: SpriteId,
    rng: &mut impl Rng,
) -> StarPickup {
    if state.status == GameStatus::GameOver || !sys.physics.sprite(star).is_active() {
        return StarPickup::Ignored;
    }

    sys.physics.disable_body(star, true);
    state.score += SCORE_PER_STAR;
    sys.set_text(state.score_text, score_label(state.score));

    if sys.physics.count_active(state.stars) > 0 {
        return StarPickup::Collected;
    }

    respawn_stars(state, sys);
    let bomb = spawn_bomb(state, sys, rng);
    log::debug!("Star batch cleared at score {}; bomb {:?} dropped", state.score, bomb);
    StarPickup::BatchRespawned { bomb }
}

/// Re-enable every star at the top of its own column.
pub fn respawn_stars(state: &SceneState, sys: &mut Systems) {
    let members = sys.physics.members(state.stars).to_vec();
    for id in members {
        let x = sys.physics.sprite(id).x();
        sys.physics.enable_body(id, x, 0.0, true);
    }
}

pub fn spawn_bomb(state: &SceneState, sys: &mut Systems, rng: &mut impl Rng) -> SpriteId {
    let x = bomb_spawn_x(sys.physics.sprite(state.player).x(), rng);
    let bomb = sys.create_in_group(state.bombs, x, BOMB_SPAWN_Y, TEX_BOMB);
    let speed_x = rng.gen_range(-BOMB_MAX_SPEED_X..=BOMB_MAX_SPEED_X) as f32;

    // Gravity stays on: with full bounce the bomb never comes to rest.
    let body = &mut sys.physics.sprite_mut(bomb).body;
    body.bounce.x = 1.0;
    body.bounce.y = 1.0;
    body.collide_world_bounds = true;
    body.velocity.x = speed_x;
    body.velocity.y = BOMB_FALL_SPEED;
    bomb
}

// ── Bomb hit ──────────────────────────────────────────────────────────────────

/// Freeze the world and flag the game as over.
pub fn hit_bomb(state: &mut SceneState, sys: &mut Systems) {
    if state.status == GameStatus::GameOver {
        return;
    }
    sys.physics.pause();
    sys.physics.sprite_mut(state.player).tint = Some(HIT_TINT);
    state.status = GameStatus::GameOver;
    log::info!("Player hit a bomb; final score {}", state.score);
}

// ── Player control ────────────────────────────────────────────────────────────

pub fn steer_player(state: &SceneState, sys: &mut Systems, cursors: &CursorKeys) {
    let (velocity_x, anim, ignore_if_playing) = if cursors.left {
        (-PLAYER_RUN_SPEED, AnimKey::Left, true)
    } else if cursors.right {
        (PLAYER_RUN_SPEED, AnimKey::Right, true)
    } else {
        (0.0, AnimKey::Turn, false)
    };

    let body = &mut sys.physics.sprite_mut(state.player).body;
    body.velocity.x = velocity_x;
    // Only from a platform, not from the world floor.
    if cursors.up && body.touching.down {
        body.velocity.y = -PLAYER_JUMP_SPEED;
    }

    sys.play(state.player, anim.as_str(), ignore_if_playing);
}
