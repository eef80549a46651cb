//! Fixed timestep catch tick
//!
//! Core loop that advances the falling objects deterministically.

use glam::Vec2;
use rand::Rng;

use super::state::{CatchEvent, CatchState, CatchStatus, FallingKind, FallingObject};
use crate::consts::*;

/// How far the autopilot aims away from a heart's bomb twin (pixels)
const AUTOPILOT_NUDGE: f32 = 20.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct CatchInput {
    /// Pointer/touch x relative to the play field (pixels)
    pub pointer_x: Option<f32>,
    /// Idle/demo mode - the catcher chases hearts by itself
    pub autopilot: bool,
}

/// Drop a heart and a bomb side by side from the top of the field
///
/// Returns the ids of the heart and the bomb, or `None` once the run is over.
pub fn spawn_pair(state: &mut CatchState) -> Option<(u32, u32)> {
    if !state.is_active() {
        return None;
    }

    let base_x: f32 = state.rng.random_range(10.0..80.0);
    let offset: f32 = state.rng.random_range(10.0..25.0);
    let speed: f32 = state.rng.random_range(0.75..1.30);
    let size: f32 = state.rng.random_range(20.0..34.0);
    let opacity: f32 = state.rng.random_range(0.8..1.0);

    let heart_x = (base_x - offset).clamp(7.0, 93.0);
    let bomb_x = (base_x + offset).clamp(7.0, 93.0);

    let heart_id = state.next_entity_id();
    let bomb_id = state.next_entity_id();
    for (id, x, kind) in [
        (heart_id, heart_x, FallingKind::Beneficial),
        (bomb_id, bomb_x, FallingKind::Hazardous),
    ] {
        state.objects.push(FallingObject {
            id,
            pos: Vec2::new(x, CATCH_SPAWN_Y),
            kind,
            speed,
            size,
            opacity,
        });
    }

    Some((heart_id, bomb_id))
}

/// Advance the catch game by one fixed timestep (`dt` in seconds)
pub fn tick(state: &mut CatchState, input: &CatchInput, dt: f32) {
    // Input and motion stop once the run is decided
    if !state.is_active() {
        return;
    }

    state.time_ticks += 1;

    // Catcher follows the pointer (or the autopilot)
    let pointer_x = if input.autopilot {
        autopilot_target(state).or(input.pointer_x)
    } else {
        input.pointer_x
    };
    if let Some(x) = pointer_x {
        state.catcher.aim(x, state.field_width);
    }
    state.catcher.step(dt);

    // Fall
    for obj in &mut state.objects {
        obj.pos.y += obj.speed;
    }

    // Classify against the catcher
    let field_width = state.field_width;
    let catcher_x = state.catcher.x;
    let mut caught = Vec::new();
    let mut missed = Vec::new();
    state.objects.retain(|obj| {
        let near = (obj.pixel_x(field_width) - catcher_x).abs() < CATCH_RADIUS_PX;
        if near && obj.in_catch_band() {
            caught.push((obj.id, obj.kind));
            false
        } else if obj.is_missed() {
            missed.push((obj.id, obj.kind));
            false
        } else {
            true
        }
    });

    // Count each caught id once
    let mut hearts = 0u32;
    let mut bombs = 0u32;
    for (id, kind) in caught {
        if !state.processed.insert(id) {
            continue;
        }
        match kind {
            FallingKind::Beneficial => hearts += 1,
            FallingKind::Hazardous => bombs += 1,
        }
        state.events.push(CatchEvent::Caught { id, kind });
    }
    for (id, kind) in missed {
        state.events.push(CatchEvent::Missed { id, kind });
    }

    // Tally
    if hearts > 0 {
        state.score = (state.score + hearts).min(state.target_score);
    }
    if bombs > 0 {
        let lost = u8::try_from(bombs).unwrap_or(u8::MAX);
        state.lives = state.lives.saturating_sub(lost);
    }

    // Terminal check: losing the last life beats a winning catch in the same tick
    if state.lives == 0 {
        state.status = CatchStatus::Lost;
        state.events.push(CatchEvent::Lost);
        log::info!("Catch game lost at score {}", state.score);
    } else if state.score >= state.target_score {
        state.status = CatchStatus::Won;
        state.events.push(CatchEvent::Won);
        log::info!("Catch game won after {} ticks", state.time_ticks);
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Aim at the lowest heart still above the bottom of the catch band,
/// leaning away from the bomb it was spawned with
fn autopilot_target(state: &CatchState) -> Option<f32> {
    let width = state.field_width;
    let heart = state
        .objects
        .iter()
        .filter(|o| o.kind == FallingKind::Beneficial && o.pos.y < CATCH_BAND_BOTTOM)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    let heart_x = heart.pixel_x(width);
    let nudge = state
        .objects
        .iter()
        .find(|o| o.kind == FallingKind::Hazardous && o.id == heart.id + 1)
        .map(|bomb| {
            if bomb.pixel_x(width) >= heart_x {
                -AUTOPILOT_NUDGE
            } else {
                AUTOPILOT_NUDGE
            }
        })
        .unwrap_or(0.0);

    Some(heart_x + nudge)
}
