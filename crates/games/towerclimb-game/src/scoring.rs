use towerclimb_core::geometry::Rect;

use crate::level_gen::Floor;

/// Points per floor the player has climbed onto or past.
pub const FLOOR_POINTS: f64 = 100.0;
/// A floor whose top is less than this many pixels above the player's bottom
/// still counts as beneath the player.
const BENEATH_TOLERANCE: i32 = 2;

/// Number of floors at or below the player's feet.
pub fn floors_beneath(player: &Rect, floors: &[Floor]) -> usize {
    floors
        .iter()
        .filter(|f| f.rect.top() + BENEATH_TOLERANCE > player.bottom())
        .count()
}

/// Episode score: floor points minus a penalty proportional to the share of
/// the episode already spent.
pub fn score(
    floors_beneath: usize,
    elapsed_secs: f64,
    duration_secs: f64,
    time_penalty: f64,
) -> f64 {
    floors_beneath as f64 * FLOOR_POINTS - elapsed_secs / duration_secs * time_penalty
}
