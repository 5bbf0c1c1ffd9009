use crate::level_gen::{Floor, Wall};
use crate::physics::PlayerState;

/// Resolve player-vs-floor contact and recompute `grounded`.
///
/// Floors are one-way: an ascending player passes through them. A falling
/// or resting player that overlaps a floor lands on the first one in
/// storage order, sunk one pixel into it so the next tick still sees
/// contact.
pub fn resolve_vertical(player: &mut PlayerState, floors: &[Floor]) {
    if player.is_ascending() {
        player.grounded = false;
        return;
    }
    match floors.iter().find(|f| player.rect.overlaps(&f.rect)) {
        Some(floor) => {
            player.rect.set_bottom(floor.rect.top() + 1);
            player.grounded = true;
        },
        None => player.grounded = false,
    }
}

/// Push the player out of the first side wall it overlaps.
///
/// Walls are screen-fixed, so each is tested at its world position:
/// shifted by the negated scroll offset.
pub fn resolve_horizontal(player: &mut PlayerState, walls: &[Wall], scroll_offset: i32) {
    for wall in walls {
        let world_rect = wall.rect.translated(0, -scroll_offset);
        if !player.rect.overlaps(&world_rect) {
            continue;
        }
        if wall.is_left() {
            player.rect.set_left(world_rect.right());
        } else {
            player.rect.set_right(world_rect.left());
        }
        break;
    }
}
