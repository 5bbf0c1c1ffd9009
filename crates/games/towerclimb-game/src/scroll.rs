use towerclimb_core::geometry::Rect;

/// Raise the camera so the player's screen-space top never goes above
/// `threshold`.
///
/// Screen y is world y plus `offset`. The player climbs toward smaller
/// world y, so the offset only ever grows: the camera follows upward and
/// never scrolls back down.
pub fn update_offset(offset: &mut i32, player: &Rect, threshold: i32) {
    let screen_top = player.top() + *offset;
    if screen_top < threshold {
        *offset += threshold - screen_top;
    }
}

/// Screen-space copy of a world rectangle.
pub fn to_screen(rect: &Rect, offset: i32) -> Rect {
    rect.translated(0, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_player_to_threshold() {
        let mut offset = 0;
        let player = Rect::new(250, 380, 30, 50);
        update_offset(&mut offset, &player, 400);
        assert_eq!(offset, 20);
        assert_eq!(to_screen(&player, offset).top(), 400);
    }

    #[test]
    fn never_scrolls_back_down() {
        let mut offset = 20;
        update_offset(&mut offset, &Rect::new(250, 700, 30, 50), 400);
        assert_eq!(offset, 20);
    }

    #[test]
    fn below_threshold_is_untouched() {
        let mut offset = 0;
        update_offset(&mut offset, &Rect::new(250, 736, 30, 50), 400);
        assert_eq!(offset, 0);
    }

    #[test]
    fn offset_is_monotonic_over_a_climb() {
        let mut offset = 0;
        let mut last = offset;
        for y in (-2000..=736).rev().step_by(7) {
            update_offset(&mut offset, &Rect::new(0, y, 30, 50), 400);
            assert!(offset >= last);
            last = offset;
        }
        assert_eq!(offset, 400 - (-2000 + (736 + 2000) % 7));
    }
}
