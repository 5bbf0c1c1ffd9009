use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::level_gen::Floor;
use crate::physics::{Intents, MoveDir};
use crate::session::GameSession;

/// Length of the agent component: x, relative height, grounded.
pub const AGENT_LEN: usize = 3;

impl TryFrom<u8> for MoveDir {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MoveDir::None),
            1 => Ok(MoveDir::Left),
            2 => Ok(MoveDir::Right),
            other => Err(ActionError::MoveOutOfRange(other)),
        }
    }
}

/// Decode an agent action pair `[jump, move]` with jump in {0, 1} and move in
/// {0: none, 1: left, 2: right}.
impl TryFrom<[u8; 2]> for Intents {
    type Error = ActionError;

    fn try_from([jump, movement]: [u8; 2]) -> Result<Self, Self::Error> {
        let jump = match jump {
            0 => false,
            1 => true,
            other => return Err(ActionError::JumpOutOfRange(other)),
        };
        Ok(Intents::new(jump, MoveDir::try_from(movement)?))
    }
}

impl From<Intents> for [u8; 2] {
    fn from(intents: Intents) -> Self {
        let movement = match intents.move_dir {
            MoveDir::None => 0,
            MoveDir::Left => 1,
            MoveDir::Right => 2,
        };
        [u8::from(intents.jump), movement]
    }
}

/// Normalized agent-facing view of a session. Every value is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Player centre x, player bottom relative to the important floors, and
    /// grounded as 0/1.
    pub agent: [f64; AGENT_LEN],
    /// Left and right edge of each important floor, zero-padded.
    pub important_floors_x: Vec<f64>,
    /// Top of each important floor (once per edge), zero-padded.
    pub important_floors_y: Vec<f64>,
}

impl Observation {
    /// Components in observation-space order.
    pub fn components(&self) -> Vec<Vec<f64>> {
        vec![
            self.agent.to_vec(),
            self.important_floors_x.clone(),
            self.important_floors_y.clone(),
        ]
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.agent
            .iter()
            .chain(&self.important_floors_x)
            .chain(&self.important_floors_y)
            .copied()
    }
}

/// Up to `limit` floors, in storage order, whose top lies above
/// `player_bottom + 2 * platform_gap`.
pub fn important_floors(
    floors: &[Floor],
    player_bottom: i32,
    platform_gap: i32,
    limit: usize,
) -> Vec<&Floor> {
    floors
        .iter()
        .filter(|f| f.rect.top() - 2 * platform_gap < player_bottom)
        .take(limit)
        .collect()
}

/// Maps values into `[0, 1]` over `[min, max]`; a degenerate range maps
/// everything to 0.
#[derive(Debug, Clone, Copy)]
struct UnitScale {
    min: i32,
    range: i32,
}

impl UnitScale {
    fn spanning(values: impl Iterator<Item = i32>) -> Self {
        let (min, max) = values.fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min > max {
            return Self { min: 0, range: 0 };
        }
        Self {
            min,
            range: max - min,
        }
    }

    fn apply(self, v: i32) -> f64 {
        if self.range <= 0 {
            return 0.0;
        }
        (f64::from(v - self.min) / f64::from(self.range)).clamp(0.0, 1.0)
    }
}

fn unit(v: i32, extent: i32) -> f64 {
    (f64::from(v) / f64::from(extent)).clamp(0.0, 1.0)
}

/// Encode the session state the agent sees.
pub fn encode<R>(session: &GameSession<R>) -> Observation {
    let config = session.config();
    let width = config.window.width;
    let n = config.observation.important_floors;
    let player = session.player();

    let selected = important_floors(
        session.floors(),
        player.rect.bottom(),
        config.level.platform_gap,
        n,
    );
    let scale = UnitScale::spanning(selected.iter().map(|f| f.rect.top()));

    let mut xs = Vec::with_capacity(2 * n);
    let mut ys = Vec::with_capacity(2 * n);
    for floor in &selected {
        let y = scale.apply(floor.rect.top());
        xs.push(unit(floor.rect.left(), width));
        xs.push(unit(floor.rect.right(), width));
        ys.push(y);
        ys.push(y);
    }
    xs.resize(2 * n, 0.0);
    ys.resize(2 * n, 0.0);

    Observation {
        agent: [
            unit(player.rect.center_x(), width),
            scale.apply(player.rect.bottom()),
            if player.grounded { 1.0 } else { 0.0 },
        ],
        important_floors_x: xs,
        important_floors_y: ys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClimberConfig;
    use towerclimb_core::geometry::Rect;

    fn floor(x: i32, y: i32, w: i32) -> Floor {
        Floor {
            rect: Rect::new(x, y, w, 4),
        }
    }

    #[test]
    fn decodes_valid_actions() {
        assert_eq!(Intents::try_from([0u8, 0]), Ok(Intents::IDLE));
        assert_eq!(
            Intents::try_from([1u8, 2]),
            Ok(Intents::new(true, MoveDir::Right))
        );
        assert_eq!(
            Intents::try_from([0u8, 1]),
            Ok(Intents::new(false, MoveDir::Left))
        );
    }

    #[test]
    fn rejects_out_of_range_actions() {
        assert_eq!(
            Intents::try_from([2u8, 0]),
            Err(ActionError::JumpOutOfRange(2))
        );
        assert_eq!(
            Intents::try_from([1u8, 3]),
            Err(ActionError::MoveOutOfRange(3))
        );
    }

    #[test]
    fn action_encoding_is_inverse() {
        for jump in 0..2u8 {
            for movement in 0..3u8 {
                let intents = Intents::try_from([jump, movement]).unwrap();
                assert_eq!(<[u8; 2]>::from(intents), [jump, movement]);
            }
        }
    }

    #[test]
    fn important_floors_walk_storage_order() {
        let floors = [
            floor(0, 796, 500),
            floor(100, 706, 50),
            floor(200, 616, 50),
            floor(300, 526, 50),
        ];
        let picked = important_floors(&floors, 500, 90, 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].rect.top(), 616, "796 - 180 is not above 500");
        assert_eq!(picked[1].rect.top(), 526);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let scale = UnitScale::spanning([706].into_iter());
        assert_eq!(scale.apply(706), 0.0);
        assert_eq!(scale.apply(900), 0.0);
        let empty = UnitScale::spanning(std::iter::empty());
        assert_eq!(empty.apply(10), 0.0);
    }

    #[test]
    fn scale_clamps_outside_range() {
        let scale = UnitScale::spanning([100, 200].into_iter());
        assert_eq!(scale.apply(150), 0.5);
        assert_eq!(scale.apply(250), 1.0);
        assert_eq!(scale.apply(50), 0.0);
    }

    #[test]
    fn initial_observation_layout() {
        let session = GameSession::new(ClimberConfig::default(), 42).unwrap();
        let obs = encode(&session);
        assert_eq!(obs.important_floors_x.len(), 12);
        assert_eq!(obs.important_floors_y.len(), 12);
        assert_eq!(obs.agent[0], 265.0 / 500.0);
        assert_eq!(obs.agent[2], 0.0);
        // Base floor is the lowest selected floor, so its y normalizes to 1
        // and both of its edges span the window.
        assert_eq!(obs.important_floors_x[0], 0.0);
        assert_eq!(obs.important_floors_x[1], 1.0);
        assert_eq!(obs.important_floors_y[0], 1.0);
        assert_eq!(obs.important_floors_y[1], 1.0);
        assert!(obs.values().all(|v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn grounded_flag_reflects_contact() {
        let mut session = GameSession::new(ClimberConfig::default(), 42).unwrap();
        for _ in 0..30 {
            session.tick(Intents::IDLE);
        }
        let obs = encode(&session);
        assert_eq!(obs.agent[2], 1.0);
        assert_eq!(obs.agent[1], 1.0, "bottom is one pixel into the base floor");
    }

    #[test]
    fn pads_when_few_floors_qualify() {
        let mut cfg = ClimberConfig::default();
        cfg.level.level_count = 1;
        let session = GameSession::new(cfg, 1).unwrap();
        let obs = encode(&session);
        assert_eq!(obs.important_floors_x.len(), 12);
        assert!(obs.important_floors_x[4..].iter().all(|v| *v == 0.0));
        assert!(obs.important_floors_y[4..].iter().all(|v| *v == 0.0));
    }
}
