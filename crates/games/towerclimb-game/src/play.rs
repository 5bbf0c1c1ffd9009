use rand::{Rng, SeedableRng};

use towerclimb_core::frame::{InputSource, Renderer};

use crate::physics::Intents;
use crate::session::{FrameSnapshot, GameSession, SessionState};

/// Outcome of an interactive run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaySummary {
    pub frames: u64,
    pub score: f64,
    pub state: SessionState,
}

/// Drive a session frame by frame: poll input, tick, render. Stops when the
/// episode ends or after `max_frames`, whichever comes first.
pub fn run<R, I, D>(
    session: &mut GameSession<R>,
    input: &mut I,
    renderer: &mut D,
    max_frames: u64,
) -> PlaySummary
where
    R: Rng + SeedableRng,
    I: InputSource<Intents>,
    D: Renderer<FrameSnapshot>,
{
    renderer.render(&session.snapshot());
    let mut frames = 0;
    while frames < max_frames && !session.is_ended() {
        let intents = input.poll();
        session.tick(intents);
        renderer.render(&session.snapshot());
        frames += 1;
    }
    PlaySummary {
        frames,
        score: session.score(),
        state: session.state(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClimberConfig;
    use crate::physics::MoveDir;
    use crate::session::EndCause;
    use towerclimb_core::frame::{NullRenderer, ScriptedInput};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<FrameSnapshot>,
    }

    impl Renderer<FrameSnapshot> for Recorder {
        fn render(&mut self, frame: &FrameSnapshot) {
            self.frames.push(frame.clone());
        }
    }

    #[test]
    fn renders_initial_frame_and_every_tick() {
        let mut session = GameSession::new(ClimberConfig::default(), 1).unwrap();
        let mut input = ScriptedInput::new(vec![], Intents::IDLE);
        let mut recorder = Recorder::default();
        let summary = run(&mut session, &mut input, &mut recorder, 10);
        assert_eq!(summary.frames, 10);
        assert_eq!(recorder.frames.len(), 11);
        assert_eq!(recorder.frames[0].elapsed_secs, 0.0);
        assert_eq!(summary.state, SessionState::Active);
    }

    #[test]
    fn stops_at_episode_end() {
        let mut session = GameSession::new(ClimberConfig::default(), 1).unwrap();
        let mut input = ScriptedInput::new(vec![], Intents::IDLE);
        let summary = run(&mut session, &mut input, &mut NullRenderer, 5000);
        assert_eq!(summary.frames, 1200);
        assert_eq!(summary.state, SessionState::Ended(EndCause::TimeUp));
    }

    #[test]
    fn follows_scripted_input() {
        let mut session = GameSession::new(ClimberConfig::default(), 1).unwrap();
        let script = vec![Intents::new(false, MoveDir::Left); 5];
        let mut input = ScriptedInput::new(script, Intents::IDLE);
        run(&mut session, &mut input, &mut NullRenderer, 20);
        assert_eq!(session.player().rect.x, 250 - 5 * 6);
    }
}
