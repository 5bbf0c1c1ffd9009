/// Consumer of per-frame read-only snapshots (window, terminal, recorder).
///
/// The simulation never depends on a draw call succeeding, so rendering
/// reports nothing back.
pub trait Renderer<F> {
    fn render(&mut self, frame: &F);
}

/// Producer of decoded per-tick intents (keyboard, gamepad, script).
pub trait InputSource<I> {
    fn poll(&mut self) -> I;
}

/// Renderer that drops every frame, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl<F> Renderer<F> for NullRenderer {
    fn render(&mut self, _frame: &F) {}
}

/// Input source that replays a fixed sequence, then repeats `idle`.
#[derive(Debug, Clone)]
pub struct ScriptedInput<I> {
    script: Vec<I>,
    cursor: usize,
    idle: I,
}

impl<I: Clone> ScriptedInput<I> {
    pub fn new(script: Vec<I>, idle: I) -> Self {
        Self {
            script,
            cursor: 0,
            idle,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.cursor)
    }
}

impl<I: Clone> InputSource<I> for ScriptedInput<I> {
    fn poll(&mut self) -> I {
        match self.script.get(self.cursor) {
            Some(input) => {
                self.cursor += 1;
                input.clone()
            },
            None => self.idle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_falls_back_to_idle() {
        let mut input = ScriptedInput::new(vec![1, 2], 0);
        assert_eq!(input.remaining(), 2);
        assert_eq!(input.poll(), 1);
        assert_eq!(input.poll(), 2);
        assert_eq!(input.poll(), 0);
        assert_eq!(input.poll(), 0);
        assert_eq!(input.remaining(), 0);
    }
}
