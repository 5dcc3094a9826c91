use std::time::Duration;

use anyhow::Result;

use crate::audio::SoundPlayer;
use crate::input::{ActionSnapshot, Controls};

/// Configuration values for the engine runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second assumed by scripted runs.
    pub frame_rate: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Platformer".into(),
            width: 1440,
            height: 900,
            frame_rate: 60.0,
        }
    }
}

/// Frame timing: per-frame delta, total elapsed time and the fixed-step
/// accumulator used for physics.
#[derive(Debug, Clone)]
pub struct GameClock {
    delta_time: Duration,
    elapsed_time: Duration,
    fixed_delta_time: Duration,
    fixed_time_accumulator: Duration,
    paused: bool,
}

impl GameClock {
    /// A clock running `fixed_rate` fixed updates per second.
    pub fn new(fixed_rate: f32) -> Self {
        Self {
            delta_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            fixed_delta_time: Duration::from_secs_f64(1.0 / fixed_rate.max(1.0) as f64),
            fixed_time_accumulator: Duration::ZERO,
            paused: false,
        }
    }

    /// Advance by a frame of `delta` and return the effective delta.
    ///
    /// While paused the effective delta is zero and nothing accumulates.
    pub fn advance(&mut self, delta: Duration) -> Duration {
        self.delta_time = if self.paused { Duration::ZERO } else { delta };
        self.elapsed_time += self.delta_time;
        self.fixed_time_accumulator += self.delta_time;
        self.delta_time
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Effective duration of the current frame.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Total unpaused time since the clock started.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    pub fn fixed_delta_time(&self) -> Duration {
        self.fixed_delta_time
    }

    /// Check if a fixed timestep update should run and consume accumulated time.
    ///
    /// Call this in a loop until it returns `false` to handle multiple fixed updates per frame.
    pub fn should_run_fixed_update(&mut self) -> bool {
        if self.fixed_time_accumulator >= self.fixed_delta_time {
            self.fixed_time_accumulator -= self.fixed_delta_time;
            true
        } else {
            false
        }
    }
}

/// Trait implemented by game code to hook into the engine lifecycle.
pub trait Game {
    /// Called once before the first frame.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Advance the game by one frame of `delta`.
    fn update(
        &mut self,
        controls: &dyn Controls,
        audio: &mut dyn SoundPlayer,
        delta: Duration,
    ) -> Result<()>;
}

/// Input and frame time of one scripted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedFrame {
    pub controls: ActionSnapshot,
    pub delta: Duration,
}

/// Drives a `Game` frame by frame.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A frame lasting one frame period of the configured rate.
    pub fn frame(&self, controls: ActionSnapshot) -> ScriptedFrame {
        ScriptedFrame {
            controls,
            delta: Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0) as f64),
        }
    }

    /// `count` identical frames.
    pub fn frames(&self, controls: ActionSnapshot, count: usize) -> Vec<ScriptedFrame> {
        vec![self.frame(controls); count]
    }

    /// Run `game` over the given frames. Returns the number of frames run.
    pub fn run_scripted<G, I>(
        &self,
        game: &mut G,
        frames: I,
        audio: &mut dyn SoundPlayer,
    ) -> Result<usize>
    where
        G: Game,
        I: IntoIterator<Item = ScriptedFrame>,
    {
        log::info!(
            "Running {} ({}x{})",
            self.config.title,
            self.config.width,
            self.config.height
        );
        game.init()?;

        let mut count = 0;
        for frame in frames {
            game.update(&frame.controls, audio, frame.delta)?;
            count += 1;
        }
        log::info!("{} finished after {} frames", self.config.title, count);
        Ok(count)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Sound, SoundLog};
    use crate::input::Action;

    #[test]
    fn paused_clock_reports_zero_delta() {
        let mut clock = GameClock::new(60.0);
        assert_eq!(clock.advance(Duration::from_millis(16)), Duration::from_millis(16));

        clock.pause();
        assert_eq!(clock.advance(Duration::from_millis(16)), Duration::ZERO);
        assert_eq!(clock.delta_time(), Duration::ZERO);
        assert_eq!(clock.elapsed_time(), Duration::from_millis(16));

        clock.resume();
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.elapsed_time(), Duration::from_millis(20));
    }

    #[test]
    fn fixed_steps_follow_accumulated_time() {
        let mut clock = GameClock::new(60.0);
        clock.advance(Duration::from_millis(10));
        assert!(!clock.should_run_fixed_update());

        clock.advance(Duration::from_millis(41));
        let mut steps = 0;
        while clock.should_run_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn paused_clock_accumulates_no_steps() {
        let mut clock = GameClock::new(60.0);
        clock.pause();
        clock.advance(Duration::from_secs(1));
        assert!(!clock.should_run_fixed_update());
    }

    struct Counter {
        inits: usize,
        jumps: usize,
        time: Duration,
    }

    impl Game for Counter {
        fn init(&mut self) -> Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn update(
            &mut self,
            controls: &dyn Controls,
            audio: &mut dyn SoundPlayer,
            delta: Duration,
        ) -> Result<()> {
            if controls.jump_pressed() {
                self.jumps += 1;
                audio.play(Sound::Jump, 1.0);
            }
            self.time += delta;
            Ok(())
        }
    }

    #[test]
    fn scripted_run_feeds_every_frame() {
        let engine = Engine::new().with_title("test").with_frame_rate(50.0);
        let mut frames = engine.frames(ActionSnapshot::new(), 3);
        frames.push(engine.frame(ActionSnapshot::new().press(Action::JumpAlt)));

        let mut game = Counter {
            inits: 0,
            jumps: 0,
            time: Duration::ZERO,
        };
        let mut audio = SoundLog::new();
        let count = engine.run_scripted(&mut game, frames, &mut audio).unwrap();

        assert_eq!(count, 4);
        assert_eq!(game.inits, 1);
        assert_eq!(game.jumps, 1);
        assert_eq!(game.time, Duration::from_millis(80));
        assert_eq!(audio.count(Sound::Jump), 1);
    }
}
