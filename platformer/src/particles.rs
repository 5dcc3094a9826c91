use crate::math::{linear, Vec2};

/// The named particle effects of the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Dust kicked up while running on the ground.
    Walking,
    /// Smoke falling off a wall the player slides down.
    WallSlide,
    /// One-shot muzzle flash at the feet on every jump.
    Jump,
    /// Streak behind the player at high speed.
    Trail,
}

impl Effect {
    pub const ALL: [Effect; 4] = [Effect::Walking, Effect::WallSlide, Effect::Jump, Effect::Trail];

    pub fn name(self) -> &'static str {
        match self {
            Effect::Walking => "walking",
            Effect::WallSlide => "walls",
            Effect::Jump => "jump",
            Effect::Trail => "trail",
        }
    }

    /// Look and timing of the effect.
    pub fn default_config(self) -> EffectConfig {
        let smoke = vec!["smoke_03.png".to_string(), "smoke_09.png".to_string()];
        match self {
            Effect::Walking => EffectConfig {
                frames: smoke,
                random_frame: true,
                scale_start: 0.04,
                scale_end: 0.01,
                alpha_end: 0.1,
                lifespan_ms: 200.0,
                depth: 2,
                ..EffectConfig::default()
            },
            Effect::WallSlide => EffectConfig {
                frames: smoke,
                random_frame: true,
                scale_start: 0.15,
                scale_end: 0.01,
                alpha_end: 0.1,
                lifespan_ms: 200.0,
                depth: 2,
                ..EffectConfig::default()
            },
            Effect::Jump => EffectConfig {
                frames: (1..=5).map(|i| format!("muzzle_0{i}.png")).collect(),
                random_frame: false,
                scale_start: 0.2,
                scale_end: 0.2,
                alpha_end: 0.1,
                lifespan_ms: 200.0,
                depth: 2,
                ..EffectConfig::default()
            },
            Effect::Trail => EffectConfig {
                frames: vec!["symbol_01.png".to_string()],
                random_frame: false,
                scale_start: 0.2,
                scale_end: 0.1,
                alpha_end: 0.25,
                lifespan_ms: 400.0,
                frequency_ms: 20.0,
                depth: 0,
                ..EffectConfig::default()
            },
        }
    }
}

/// How an emitter spawns and ages its particles.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    /// Texture frame names particles are drawn with.
    pub frames: Vec<String>,
    /// Pick frames at random instead of cycling through them.
    pub random_frame: bool,
    pub scale_start: f32,
    pub scale_end: f32,
    pub alpha_start: f32,
    pub alpha_end: f32,
    pub lifespan_ms: f32,
    /// Time between emissions while running; 0 emits on every update.
    pub frequency_ms: f32,
    /// Particles per emission, and per `explode`.
    pub quantity: usize,
    /// Draw order; higher is drawn on top.
    pub depth: i32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            random_frame: false,
            scale_start: 1.0,
            scale_end: 1.0,
            alpha_start: 1.0,
            alpha_end: 1.0,
            lifespan_ms: 1000.0,
            frequency_ms: 0.0,
            quantity: 1,
            depth: 0,
        }
    }
}

/// A single particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Current position in world coordinates
    pub position: Vec2,
    /// Current velocity (units per second)
    pub velocity: Vec2,
    /// Index into the emitter's frame list
    pub frame: usize,
    pub scale: f32,
    pub alpha: f32,
    /// Remaining lifetime in seconds (0.0 = dead)
    pub lifetime: f32,
    pub max_lifetime: f32,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Get the normalized age (0.0 = just spawned, 1.0 = about to die).
    pub fn age(&self) -> f32 {
        if self.max_lifetime > 0.0 {
            1.0 - (self.lifetime / self.max_lifetime)
        } else {
            0.0
        }
    }
}

/// Emits particles of one effect.
///
/// A running emitter (`start`) keeps emitting at its anchor until `stop`;
/// calling `start` again while running only moves the anchor. Stopping
/// never removes live particles, they fade out over their lifespan.
pub struct ParticleEmitter {
    config: EffectConfig,
    particles: Vec<Particle>,
    anchor: Vec2,
    velocity: Vec2,
    emitting: bool,
    /// Milliseconds accumulated toward the next emission
    spawn_timer: f32,
    next_frame: usize,
    max_particles: usize,
    rng: fastrand::Rng,
}

impl ParticleEmitter {
    pub fn new(config: EffectConfig) -> Self {
        Self::with_rng(config, fastrand::Rng::new())
    }

    pub fn with_rng(config: EffectConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            particles: Vec::new(),
            anchor: Vec2::ZERO,
            velocity: Vec2::ZERO,
            emitting: false,
            spawn_timer: 0.0,
            next_frame: 0,
            max_particles: 256,
            rng,
        }
    }

    /// Emit continuously at `at`, giving new particles `velocity`.
    pub fn start(&mut self, at: Vec2, velocity: Vec2) {
        self.anchor = at;
        self.velocity = velocity;
        self.emitting = true;
    }

    /// Stop emitting. Live particles finish their lifespan.
    pub fn stop(&mut self) {
        self.emitting = false;
        self.spawn_timer = 0.0;
    }

    /// Emit one burst of `quantity` particles at `at` without starting the emitter.
    pub fn explode(&mut self, at: Vec2) {
        self.anchor = at;
        self.emit();
    }

    /// Age live particles and emit new ones. `dt` is in seconds.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.lifetime = (particle.lifetime - dt).max(0.0);

            let age = particle.age();
            particle.scale = linear(self.config.scale_start, self.config.scale_end, age);
            particle.alpha = linear(self.config.alpha_start, self.config.alpha_end, age);
        }
        self.particles.retain(Particle::is_alive);

        if !self.emitting {
            return;
        }
        if self.config.frequency_ms <= 0.0 {
            self.emit();
            return;
        }
        self.spawn_timer += dt * 1000.0;
        while self.spawn_timer >= self.config.frequency_ms {
            self.spawn_timer -= self.config.frequency_ms;
            self.emit();
        }
    }

    fn emit(&mut self) {
        for _ in 0..self.config.quantity {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let frame = self.pick_frame();
            let lifetime = self.config.lifespan_ms / 1000.0;
            self.particles.push(Particle {
                position: self.anchor,
                velocity: self.velocity,
                frame,
                scale: self.config.scale_start,
                alpha: self.config.alpha_start,
                lifetime,
                max_lifetime: lifetime,
            });
        }
    }

    fn pick_frame(&mut self) -> usize {
        let count = self.config.frames.len();
        if count == 0 {
            return 0;
        }
        if self.config.random_frame {
            self.rng.usize(..count)
        } else {
            let frame = self.next_frame % count;
            self.next_frame = (frame + 1) % count;
            frame
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frame name a particle is drawn with.
    pub fn frame_name(&self, particle: &Particle) -> Option<&str> {
        self.config.frames.get(particle.frame).map(String::as_str)
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// The emitter is running or still has live particles.
    pub fn is_active(&self) -> bool {
        self.emitting || !self.particles.is_empty()
    }

    pub fn position(&self) -> Vec2 {
        self.anchor
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }
}

/// One emitter per `Effect`.
pub struct ParticleEffects {
    emitters: Vec<(Effect, ParticleEmitter)>,
}

impl ParticleEffects {
    pub fn new() -> Self {
        Self::build(|_| fastrand::Rng::new())
    }

    /// Effects with deterministic frame picks.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(|i| fastrand::Rng::with_seed(seed.wrapping_add(i as u64)))
    }

    fn build(mut rng: impl FnMut(usize) -> fastrand::Rng) -> Self {
        let emitters = Effect::ALL
            .iter()
            .enumerate()
            .map(|(i, &effect)| {
                let emitter = ParticleEmitter::with_rng(effect.default_config(), rng(i));
                (effect, emitter)
            })
            .collect();
        Self { emitters }
    }

    pub fn emitter(&self, effect: Effect) -> &ParticleEmitter {
        &self.emitters[Self::index(effect)].1
    }

    pub fn emitter_mut(&mut self, effect: Effect) -> &mut ParticleEmitter {
        &mut self.emitters[Self::index(effect)].1
    }

    fn index(effect: Effect) -> usize {
        match effect {
            Effect::Walking => 0,
            Effect::WallSlide => 1,
            Effect::Jump => 2,
            Effect::Trail => 3,
        }
    }

    pub fn start(&mut self, effect: Effect, at: Vec2, velocity: Vec2) {
        self.emitter_mut(effect).start(at, velocity);
    }

    pub fn stop(&mut self, effect: Effect) {
        self.emitter_mut(effect).stop();
    }

    pub fn explode(&mut self, effect: Effect, at: Vec2) {
        self.emitter_mut(effect).explode(at);
    }

    pub fn update(&mut self, dt: f32) {
        for (_, emitter) in &mut self.emitters {
            emitter.update(dt);
        }
    }

    /// Emitters ordered back to front.
    pub fn by_depth(&self) -> Vec<(Effect, &ParticleEmitter)> {
        let mut sorted: Vec<(Effect, &ParticleEmitter)> =
            self.emitters.iter().map(|(e, em)| (*e, em)).collect();
        sorted.sort_by_key(|(_, em)| em.config().depth);
        sorted
    }

    /// Number of live particles across all effects.
    pub fn live_count(&self) -> usize {
        self.emitters.iter().map(|(_, em)| em.particles().len()).sum()
    }
}

impl Default for ParticleEffects {
    fn default() -> Self {
        Self::new()
    }
}
