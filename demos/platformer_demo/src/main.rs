use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use platformer::{
    Action, ActionSnapshot, AudioSystem, Engine, Level, PlatformerConfig, PlatformerScene,
    ScriptedFrame, Sound, SoundLog, SoundPlayer,
};

const LEVEL: &str = include_str!("../../../assets/levels/level1.json");
const AUDIO_DIR: &str = "assets/audio";
const USAGE: &str = "platformer_demo [--config <path>]";

/// Plays through real audio when every sound loads, otherwise records plays.
enum Speakers {
    Device(AudioSystem),
    Silent(SoundLog),
}

impl Speakers {
    fn open(dir: &Path) -> Self {
        let mut audio = AudioSystem::new();
        if !audio.is_available() {
            return Self::Silent(SoundLog::new());
        }
        for sound in Sound::ALL {
            let path = dir.join(format!("{}.wav", sound.key()));
            if let Err(err) = audio.load_sound(sound, &path) {
                println!("No sound for {} ({err:#}), running silent", sound.key());
                return Self::Silent(SoundLog::new());
            }
        }
        Self::Device(audio)
    }

    fn player(&mut self) -> &mut dyn SoundPlayer {
        match self {
            Self::Device(audio) => audio,
            Self::Silent(log) => log,
        }
    }
}

fn config_path() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (None, _) => Ok(None),
        (Some("--config"), Some(path)) => Ok(Some(PathBuf::from(path))),
        (Some(other), _) => anyhow::bail!("Unexpected argument `{other}`; usage: {USAGE}"),
    }
}

/// Run right across the level, hopping every second and wall jumping
/// whenever the player stalls against a wall.
fn script(engine: &Engine) -> Vec<ScriptedFrame> {
    let run = ActionSnapshot::new().hold(Action::Right);
    let hop = ActionSnapshot::new().hold(Action::Right).press(Action::Jump);
    let hold_jump = ActionSnapshot::new().hold(Action::Right).hold(Action::Jump);

    let mut frames = engine.frames(ActionSnapshot::new(), 30);
    for second in 0..20 {
        frames.push(engine.frame(if second % 2 == 0 { hop.clone() } else { run.clone() }));
        frames.extend(engine.frames(hold_jump.clone(), 20));
        frames.extend(engine.frames(run.clone(), 39));
    }
    frames.push(engine.frame(ActionSnapshot::new().press(Action::DebugToggle)));
    frames
}

fn main() -> Result<()> {
    let config = match config_path()? {
        Some(path) => PlatformerConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlatformerConfig::default(),
    };
    let level = Level::from_json(LEVEL).context("Failed to parse bundled level")?;

    let engine = Engine::new()
        .with_title("Platformer Demo")
        .with_size(
            config.camera.viewport.x as u32,
            config.camera.viewport.y as u32,
        );
    let mut scene = PlatformerScene::new(config, level)?;
    let mut speakers = Speakers::open(Path::new(AUDIO_DIR));

    let frames = engine.run_scripted(&mut scene, script(&engine), speakers.player())?;

    let position = scene.player_position();
    println!("Frames run:        {frames}");
    println!("Player position:   ({:.1}, {:.1})", position.x, position.y);
    println!("Coins remaining:   {}", scene.coins().len());
    println!("Level complete:    {}", scene.is_won());
    let camera = scene.camera().position;
    println!("Camera position:   ({:.1}, {:.1})", camera.x, camera.y);
    println!("Live particles:    {}", scene.effects().live_count());
    println!("Collider outlines: {}", scene.debug_shapes().len());
    if let Some(banner) = scene.win_text() {
        println!("Banner:            {}", banner.text.replace('\n', ""));
    }
    if let Speakers::Silent(log) = &speakers {
        for sound in Sound::ALL {
            println!("Sound {:<10} played {} times", sound.key(), log.count(sound));
        }
    }
    Ok(())
}
