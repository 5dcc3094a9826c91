use std::{collections::HashMap, io::Cursor, path::Path, sync::Arc};

use anyhow::{anyhow, Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

/// Sound effects the scene plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Jump,
    Coin,
    Footstep1,
    Footstep2,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Jump, Sound::Coin, Sound::Footstep1, Sound::Footstep2];

    /// Asset key, also the file stem under the audio directory.
    pub fn key(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::Coin => "coin",
            Sound::Footstep1 => "footstep1",
            Sound::Footstep2 => "footstep2",
        }
    }
}

/// Something that can play a named sound at a volume.
pub trait SoundPlayer {
    fn play(&mut self, sound: Sound, volume: f32);
}

/// Plays sound effects on the default output device.
///
/// Sounds are decoded once at load time so a broken asset fails during
/// setup rather than mid-game.
pub struct AudioSystem {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sounds: HashMap<Sound, Arc<[u8]>>,
    available: bool,
}

impl AudioSystem {
    /// Open the default audio output device.
    ///
    /// A missing device is not an error: the system reports itself
    /// unavailable and playback becomes a no-op.
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => Self {
                _stream: Some(stream),
                stream_handle: Some(stream_handle),
                sounds: HashMap::new(),
                available: true,
            },
            Err(e) => {
                log::warn!("Failed to initialize audio: {}. Audio will be unavailable.", e);
                Self {
                    _stream: None,
                    stream_handle: None,
                    sounds: HashMap::new(),
                    available: false,
                }
            }
        }
    }

    /// Check if audio is available and working.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Load a sound from a file.
    pub fn load_sound<P: AsRef<Path>>(&mut self, sound: Sound, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to open sound file {:?}", path))?;
        self.load_sound_from_bytes(sound, bytes)
            .with_context(|| format!("Failed to load sound file {:?}", path))
    }

    /// Load a sound from bytes (useful for embedded assets).
    pub fn load_sound_from_bytes(&mut self, sound: Sound, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let bytes: Vec<u8> = bytes.into();
        let bytes: Arc<[u8]> = bytes.into();
        Decoder::new(Cursor::new(bytes.clone()))
            .map_err(|e| anyhow!("Failed to decode sound `{}`: {}", sound.key(), e))?;
        self.sounds.insert(sound, bytes);
        Ok(())
    }

    pub fn is_loaded(&self, sound: Sound) -> bool {
        self.sounds.contains_key(&sound)
    }

    /// Play a loaded sound once. Multiple sounds can play simultaneously.
    pub fn play_sound(&self, sound: Sound, volume: f32) -> Result<()> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or_else(|| anyhow!("Audio system is not available"))?;
        let bytes = self
            .sounds
            .get(&sound)
            .ok_or_else(|| anyhow!("Sound `{}` is not loaded", sound.key()))?;

        let source = Decoder::new(Cursor::new(bytes.clone()))
            .map_err(|e| anyhow!("Failed to decode sound `{}`: {}", sound.key(), e))?;
        let sink = Sink::try_new(stream_handle)
            .map_err(|e| anyhow!("Failed to create audio sink: {}", e))?;
        sink.set_volume(volume.max(0.0));
        sink.append(source);
        sink.detach(); // Let it play and clean up automatically

        Ok(())
    }
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPlayer for AudioSystem {
    fn play(&mut self, sound: Sound, volume: f32) {
        if !self.available {
            return;
        }
        if let Err(e) = self.play_sound(sound, volume) {
            log::warn!("{e:#}");
        }
    }
}

/// Records every play request instead of making noise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SoundLog {
    plays: Vec<(Sound, f32)>,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> &[(Sound, f32)] {
        &self.plays
    }

    /// How often `sound` was played.
    pub fn count(&self, sound: Sound) -> usize {
        self.plays.iter().filter(|(s, _)| *s == sound).count()
    }

    pub fn clear(&mut self) {
        self.plays.clear();
    }
}

impl SoundPlayer for SoundLog {
    fn play(&mut self, sound: Sound, volume: f32) {
        self.plays.push((sound, volume));
    }
}
