use anyhow::Result;
use serde::{Deserialize, Serialize};
use starspew_core::EmitterConfig;
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_EFFECTS_PATH: &str = "config/effects.toml";

/// Which stock particle source drives an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Jet,
    Confetti,
    Sparkle,
}

/// One named emitter in the demo scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectEntry {
    /// Name used in logs and event records.
    pub name: String,
    /// Stock source shape.
    pub kind: EffectKind,
    /// Spawn origin in scene units.
    #[serde(default)]
    pub origin: [f32; 2],
    /// Jet direction in radians; unused by other kinds.
    #[serde(default = "default_angle")]
    pub angle: f32,
    /// Cadence/lifetime/gravity settings for the emitter.
    pub emitter: EmitterConfig,
}

fn default_angle() -> f32 {
    // Screen space points y-down, so straight up is a negative quarter turn.
    -std::f32::consts::FRAC_PI_2
}

/// Demo scene + timeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Frame spacing of the simulated clock, ms.
    pub frame_interval_ms: f64,
    /// Scripted run length, ms.
    pub run_ms: f64,
    /// Replay seek: when the clock reaches the first value, rewind to the
    /// second.
    pub seek: Option<[f64; 2]>,
    /// Master seed for effect randomness.
    pub seed: u64,
    /// Emitters to run.
    pub effects: Vec<EffectEntry>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            run_ms: 3000.0,
            seek: Some([1500.0, 500.0]),
            seed: 42,
            effects: vec![
                EffectEntry {
                    name: "confetti".into(),
                    kind: EffectKind::Confetti,
                    origin: [320.0, 360.0],
                    angle: default_angle(),
                    emitter: EmitterConfig {
                        particles_per_second: 120,
                        max_lifetime_ms: 2000.0,
                        gravity: 240.0,
                    },
                },
                EffectEntry {
                    name: "fountain".into(),
                    kind: EffectKind::Jet,
                    origin: [40.0, 480.0],
                    angle: -1.1,
                    emitter: EmitterConfig {
                        particles_per_second: 60,
                        max_lifetime_ms: 1400.0,
                        gravity: 380.0,
                    },
                },
            ],
        }
    }
}

impl EffectsConfig {
    /// Load the effects configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_EFFECTS_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on
    /// errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<EffectsConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    EffectsConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Effects config not found at {}. Using defaults",
                        path.display()
                    );
                }
                EffectsConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starspew_core::Emitter;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn default_effects_construct_valid_emitters() {
        let config = EffectsConfig::default();
        assert!(!config.effects.is_empty());
        for entry in &config.effects {
            Emitter::new(entry.emitter).expect("default entry must be valid");
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("starspew_effects_{timestamp}.toml"));

        let mut config = EffectsConfig::default();
        config.seed = 1234;
        config.seek = Some([900.0, 250.0]);
        config.save_to_path(&path).expect("save config");

        let loaded = EffectsConfig::load_from_path(&path);
        assert_eq!(loaded.seed, 1234);
        assert_eq!(loaded.seek, Some([900.0, 250.0]));
        assert_eq!(loaded.effects.len(), config.effects.len());
        assert_eq!(loaded.effects[0].name, "confetti");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let loaded = EffectsConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(loaded.seed, EffectsConfig::default().seed);
    }
}
