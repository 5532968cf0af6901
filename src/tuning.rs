//! Data-driven game balance
//!
//! Loaded from LocalStorage on the web and from a JSON file natively.
//! Missing fields take their defaults, so partial overrides are fine.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Slice capacities ===
    pub bullet_capacity: usize,
    pub bird_capacity: usize,
    /// Markers on the scorecard before it wraps
    pub scorecard_capacity: usize,

    // === Bird spawning ===
    /// Always spawn when fewer birds than this are alive
    pub min_birds_on_screen: usize,
    /// Per-tick chance of an extra spawn
    pub spawn_probability: f32,
    /// Vertical offset range for new birds
    pub bird_height: (f32, f32),
    /// Speed factor range, multiplied by `bird_step`
    pub bird_speed: (f32, f32),

    // === Movement ===
    /// Initial per-tick bird step (difficulty vector)
    pub bird_step: [f32; 2],
    /// Added to the bird step magnitude on every scorecard wrap
    pub difficulty_increment: f32,
    /// Per-tick bullet climb
    pub bullet_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: None,

            bullet_capacity: 10,
            bird_capacity: 8,
            scorecard_capacity: 5,

            min_birds_on_screen: 1,
            spawn_probability: 0.01,
            bird_height: (-0.2, 0.8),
            bird_speed: (0.5, 1.5),

            bird_step: [0.005, 0.0],
            difficulty_increment: 0.001,
            bullet_step: 0.02,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; the result is validated
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validated)
    }

    /// Clamp values into ranges the simulation can honour
    pub fn validated(mut self) -> Self {
        self.spawn_probability = self.spawn_probability.clamp(0.0, 1.0);
        self.min_birds_on_screen = self.min_birds_on_screen.min(self.bird_capacity);
        self.bird_height = ordered(self.bird_height);
        let (lo, hi) = ordered(self.bird_speed);
        self.bird_speed = (lo.max(0.0), hi.max(0.0));
        // Birds cross horizontally; the side they spawn on sets the sign
        self.bird_step = [self.bird_step[0].max(0.0), 0.0];
        self.difficulty_increment = self.difficulty_increment.max(0.0);
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "turret_shooter_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from `$TURRET_TUNING` or `./tuning.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = std::env::var("TURRET_TUNING").unwrap_or_else(|_| "tuning.json".to_owned());
        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }
}

fn ordered((a, b): (f32, f32)) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bird_capacity": 3, "seed": 7 }"#).unwrap();
        assert_eq!(tuning.bird_capacity, 3);
        assert_eq!(tuning.seed, Some(7));
        assert_eq!(tuning.bullet_capacity, Tuning::default().bullet_capacity);
    }

    #[test]
    fn test_validation_clamps() {
        let tuning = Tuning {
            spawn_probability: 4.0,
            bird_capacity: 2,
            min_birds_on_screen: 9,
            bird_speed: (2.0, 1.0),
            ..Default::default()
        }
        .validated();
        assert_eq!(tuning.spawn_probability, 1.0);
        assert_eq!(tuning.min_birds_on_screen, 2);
        assert_eq!(tuning.bird_speed, (1.0, 2.0));
    }

    #[test]
    fn test_bird_step_is_horizontal_and_forward() {
        let tuning = Tuning::from_json(r#"{ "bird_step": [-0.01, 0.3], "bird_speed": [-1.0, -2.0] }"#)
            .unwrap();
        assert_eq!(tuning.bird_step, [0.0, 0.0]);
        assert_eq!(tuning.bird_speed, (0.0, 0.0));

        let tuning = Tuning::from_json(r#"{ "bird_step": [0.01, 0.3] }"#).unwrap();
        assert_eq!(tuning.bird_step, [0.01, 0.0]);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
