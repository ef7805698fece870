//! Configuration types for reaction-diffusion simulation parameters.

use serde::{Deserialize, Serialize};

use super::FillRule;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Display pixels per grid cell. When set, the grid is sized from the
    /// surface on start and on every resize instead of using `width`/`height`.
    #[serde(default)]
    pub cell_size: Option<usize>,
    /// Diffusion rate of the substrate A.
    pub diffusion_a: f32,
    /// Diffusion rate of the pigment B.
    pub diffusion_b: f32,
    /// Time step per integration step.
    pub dt: f32,
    /// Integration steps per rendered frame.
    pub steps_per_frame: usize,
    /// Default feed rate, restored whenever explore mode ends.
    pub feed: f32,
    /// Default kill rate, restored whenever explore mode ends.
    pub kill: f32,
    /// Pointer and parameter-exploration settings.
    #[serde(default)]
    pub interaction: InteractionConfig,
    /// Initial concentration seeding.
    #[serde(default)]
    pub seeding: SeedingConfig,
    /// Silhouette mask settings.
    #[serde(default)]
    pub mask: MaskConfig,
    /// Color output settings.
    #[serde(default)]
    pub render: RenderConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            cell_size: None,
            diffusion_a: 0.2097,
            diffusion_b: 0.105,
            dt: 1.0,
            steps_per_frame: 10,
            feed: 0.055,
            kill: 0.062,
            interaction: InteractionConfig::default(),
            seeding: SeedingConfig::default(),
            mask: MaskConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Pointer dosing and parameter exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Dose radius in cells on press.
    pub drop_radius: i32,
    /// Fraction of `drop_radius` used while dragging.
    pub drag_radius_factor: f32,
    /// Feed range swept by the normalized cursor x.
    pub explore_feed: (f32, f32),
    /// Kill range swept by the normalized cursor y.
    pub explore_kill: (f32, f32),
    /// Maximum number of pending commands between two frames.
    pub command_capacity: usize,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drop_radius: 10,
            drag_radius_factor: 0.6,
            explore_feed: (0.01, 0.10),
            explore_kill: (0.03, 0.07),
            command_capacity: 256,
        }
    }
}

impl InteractionConfig {
    /// Radius used while dragging, `floor(drop_radius * drag_radius_factor)`.
    #[inline]
    pub fn drag_radius(&self) -> i32 {
        (self.drop_radius as f32 * self.drag_radius_factor).floor() as i32
    }
}

/// Seeding policy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    /// Full width of the symmetric noise added to seeded B values.
    pub perturbation: f32,
    /// Fraction of all cells drawn as background seed centers.
    pub background_density: f32,
    /// Half-width of each background cluster (2 gives a 5x5 block).
    pub cluster_radius: usize,
    /// Fixed random seed. `None` draws from entropy on every reseed.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            perturbation: 0.1,
            background_density: 0.002,
            cluster_radius: 2,
            random_seed: None,
        }
    }
}

/// Silhouette mask parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Fraction of each grid dimension left empty on either side.
    pub padding: f32,
    /// SVG path data. `None` uses the bundled horse outline.
    #[serde(default)]
    pub silhouette: Option<String>,
    /// How overlapping or nested contours are filled.
    #[serde(default)]
    pub fill_rule: FillRule,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            padding: 0.15,
            silhouette: None,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// Renderer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Angular speed of the highlight glow, in radians per second.
    pub glow_pulse_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glow_pulse_speed: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Grid dimensions for a display surface of the given size.
    pub fn grid_dimensions(&self, surface_width: usize, surface_height: usize) -> (usize, usize) {
        match self.cell_size {
            Some(cell) if cell > 0 => ((surface_width / cell).max(1), (surface_height / cell).max(1)),
            _ => (self.width, self.height),
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.cell_size == Some(0) {
            return Err(ConfigError::InvalidCellSize);
        }
        if !(self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep);
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::InvalidStepsPerFrame);
        }
        if !(self.diffusion_a >= 0.0) || !(self.diffusion_b >= 0.0) {
            return Err(ConfigError::InvalidDiffusion);
        }
        for (name, value) in [("feed", self.feed), ("kill", self.kill)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        if !(0.0..0.5).contains(&self.mask.padding) {
            return Err(ConfigError::InvalidPadding(self.mask.padding));
        }
        if self.interaction.drop_radius < 0 || self.interaction.drag_radius_factor < 0.0 {
            return Err(ConfigError::InvalidDropRadius);
        }
        if self.interaction.command_capacity == 0 {
            return Err(ConfigError::InvalidCommandCapacity);
        }
        let ranges = [
            ("explore_feed", self.interaction.explore_feed),
            ("explore_kill", self.interaction.explore_kill),
        ];
        for (name, (min, max)) in ranges {
            if min > max {
                return Err(ConfigError::InvalidRange { name, min, max });
            }
        }
        if !(0.0..=1.0).contains(&self.seeding.background_density) {
            return Err(ConfigError::InvalidDensity(self.seeding.background_density));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Cell size must be non-zero")]
    InvalidCellSize,
    #[error("Time step must be positive")]
    InvalidTimeStep,
    #[error("Steps per frame must be non-zero")]
    InvalidStepsPerFrame,
    #[error("Diffusion rates must be non-negative")]
    InvalidDiffusion,
    #[error("{name} rate {value} is outside [0, 1]")]
    InvalidRate { name: &'static str, value: f32 },
    #[error("Mask padding {0} must lie in [0, 0.5)")]
    InvalidPadding(f32),
    #[error("Drop radius and drag factor must be non-negative")]
    InvalidDropRadius,
    #[error("Command capacity must be non-zero")]
    InvalidCommandCapacity,
    #[error("{name} min ({min}) > max ({max})")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("Background density {0} is outside [0, 1]")]
    InvalidDensity(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size(), 256 * 256);
        assert_eq!(config.interaction.drag_radius(), 6);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.dt = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeStep)));

        let mut config = SimulationConfig::default();
        config.mask.padding = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPadding(_))));

        let mut config = SimulationConfig::default();
        config.interaction.explore_kill = (0.07, 0.03);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name: "explore_kill", .. })
        ));
    }

    #[test]
    fn test_grid_dimensions_from_cell_size() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.grid_dimensions(1920, 1080), (256, 256));

        config.cell_size = Some(4);
        assert_eq!(config.grid_dimensions(1920, 1080), (480, 270));
        assert_eq!(config.grid_dimensions(2, 2), (1, 1));
    }

    #[test]
    fn test_serialization() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.steps_per_frame, config.steps_per_frame);
        assert_eq!(parsed.interaction.explore_feed, config.interaction.explore_feed);
    }

    #[test]
    fn test_sections_default_when_missing() {
        let json = r#"{
            "width": 64, "height": 32,
            "diffusion_a": 0.2, "diffusion_b": 0.1,
            "dt": 1.0, "steps_per_frame": 4,
            "feed": 0.04, "kill": 0.06
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.seeding.cluster_radius, 2);
        assert!(config.mask.silhouette.is_none());
        assert_eq!(config.mask.fill_rule, FillRule::NonZero);
    }

    #[test]
    fn test_fill_rule_from_json() {
        let json = r#"{ "padding": 0.1, "fill_rule": "even_odd" }"#;
        let mask: MaskConfig = serde_json::from_str(json).unwrap();
        assert_eq!(mask.fill_rule, FillRule::EvenOdd);
        assert!(mask.silhouette.is_none());
    }
}
