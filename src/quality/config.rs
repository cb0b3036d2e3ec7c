/// Tunables for the focus-quality score.
///
/// The density bands and decay factors are carried over from the shipped
/// product unchanged; they are named here so product review can revisit them
/// in one place.
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Dimension weights; must sum to 1.0.
    pub weight_time_efficiency: f64,
    pub weight_focus_stability: f64,
    pub weight_continuous_focus: f64,
    pub weight_completion: f64,

    /// Multipliers folding different interruption kinds into one count.
    pub exit_fullscreen_weight: f64,
    pub tab_switch_weight: f64,
}

impl QualityConfig {
    pub fn weight_sum(&self) -> f64 {
        self.weight_time_efficiency
            + self.weight_focus_stability
            + self.weight_continuous_focus
            + self.weight_completion
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            weight_time_efficiency: 0.35,
            weight_focus_stability: 0.30,
            weight_continuous_focus: 0.25,
            weight_completion: 0.10,
            exit_fullscreen_weight: 1.5,
            tab_switch_weight: 0.5,
        }
    }
}

/// Interruption-density bands (per hour) and the decay factor applied above
/// each; densities past the last band decay at `DENSITY_DECAY_MAX`.
pub const DENSITY_BANDS: [(f64, f64); 3] = [(5.0, 1.0), (10.0, 1.5), (20.0, 2.0)];
pub const DENSITY_DECAY_MAX: f64 = 3.0;
