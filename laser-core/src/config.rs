use serde::{Deserialize, Serialize};

/// Converts millimetres to drawing units (96 DPI, the SVG user-unit
/// convention: 1in = 25.4mm = 96 units).
pub const MM_TO_UNITS: f64 = 3.779_527_559_1;

/// Ordering strategy applied within each colour bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    Nearest,
    TwoOpt,
    Zoning,
}

impl Default for OptimizationStrategy {
    fn default() -> Self {
        OptimizationStrategy::Zoning
    }
}

/// Axis along which the zoning strategy buckets atoms into strips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripDirection {
    Rows,
    Columns,
}

impl Default for StripDirection {
    fn default() -> Self {
        StripDirection::Columns
    }
}

fn default_tolerance() -> f64 {
    0.15
}
fn default_true() -> bool {
    true
}
fn default_max_iterations() -> u32 {
    50
}
fn default_strip_size_mm() -> f64 {
    10.0
}
fn default_laser_speed() -> f64 {
    25.0
}
fn default_idle_speed() -> f64 {
    2800.0
}
fn default_partial_overlap_ratio() -> f64 {
    0.7
}

/// The pipeline's configuration record. Every field has a documented
/// default, so a config file (or a catalogue's `last_used` block) that
/// omits a field behaves exactly as if that field had been set explicitly
/// to its default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default)]
    pub palette: Vec<String>,

    #[serde(default = "default_true")]
    pub delete_unmanaged_colours: bool,

    #[serde(default = "default_true")]
    pub save_as_cutting: bool,

    #[serde(default = "default_true")]
    pub optimization_enabled: bool,

    #[serde(default)]
    pub optimization_strategy: OptimizationStrategy,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    #[serde(default)]
    pub strip_direction: StripDirection,

    #[serde(default = "default_strip_size_mm")]
    pub strip_size_mm: f64,

    #[serde(default = "default_laser_speed")]
    pub laser_speed_mm_s: f64,

    #[serde(default = "default_idle_speed")]
    pub idle_speed_mm_s: f64,

    /// Luminance tolerance for grey detection (`|r-g|+|g-b|+|r-b| <=
    /// grey_tolerance`). Zero reproduces exact `r == g == b` detection.
    #[serde(default)]
    pub grey_tolerance: u16,

    /// Minimum fraction of a shorter curve's length that must lie on a
    /// longer curve before partial containment removes it, on top of the
    /// Hausdorff-based similarity test.
    #[serde(default = "default_partial_overlap_ratio")]
    pub partial_overlap_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tolerance: default_tolerance(),
            palette: Vec::new(),
            delete_unmanaged_colours: true,
            save_as_cutting: true,
            optimization_enabled: true,
            optimization_strategy: OptimizationStrategy::default(),
            max_iterations: default_max_iterations(),
            strip_direction: StripDirection::default(),
            strip_size_mm: default_strip_size_mm(),
            laser_speed_mm_s: default_laser_speed(),
            idle_speed_mm_s: default_idle_speed(),
            grey_tolerance: 0,
            partial_overlap_ratio: default_partial_overlap_ratio(),
        }
    }
}

impl Config {
    /// `strip_size_mm` converted to drawing units.
    pub fn strip_size_units(&self) -> f64 {
        self.strip_size_mm * MM_TO_UNITS
    }

    pub fn bbox_margin(&self) -> f64 {
        5.0 * self.tolerance
    }
}

#[test]
fn defaults_match_the_documented_table() {
    let c = Config::default();
    assert_eq!(c.tolerance, 0.15);
    assert!(c.delete_unmanaged_colours);
    assert!(c.save_as_cutting);
    assert!(c.optimization_enabled);
    assert_eq!(c.optimization_strategy, OptimizationStrategy::Zoning);
    assert_eq!(c.max_iterations, 50);
    assert_eq!(c.strip_direction, StripDirection::Columns);
    assert_eq!(c.strip_size_mm, 10.0);
    assert_eq!(c.laser_speed_mm_s, 25.0);
    assert_eq!(c.idle_speed_mm_s, 2800.0);
    assert_eq!(c.grey_tolerance, 0);
    assert_eq!(c.partial_overlap_ratio, 0.7);
}

#[test]
fn missing_fields_deserialize_to_defaults() {
    let c: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(c.tolerance, Config::default().tolerance);
}
