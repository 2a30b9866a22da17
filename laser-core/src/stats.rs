use serde::Serialize;

/// Statistics emitted by the ordering engine at the end of a run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    pub num_paths: usize,
    pub initial_idle: f64,
    pub final_idle: f64,
    pub total_cut_length: f64,
    pub cut_time: f64,
    pub idle_time: f64,
    pub estimated_time_s: f64,
}

impl Stats {
    pub fn improvement_percent(&self) -> f64 {
        if self.initial_idle <= 0.0 {
            0.0
        } else {
            100.0 * (self.initial_idle - self.final_idle) / self.initial_idle
        }
    }

    pub fn finalize(&mut self, laser_speed_mm_s: f64, idle_speed_mm_s: f64, mm_per_unit: f64) {
        self.cut_time = if laser_speed_mm_s > 0.0 {
            (self.total_cut_length * mm_per_unit) / laser_speed_mm_s
        } else {
            0.0
        };
        self.idle_time = if idle_speed_mm_s > 0.0 {
            (self.final_idle * mm_per_unit) / idle_speed_mm_s
        } else {
            0.0
        };
        self.estimated_time_s = self.cut_time + self.idle_time;
    }
}

#[test]
fn improvement_percent_is_zero_for_empty_drawings() {
    let stats = Stats::default();
    assert_eq!(stats.improvement_percent(), 0.0);
}

#[test]
fn improvement_percent_reflects_idle_reduction() {
    let mut stats = Stats { initial_idle: 100.0, final_idle: 60.0, ..Stats::default() };
    assert_eq!(stats.improvement_percent(), 40.0);
    stats.finalize(25.0, 2800.0, 1.0 / crate::config::MM_TO_UNITS);
    assert!(stats.idle_time > 0.0);
}
