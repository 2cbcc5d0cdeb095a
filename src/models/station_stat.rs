use serde::Serialize;

/// Running aggregate of every value observed for one station.
///
/// Values are single precision; the sum is kept in `f64` so that very long
/// runs of additions stay accurate. The average is always derived on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationStat {
    pub min: f32,
    pub max: f32,
    pub sum: f64,
    pub count: u64,
}

impl StationStat {
    /// Seed an aggregate from the first observation of a station.
    pub fn new(value: f32) -> Self {
        Self {
            min: value,
            max: value,
            sum: f64::from(value),
            count: 1,
        }
    }

    pub fn add_value(&mut self, value: f32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += f64::from(value);
        self.count += 1;
    }

    /// Fold another aggregate for the same station into this one.
    pub fn combine(&mut self, other: &StationStat) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn average(&self) -> f64 {
        self.sum / self.count as f64
    }
}
