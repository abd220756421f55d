use serde::Serialize;

use super::Moments;
use crate::system::SystemReading;

/// Bulk wave statistics for one record.
///
/// Zero or negative moments are not guarded: the affected periods come out
/// as `inf` or `NaN` and are reported as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveParameters {
    /// Significant wave height, `4·√m0`.
    pub hm0:     f64,
    /// `√(m-2 / m0)`.
    pub ti:      f64,
    /// Energy period, `m-1 / m0`.
    pub te:      f64,
    /// Mean period, `m0 / m1`.
    pub t1:      f64,
    /// Zero-crossing period, `√(m0 / m2)`.
    pub tz:      f64,
    pub t3:      f64,
    pub t4:      f64,
    pub tref:    f64,
    pub tsea:    f64,
    pub battery: u8,
}

impl WaveParameters {
    pub fn derive(m: &Moments, system: &SystemReading) -> Self {
        let m0 = m.raw(0);
        Self {
            hm0:     4.0 * m0.sqrt(),
            ti:      (m.raw(-2) / m0).sqrt(),
            te:      m.raw(-1) / m0,
            t1:      m0 / m.raw(1),
            tz:      (m0 / m.raw(2)).sqrt(),
            t3:      (m.raw(1) / m.raw(3)).sqrt(),
            t4:      (m.raw(1) / m.raw(4)).sqrt(),
            tref:    system.tref,
            tsea:    system.tsea,
            battery: system.battery,
        }
    }

    /// The seven derived values in output-column order.
    pub fn periods(&self) -> [f64; 7] {
        [self.hm0, self.ti, self.te, self.t1, self.tz, self.t3, self.t4]
    }
}
