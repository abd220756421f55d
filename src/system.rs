//! System block decoder for the scalar instrument telemetry.
//!
//! All 16-bit words are big-endian (`hi·256 + lo`).  The masks, scales and
//! reflection points below are firmware constants, not tunables.

use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;

use crate::record::SYSTEM_SIZE;

/// Scalars decoded from one 32-byte system block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemReading {
    /// Onboard significant wave height estimate, metres.
    pub hm0:             f64,
    /// Onboard zero-crossing period estimate, seconds.  Infinite when the
    /// encoded divisor is zero.
    pub tz:              f64,
    /// Spectral scale factor applied to every bin's normalised density.
    pub smax:            f64,
    pub tref:            f64,
    pub tsea:            f64,
    pub battery:         u8,
    pub ble_voltage:     u8,
    pub accel_v:         f64,
    pub accel_x:         f64,
    pub accel_y:         f64,
    pub gps_fix:         u8,
    pub latitude:        f64,
    pub longitude:       f64,
    pub orientation_deg: f64,
    pub inclination_deg: f64,
}

/// The three system values the spectral decoder depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralContext {
    pub smax:      f64,
    pub latitude:  f64,
    pub longitude: f64,
}

impl SystemReading {
    pub fn decode(b: &[u8; SYSTEM_SIZE]) -> Self {
        let word = |i: usize| BigEndian::read_u16(&b[i..i + 2]);

        let gps_fix     = (b[1] / 16) % 8;
        let hm0         = f64::from(word(2) % 4096) / 100.0;
        let tz          = 400.0 / f64::from(word(4) % 256);
        let smax        = (-0.005 * f64::from(word(6) % 4096)).exp() * 5000.0;
        let tref        = f64::from(word(8) % 1024) / 20.0 - 5.0;
        let tsea        = f64::from(word(10) % 1024) / 20.0 - 5.0;
        let battery     = b[12] % 8;
        let ble_voltage = ((word(12) / 16) % 256) as u8;
        let accel_v     = acceleration(word(14));
        let accel_x     = acceleration(word(16));
        let accel_y     = acceleration(word(18));
        let latitude    = coordinate(nibble_merge(b[20], b[21], b[22], b[23]), 90.0);
        let longitude   = coordinate(nibble_merge(b[24], b[25], b[26], b[27]), 180.0);
        let orientation_deg = f64::from(word(28) % 4096) * 360.0 / 256.0;
        let inclination_deg =
            (f64::from(b[31]) + f64::from(b[30] % 16) / 16.0) * 360.0 / 256.0 / 2.0 - 90.0;

        Self {
            hm0,
            tz,
            smax,
            tref,
            tsea,
            battery,
            ble_voltage,
            accel_v,
            accel_x,
            accel_y,
            gps_fix,
            latitude,
            longitude,
            orientation_deg,
            inclination_deg,
        }
    }

    pub fn spectral_context(&self) -> SpectralContext {
        SpectralContext {
            smax:      self.smax,
            latitude:  self.latitude,
            longitude: self.longitude,
        }
    }
}

/// `c - v` above the reflection point `c`, otherwise `v`.
fn reflect(v: f64, c: f64) -> f64 {
    if v > c { c - v } else { v }
}

fn acceleration(w: u16) -> f64 {
    reflect(f64::from(w % 4096), 2048.0) / 800.0
}

/// 24-bit value from the low nibble of `a`, `b`, the low nibble of `c`, `d`.
fn nibble_merge(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (((u32::from(a % 16) * 256 + u32::from(b)) * 16 + u32::from(c % 16)) * 256) + u32::from(d)
}

fn coordinate(v: u32, scale: f64) -> f64 {
    let x = f64::from(v % (1 << 24)) / f64::from(1u32 << 23) * scale;
    reflect(x, scale)
}
