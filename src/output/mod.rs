//! Text sinks consumed by the downstream packagers.
//!
//! | Sink | File | Row |
//! |------|------|-----|
//! | history | `<base>.his` | `ts, Hm0, TI, TE, T1, Tz, T3, T4, Tref, Tsea, Bat` |
//! | table | `<base>_225.csv` | `ts` + the seven parameters + system scalars from Tsea on, tab-separated |
//! | spectra | `<base>_SPT.txt` | `Time Stamp= ts`, then 64 rows of 11 values |
//!
//! The spectra layout (marker line followed by exactly 64 rows, no column
//! header) is what the NetCDF packager parses.  Non-finite values are
//! written as `nan`, `inf` and `-inf`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::options::OutputOptions;
use crate::pipeline::DecodedRecord;

pub const HIS_HEADER: &str = "Timestamp, Hm0, TI, TE, T1, Tz, T3, T4, Tref, Tsea, Bat";

/// Spectral table column order.
pub const SPECTRUM_COLUMNS: [&str; 11] = [
    "Frequency", "SmaxXpsd", "dir_angle", "spr", "skw",
    "kurt", "m2", "n2", "K", "Lat", "Lon",
];

// ── Formatting ────────────────────────────────────────────────────────────────

pub fn fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        "nan".to_owned()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_owned() } else { "-inf".to_owned() }
    } else {
        format!("{v:.decimals$}")
    }
}

fn join_fixed<I: IntoIterator<Item = f64>>(values: I, decimals: usize, sep: &str) -> String {
    values
        .into_iter()
        .map(|v| fixed(v, decimals))
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn his_row(rec: &DecodedRecord) -> String {
    let p = &rec.parameters;
    let values = p.periods().into_iter().chain([p.tref, p.tsea, f64::from(p.battery)]);
    format!("{}, {}", rec.timestamp, join_fixed(values, 2, ", "))
}

pub fn table_row(rec: &DecodedRecord) -> String {
    let s = &rec.system;
    let values = rec.parameters.periods().into_iter().chain([
        s.tsea,
        f64::from(s.battery),
        f64::from(s.ble_voltage),
        s.accel_v,
        s.accel_x,
        s.accel_y,
        f64::from(s.gps_fix),
        s.latitude,
        s.longitude,
        s.orientation_deg,
        s.inclination_deg,
    ]);
    format!("{}\t{}", rec.timestamp, join_fixed(values, 2, "\t"))
}

pub fn write_spectrum<W: Write>(mut w: W, rec: &DecodedRecord) -> io::Result<()> {
    writeln!(w, "Time Stamp= {}", rec.timestamp)?;
    for b in &rec.bins {
        let row = [
            b.frequency_hz, b.power, b.direction_deg, b.spread, b.skewness,
            b.kurtosis, b.m2, b.n2, b.depth_factor_k, b.latitude, b.longitude,
        ];
        writeln!(w, "{}", join_fixed(row, 3, "\t"))?;
    }
    Ok(())
}

// ── OutputSet ─────────────────────────────────────────────────────────────────

/// The enabled sinks for one input file.
pub struct OutputSet {
    his:     Option<(PathBuf, BufWriter<File>)>,
    table:   Option<(PathBuf, BufWriter<File>)>,
    spectra: Option<(PathBuf, BufWriter<File>)>,
}

impl OutputSet {
    /// Create (truncating) the sink files for input stem `base` in
    /// `opts.output_dir`, creating the directory if necessary.
    pub fn create(base: &str, opts: &OutputOptions) -> io::Result<Self> {
        let dir = &opts.output_dir;
        fs::create_dir_all(dir)?;

        let open = |enabled: bool, name: String| -> io::Result<Option<(PathBuf, BufWriter<File>)>> {
            if !enabled { return Ok(None); }
            let path = dir.join(name);
            let file = BufWriter::new(File::create(&path)?);
            Ok(Some((path, file)))
        };

        let mut set = Self {
            his:     open(opts.write_his, format!("{base}.his"))?,
            table:   open(opts.write_table, format!("{base}_225.csv"))?,
            spectra: open(opts.write_spectra, format!("{base}_SPT.txt"))?,
        };
        if let Some((_, w)) = &mut set.his {
            writeln!(w, "{HIS_HEADER}")?;
        }
        Ok(set)
    }

    pub fn write(&mut self, rec: &DecodedRecord) -> io::Result<()> {
        if let Some((_, w)) = &mut self.his {
            writeln!(w, "{}", his_row(rec))?;
        }
        if let Some((_, w)) = &mut self.table {
            writeln!(w, "{}", table_row(rec))?;
        }
        if let Some((_, w)) = &mut self.spectra {
            write_spectrum(w, rec)?;
        }
        Ok(())
    }

    /// Flush every sink and return the paths written.
    pub fn finish(self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for (path, mut w) in [self.his, self.table, self.spectra].into_iter().flatten() {
            w.flush()?;
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Input file stem used to name the sinks (`buoy.SDT` → `buoy`).
pub fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_owned())
}
