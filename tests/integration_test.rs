use sdtwave::batch::decode_one;
use sdtwave::output::HIS_HEADER;
use sdtwave::spectral::frequency;
use sdtwave::{
    decode_file, Config, DecodeError, DecodeOptions, RawRecord, RecordPipeline, TimestampPolicy,
};
use std::fs;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

/// A sealed record whose bin `g` has frequency index `g` and density code `codes[g]`.
fn spectrum_record(minute: u8, codes: &[u8; 64]) -> RawRecord {
    let mut rec = RawRecord::zeroed();
    rec.timestamp = [0x07, 0xE8, 0x03, 0x14, 0x06, minute];
    for (g, code) in codes.iter().enumerate() {
        rec.spectral[g * 8]     = g as u8;
        rec.spectral[g * 8 + 3] = *code;
    }
    rec.system[8]  = 0x01; rec.system[9] = 0x90; // Tref 15
    rec.system[12] = 0x04;                       // battery 4
    rec.seal();
    rec
}

fn ramp() -> [u8; 64] {
    let mut codes = [0u8; 64];
    for (g, c) in codes.iter_mut().enumerate() {
        *c = (g as u8) * 4;
    }
    codes
}

/// Trapezoid of `p·fⁿ` over consecutive points, written out longhand.
fn trapezoid(points: &[(f64, f64)], n: i32) -> f64 {
    points
        .windows(2)
        .map(|w| {
            let (f0, p0) = w[0];
            let (f1, p1) = w[1];
            0.5 * (p0 * f0.powi(n) + p1 * f1.powi(n)) * (f1 - f0)
        })
        .sum()
}

#[test]
fn test_stream_with_trailing_bytes() {
    let mut bytes = Vec::new();
    for minute in 0..5 {
        bytes.extend(spectrum_record(minute, &ramp()).encode());
    }
    bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

    let out = RecordPipeline::new(Cursor::new(bytes), DecodeOptions::default())
        .run()
        .unwrap();

    assert_eq!(out.records.len(), 5);
    assert_eq!(out.stats.accepted, 5);
    assert_eq!(out.stats.truncated, 1);
    assert_eq!(out.stats.trailing_bytes, 3);
    assert_eq!(out.records[4].timestamp.to_string(), "2024-03-20 06:04:00");
}

#[test]
fn test_parameters_match_hand_integration() {
    let codes = ramp();
    let rec = spectrum_record(0, &codes);
    let out = RecordPipeline::new(Cursor::new(rec.encode()), DecodeOptions::default())
        .run()
        .unwrap();
    let p = out.records[0].parameters;

    let points: Vec<(f64, f64)> = (0..64u8)
        .map(|g| (frequency(g), 5000.0 * (-0.005 * f64::from(codes[g as usize])).exp()))
        .collect();
    let m = |n| trapezoid(&points, n);

    let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * b.abs().max(1.0);
    assert!(close(p.hm0, 4.0 * m(0).sqrt()));
    assert!(close(p.ti, (m(-2) / m(0)).sqrt()));
    assert!(close(p.te, m(-1) / m(0)));
    assert!(close(p.t1, m(0) / m(1)));
    assert!(close(p.tz, (m(0) / m(2)).sqrt()));
    assert!(close(p.t3, (m(1) / m(3)).sqrt()));
    assert!(close(p.t4, (m(1) / m(4)).sqrt()));
    assert_eq!(p.tref, 15.0);
    assert_eq!(p.battery, 4);
}

#[test]
fn test_corrupt_record_is_skipped() {
    let mut bytes = spectrum_record(1, &ramp()).encode();
    let mut corrupt = spectrum_record(2, &ramp()).encode();
    corrupt[300] ^= 0x01;
    bytes.extend(corrupt);
    bytes.extend(spectrum_record(3, &ramp()).encode());

    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), &bytes).unwrap();

    let out = decode_file(file.path(), &DecodeOptions::default()).unwrap();
    let minutes: Vec<u8> = out.records.iter().map(|r| r.timestamp.minute()).collect();
    assert_eq!(minutes, vec![1, 3]);
    assert_eq!(out.stats.rejected, 1);
}

#[test]
fn test_strict_timestamps_abort_file() {
    let mut bad = spectrum_record(0, &ramp());
    bad.timestamp[4] = 24;
    bad.seal();
    let mut bytes = spectrum_record(1, &ramp()).encode();
    bytes.extend(bad.encode());

    let opts = DecodeOptions { timestamp_policy: TimestampPolicy::Abort, ..Default::default() };
    let err = RecordPipeline::new(Cursor::new(bytes), opts).run().unwrap_err();
    assert!(matches!(err, DecodeError::InvalidTimestamp { hour: 24, .. }));
    assert_eq!(err.to_string(), "Invalid timestamp: 2024-03-20 24:00");
}

#[test]
fn test_decode_one_writes_all_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("0042.SDT");
    let bytes: Vec<u8> = (0..3).flat_map(|m| spectrum_record(m, &ramp()).encode()).collect();
    fs::write(&input, bytes).unwrap();

    let mut config = Config::default();
    config.output.output_dir = dir.path().join("processed");
    let report = decode_one(&input, &config).unwrap();
    assert_eq!(report.stats.accepted, 3);
    assert_eq!(report.outputs.len(), 3);

    let out_dir = dir.path().join("processed");
    let his = fs::read_to_string(out_dir.join("0042.his")).unwrap();
    let his_lines: Vec<&str> = his.lines().collect();
    assert_eq!(his_lines[0], HIS_HEADER);
    assert_eq!(his_lines.len(), 4);
    assert!(his_lines[1].starts_with("2024-03-20 06:00:00, "));
    assert!(his_lines[1].ends_with(", 15.00, -5.00, 4.00"));

    let table = fs::read_to_string(out_dir.join("0042_225.csv")).unwrap();
    assert_eq!(table.lines().count(), 3);
    assert!(table.lines().all(|l| l.split('\t').count() == 19));

    let spt = fs::read_to_string(out_dir.join("0042_SPT.txt")).unwrap();
    let lines: Vec<&str> = spt.lines().collect();
    assert_eq!(lines.len(), 3 * 65);
    for (i, marker) in lines.iter().step_by(65).enumerate() {
        assert_eq!(*marker, format!("Time Stamp= 2024-03-20 06:0{i}:00"));
    }
    assert!(lines[1].starts_with("0.025\t5000.000\t"));
}

#[test]
fn test_config_file_drives_decode() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("custom");

    let mut cfg_file = NamedTempFile::new().unwrap();
    let json = serde_json::json!({
        "decode": { "max_records": 2 },
        "output": { "output_dir": out_dir, "write_spectra": false }
    });
    write!(cfg_file, "{json}").unwrap();
    let config = Config::load(cfg_file.path()).unwrap();
    config.validate().unwrap();

    let input = dir.path().join("buoy.SDT");
    let bytes: Vec<u8> = (0..4).flat_map(|m| spectrum_record(m, &ramp()).encode()).collect();
    fs::write(&input, bytes).unwrap();

    let report = decode_one(&input, &config).unwrap();
    assert_eq!(report.stats.accepted, 2);
    assert_eq!(report.outputs, vec![out_dir.join("buoy.his"), out_dir.join("buoy_225.csv")]);
    assert!(!out_dir.join("buoy_SPT.txt").exists());
}
