use clap::{Parser, Subcommand};
use sdtwave::batch::decode_files;
use sdtwave::logging::{init_logging, Verbosity};
use sdtwave::options::{Config, DecodeOptions, TimestampPolicy};
use sdtwave::pipeline::decode_file;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sdtwave", version, about = "Wave buoy SDT record decoder")]
struct Cli {
    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode SDT files into .his, _225.csv and _SPT.txt outputs
    Decode {
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,
        /// Output directory (default: ./processed, or the config file's)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        no_his: bool,
        #[arg(long)]
        no_table: bool,
        #[arg(long)]
        no_spectra: bool,
        /// Abort a file on the first calendar-invalid timestamp
        #[arg(long)]
        strict_timestamps: bool,
        /// Stop each file after this many records
        #[arg(long)]
        max_records: Option<usize>,
    },
    /// Count good, rejected and truncated records without writing anything
    Scan {
        input: PathBuf,
    },
    /// Print decoded records as JSON
    Dump {
        input: PathBuf,
        #[arg(short, long)]
        pretty: bool,
        #[arg(long)]
        max_records: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    match cli.command {

        // ── Decode ───────────────────────────────────────────────────────────
        Commands::Decode {
            input, output, config, no_his, no_table, no_spectra,
            strict_timestamps, max_records,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load(path)?,
                None       => Config::default(),
            };
            if let Some(dir) = output { cfg.output.output_dir = dir; }
            if no_his      { cfg.output.write_his = false; }
            if no_table    { cfg.output.write_table = false; }
            if no_spectra  { cfg.output.write_spectra = false; }
            if strict_timestamps { cfg.decode.timestamp_policy = TimestampPolicy::Abort; }
            if max_records.is_some() { cfg.decode.max_records = max_records; }
            cfg.validate()?;

            let entries = decode_files(&input, &cfg);
            let mut failed = 0usize;
            for entry in &entries {
                match &entry.result {
                    Ok(report) => {
                        println!("  decoded {}  ({})", entry.input.display(), report.stats.summary());
                        for path in &report.outputs {
                            println!("    -> {}", path.display());
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("  failed  {}: {e}", entry.input.display());
                    }
                }
            }
            if failed > 0 {
                return Err(format!("{failed} of {} file(s) failed", entries.len()).into());
            }
        }

        // ── Scan ─────────────────────────────────────────────────────────────
        Commands::Scan { input } => {
            let out   = decode_file(&input, &DecodeOptions::default())?;
            let stats = out.stats;
            println!("── SDT scan ─────────────────────────────────────────────");
            println!("  Path                {}", input.display());
            println!("  Records seen        {}", stats.seen);
            println!("  Accepted            {}", stats.accepted);
            println!("  Checksum rejects    {}", stats.rejected);
            println!("  Invalid timestamps  {}", stats.invalid_timestamps);
            println!("  Truncated tail      {} ({} B)", stats.truncated, stats.trailing_bytes);
            if let (Some(first), Some(last)) = (out.records.first(), out.records.last()) {
                println!("  First record        {}", first.timestamp);
                println!("  Last record         {}", last.timestamp);
            }
        }

        // ── Dump ─────────────────────────────────────────────────────────────
        Commands::Dump { input, pretty, max_records } => {
            let opts = DecodeOptions { max_records, ..Default::default() };
            let out  = decode_file(&input, &opts)?;
            let json = if pretty {
                serde_json::to_string_pretty(&out)?
            } else {
                serde_json::to_string(&out)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
