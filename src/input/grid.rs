use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::input::InputError;
use crate::input::reader::open_maybe_gz;
use crate::model::RunMeta;

pub const GRID_HEADER: [&str; 5] = ["run_id", "fraction", "replicate", "seed", "is_reference"];

const DEFAULT_FRACTIONS: [f64; 8] = [0.01, 0.02, 0.05, 0.10, 0.20, 0.35, 0.50, 0.75];
const DEFAULT_REPLICATES: u32 = 3;

/// Loads the tab-separated run grid, keeping file order.
pub fn load_grid(path: &Path) -> Result<Vec<RunMeta>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "grid file not found: {}",
            path.display()
        )));
    }
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse("grid file is empty".to_string()));
    }
    let header: Vec<String> = buf
        .trim_end()
        .split('\t')
        .map(|s| s.trim().to_ascii_lowercase())
        .collect();
    let col = |name: &str| header.iter().position(|h| h == name);
    let run_col = col("run_id").ok_or_else(|| missing_column("run_id"))?;
    let fraction_col = col("fraction").ok_or_else(|| missing_column("fraction"))?;
    let replicate_col = col("replicate").ok_or_else(|| missing_column("replicate"))?;
    let reference_col = col("is_reference").ok_or_else(|| missing_column("is_reference"))?;
    let seed_col = col("seed");

    let mut runs = Vec::new();
    let mut seen = HashSet::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let field = |idx: usize| fields.get(idx).copied().unwrap_or("");

        let run_id = field(run_col);
        if run_id.is_empty() {
            return Err(InputError::Parse(format!("line {line_no}: empty run_id")));
        }
        let is_reference = parse_flag(field(reference_col)).ok_or_else(|| {
            InputError::Parse(format!(
                "line {line_no}: invalid is_reference {:?}",
                field(reference_col)
            ))
        })?;
        let fraction = match field(fraction_col).parse::<f64>() {
            Ok(v) if v > 0.0 && v <= 1.0 => v,
            // Reference rows may carry a sentinel instead of a fraction.
            _ if is_reference => 1.0,
            Ok(v) => {
                return Err(InputError::Parse(format!(
                    "line {line_no}: fraction {v} outside (0, 1]"
                )));
            }
            Err(_) => {
                return Err(InputError::Parse(format!(
                    "line {line_no}: invalid fraction {:?}",
                    field(fraction_col)
                )));
            }
        };
        let replicate: u32 = field(replicate_col).parse().map_err(|_| {
            InputError::Parse(format!(
                "line {line_no}: invalid replicate {:?}",
                field(replicate_col)
            ))
        })?;
        let seed = match seed_col.map(field) {
            Some(s) if !s.is_empty() => Some(s.parse::<u64>().map_err(|_| {
                InputError::Parse(format!("line {line_no}: invalid seed {s:?}"))
            })?),
            _ => None,
        };

        if !seen.insert(run_id.to_string()) {
            tracing::warn!(line = line_no, run_id, "duplicate run_id in grid; keeping first");
            continue;
        }
        runs.push(RunMeta {
            run_id: run_id.to_string(),
            fraction,
            replicate,
            seed,
            is_reference,
        });
    }

    Ok(runs)
}

/// Default balanced grid: one full-depth reference plus three replicates per fraction.
pub fn default_grid() -> Vec<RunMeta> {
    let mut runs = vec![RunMeta {
        run_id: "ref_full".to_string(),
        fraction: 1.0,
        replicate: 0,
        seed: Some(424_242),
        is_reference: true,
    }];
    for frac in DEFAULT_FRACTIONS {
        let frac_key = (frac * 10_000.0).round() as u64;
        for rep in 1..=DEFAULT_REPLICATES {
            runs.push(RunMeta {
                run_id: run_id_for_fraction(frac, rep),
                fraction: frac,
                replicate: rep,
                seed: Some(100_000 + frac_key * 10 + rep as u64),
                is_reference: false,
            });
        }
    }
    runs
}

pub fn run_id_for_fraction(fraction: f64, replicate: u32) -> String {
    format!("f{:03}_r{}", (fraction * 100.0).round() as u64, replicate)
}

pub fn write_default_grid(path: &Path) -> Result<usize, InputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let runs = default_grid();
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{}", GRID_HEADER.join("\t"))?;
    for run in &runs {
        let fraction = if run.is_reference {
            format!("{:.1}", run.fraction)
        } else {
            format!("{:.2}", run.fraction)
        };
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            run.run_id,
            fraction,
            run.replicate,
            run.seed.unwrap_or_default(),
            if run.is_reference { 1 } else { 0 }
        )?;
    }
    w.flush()?;
    Ok(runs.len())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

fn missing_column(name: &str) -> InputError {
    InputError::Parse(format!("grid header lacks column {name:?}"))
}
