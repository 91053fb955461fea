use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use head_motion_viewer::data::model::{Genre, Sample};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Sway amplitude (mm) and frequency (Hz) of each condition.
fn motion_profile(genre: &Genre) -> (f64, f64) {
    match genre {
        Genre::Silence => (1.5, 0.2),
        Genre::Meditation => (1.0, 0.1),
        Genre::Salsa => (6.0, 1.6),
        Genre::Edm => (9.0, 2.1),
        Genre::Other(_) => (3.0, 0.5),
    }
}

/// Where a generated run sits and how it is sampled.
struct RunSpec<'a> {
    group: &'a str,
    marker: &'a str,
    genre: &'a Genre,
    block: usize,
    start_s: f64,
    n: usize,
    rate_hz: f64,
}

/// One run as a random walk around a slow sway, sampled at `rate_hz`.
fn generate_run(spec: &RunSpec, rng: &mut SimpleRng) -> Vec<Sample> {
    let (amp, freq) = motion_profile(spec.genre);
    let phase = rng.next_f64() * std::f64::consts::TAU;
    let mut drift = [rng.gauss(0.0, 5.0), rng.gauss(0.0, 5.0), rng.gauss(0.0, 5.0)];

    (0..spec.n)
        .map(|i| {
            let t = i as f64 / spec.rate_hz;
            for d in &mut drift {
                *d += rng.gauss(0.0, 0.05);
            }
            let w = std::f64::consts::TAU * freq * t + phase;
            Sample {
                group: spec.group.to_string(),
                marker: spec.marker.to_string(),
                block: spec.block.to_string(),
                genre: spec.genre.clone(),
                time_s: spec.start_s + t,
                x_mm: drift[0] + amp * w.sin(),
                y_mm: drift[1] + 0.5 * amp * (2.0 * w).sin(),
                z_mm: drift[2] + 0.3 * amp * w.cos(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, samples: &[Sample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for s in samples {
        writer.serialize(s).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, samples: &[Sample]) -> Result<()> {
    let text = |f: fn(&Sample) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(samples.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&Sample) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(samples.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("group", DataType::Utf8, false),
        Field::new("marker", DataType::Utf8, false),
        Field::new("block", DataType::Utf8, false),
        Field::new("genre", DataType::Utf8, false),
        Field::new("time_s", DataType::Float64, false),
        Field::new("x_mm", DataType::Float64, false),
        Field::new("y_mm", DataType::Float64, false),
        Field::new("z_mm", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|s| s.group.as_str()),
            text(|s| s.marker.as_str()),
            text(|s| s.block.as_str()),
            text(|s| s.genre.as_str()),
            number(|s| s.time_s),
            number(|s| s.x_mm),
            number(|s| s.y_mm),
            number(|s| s.z_mm),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).context("creating data directory")?;

    let groups = ["NM0001", "NM0004", "NM0011"];
    let markers = ["P1", "P2", "P3"];
    let rate_hz = 50.0;
    let base_len = 1000;

    let mut all: Vec<Sample> = Vec::new();

    for group in groups {
        let mut rows: Vec<Sample> = Vec::new();
        for marker in markers {
            let mut clock = 0.0;
            for genre in Genre::KNOWN {
                let blocks = if genre == Genre::Silence { 2 } else { 3 };
                for block in 1..=blocks {
                    // Runs differ slightly in length, like real trials do.
                    let n = base_len - (rng.next_u64() % 40) as usize;
                    let spec = RunSpec {
                        group,
                        marker,
                        genre: &genre,
                        block,
                        start_s: clock,
                        n,
                        rate_hz,
                    };
                    let run = generate_run(&spec, &mut rng);
                    clock += n as f64 / rate_hz + 5.0;
                    rows.extend(run);
                }
            }
        }

        let path = out_dir.join(format!("{group}-cleaned.csv"));
        write_csv(&path, &rows)?;
        println!("Wrote {} samples to {}", rows.len(), path.display());
        all.extend(rows);
    }

    let path = out_dir.join("sample_motion.parquet");
    write_parquet(&path, &all)?;
    println!("Wrote {} samples to {}", all.len(), path.display());
    Ok(())
}
