use chrono::{Duration, NaiveDate};

/// Warm-up phase tag; excluded by the duration view.
const WARMUP_TERM: i64 = 10;
const MEASURED_TERM: i64 = 40;

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Call durations in µs: lognormal-ish body, rare slow outliers, a slow drift.
fn write_durations(path: &str, rng: &mut SimpleRng) -> csv::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["JOB_NUMBER", "TERM", "DURATION"])?;

    let warmup = 200;
    let measured = 5000;
    let mut rows = 0;

    // Jobs complete out of order, so write them in small shuffled batches.
    let mut batch: Vec<(i64, i64, String)> = Vec::new();
    for job in 0..(warmup + measured) {
        let term = if job < warmup { WARMUP_TERM } else { MEASURED_TERM };
        let drift = 1.0 + job as f64 / 20_000.0;
        let mut micros = rng.gauss(8.0, 0.15).exp() * drift;
        if rng.chance(0.01) {
            micros *= 5.0 + 10.0 * rng.next_f64();
        }
        let duration = if rng.chance(0.002) {
            "NaN".to_string()
        } else {
            format!("{micros:.0}")
        };
        batch.push((job as i64, term, duration));

        if batch.len() == 8 {
            flush_batch(&mut writer, &mut batch, rng)?;
            rows += 8;
        }
    }
    rows += batch.len();
    flush_batch(&mut writer, &mut batch, rng)?;
    writer.flush()?;
    Ok(rows)
}

fn flush_batch(
    writer: &mut csv::Writer<std::fs::File>,
    batch: &mut Vec<(i64, i64, String)>,
    rng: &mut SimpleRng,
) -> csv::Result<()> {
    while !batch.is_empty() {
        let i = (rng.next_u64() % batch.len() as u64) as usize;
        let (job, term, duration) = batch.swap_remove(i);
        writer.write_record([job.to_string(), term.to_string(), duration])?;
    }
    Ok(())
}

/// One sample per second: memory creeping up, CPU noisy around a plateau.
fn write_mem_cpu(path: &str, rng: &mut SimpleRng) -> csv::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["DATETIME", "MEM", "CPU"])?;

    let start = NaiveDate::from_ymd_opt(2023, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid start time");
    let samples = 600;

    for i in 0..samples {
        let t = start + Duration::seconds(i);
        let mem = 5.0 + 20.0 * (i as f64 / samples as f64) + rng.gauss(0.0, 0.3);
        let cpu = (350.0 + rng.gauss(0.0, 40.0)).max(0.0);
        let mem_text = if rng.chance(0.01) {
            "n/a".to_string()
        } else {
            format!("{mem:.1}")
        };
        writer.write_record([
            t.format("%Y-%m-%d %H:%M:%S").to_string(),
            mem_text,
            format!("{cpu:.1}"),
        ])?;
    }
    writer.flush()?;
    Ok(samples as usize)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let durations_path = "durations.csv";
    let calls = write_durations(durations_path, &mut rng).expect("Failed to write durations log");
    println!("Wrote {calls} calls to {durations_path}");

    let mem_cpu_path = "mem_cpu.csv";
    let samples = write_mem_cpu(mem_cpu_path, &mut rng).expect("Failed to write mem/cpu log");
    println!("Wrote {samples} samples to {mem_cpu_path}");
}
