use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Deterministic measurement noise (splitmix64 + Box-Muller).
struct Noise {
    state: u64,
}

impl Noise {
    fn new(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = Noise::new(42);
    let output_path = "sample_data.dat";

    let file = File::create(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# synthetic sensor log, 0.1 s steps")?;
    writeln!(out, "time voltage current temperature pressure")?;

    let n_rows = 500;
    for i in 0..n_rows {
        let t = i as f64 * 0.1;
        let voltage = 5.0 * (0.4 * t).sin() + rng.gauss(0.0, 0.05);
        let current = 0.8 * (0.4 * t).cos() * (-0.02 * t).exp() + rng.gauss(0.0, 0.01);
        let temperature = 20.0 + gaussian(t, 25.0, 6.0, 45.0) + rng.gauss(0.0, 0.2);
        // Spans several decades; useful with a log axis.
        let pressure = 1013.0 * (-0.15 * t).exp();
        writeln!(
            out,
            "{t:.1} {voltage:.4} {current:.5} {temperature:.3} {pressure:.6e}"
        )?;
    }
    out.flush().context("flushing sample file")?;

    println!("Wrote {n_rows} rows x 5 columns to {output_path}");
    Ok(())
}
