use crate::gene::{Gene, SinkKind, SourceKind, WEIGHT_LIMIT};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed-length ordered gene sequence. Identity is the bit sequence;
/// immutable once handed to an individual for a generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Uniform random bits; used only for generation 0 and the
    /// extinction fallback.
    pub fn random<R: Rng + ?Sized>(length: u32, rng: &mut R) -> Self {
        let genes = (0..length).map(|_| Gene::random(rng)).collect();
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Single-point crossover: the child takes `a`'s genes before the
    /// split and `b`'s genes from it. Every child gene is bit-identical
    /// to the corresponding parent gene. Mismatched parent lengths mean
    /// population setup broke its fixed-length invariant.
    pub fn crossover<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
        assert_eq!(
            a.len(),
            b.len(),
            "crossover parents must share the run's fixed genome length",
        );
        let split = rng.random_range(0..=a.len());
        let genes = a.genes[..split]
            .iter()
            .chain(&b.genes[split..])
            .copied()
            .collect();
        Genome { genes }
    }

    /// Per-bit point mutation applied to every gene.
    pub fn mutated<R: Rng + ?Sized>(&self, rate: f32, rng: &mut R) -> Genome {
        let genes = self
            .genes
            .iter()
            .map(|gene| gene.mutated(rate, rng))
            .collect();
        Genome { genes }
    }

    /// Deterministic genome -> RGB mapping built from continuous bit
    /// features rather than a raw hash, so genomes that differ by a few
    /// bits land on nearby colors.
    pub fn color(&self) -> [u8; 3] {
        let n = self.genes.len();
        if n == 0 {
            return [128, 128, 128];
        }
        let records: Vec<_> = self.genes.iter().map(|gene| gene.unpack()).collect();
        let inv_n = 1.0 / n as f32;

        let mean_weight = records.iter().map(|r| r.weight).sum::<f32>() * inv_n;
        let f_weight = (mean_weight + WEIGHT_LIMIT) / (2.0 * WEIGHT_LIMIT);
        let f_src = records
            .iter()
            .filter(|r| r.source_kind == SourceKind::Sensor)
            .count() as f32
            * inv_n;
        let f_snk = records
            .iter()
            .filter(|r| r.sink_kind == SinkKind::Action)
            .count() as f32
            * inv_n;
        let f_sid = records.iter().map(|r| r.source_index as f32).sum::<f32>() * inv_n / 127.0;
        let f_did = records.iter().map(|r| r.sink_index as f32).sum::<f32>() * inv_n / 127.0;
        let variance = records
            .iter()
            .map(|r| (r.weight - mean_weight).powi(2))
            .sum::<f32>()
            * inv_n;
        let f_var = (variance / (WEIGHT_LIMIT * WEIGHT_LIMIT)).min(1.0);

        let hue = (f_weight * 0.6 + f_src * 0.5 + f_sid * 0.7 + f_var * 0.4).fract();
        let sat = (0.6 + f_snk * 0.25 + f_var * 0.15).min(1.0);
        let val = (0.55 + f_did * 0.3 + f_src * 0.15).min(1.0);
        hsv_to_rgb(hue, sat, val)
    }
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor() as u32 % 6;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ]
}
