use rand::Rng;
use serde::{Deserialize, Serialize};

/// Decoded weights live in [-WEIGHT_LIMIT, WEIGHT_LIMIT].
pub const WEIGHT_LIMIT: f32 = 4.0;

const SOURCE_KIND_BIT: u32 = 31;
const SOURCE_INDEX_SHIFT: u32 = 24;
const SINK_KIND_BIT: u32 = 23;
const SINK_INDEX_SHIFT: u32 = 16;
const INDEX_MASK: u32 = 0x7F;
const WEIGHT_MASK: u32 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Internal,
    Sensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Internal,
    Action,
}

/// One decoded connection descriptor. Indices are the raw 7-bit
/// fields; they are reduced modulo the live catalog only when a brain
/// is expressed, so every bit pattern decodes successfully.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneRecord {
    pub source_kind: SourceKind,
    pub source_index: u32,
    pub sink_kind: SinkKind,
    pub sink_index: u32,
    pub weight: f32,
}

/// A connection gene packed into 32 bits:
/// bit 31 source kind, bits 24-30 source index, bit 23 sink kind,
/// bits 16-22 sink index, bits 0-15 signed fixed-point weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gene(pub u32);

impl Gene {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Gene(rng.random())
    }

    pub fn from_parts(
        source_kind: SourceKind,
        source_index: u32,
        sink_kind: SinkKind,
        sink_index: u32,
        weight: f32,
    ) -> Self {
        let w_scaled = (weight / WEIGHT_LIMIT * i16::MAX as f32)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        let mut packed = (w_scaled as u16) as u32;
        packed |= (source_index & INDEX_MASK) << SOURCE_INDEX_SHIFT;
        packed |= (sink_index & INDEX_MASK) << SINK_INDEX_SHIFT;
        if source_kind == SourceKind::Sensor {
            packed |= 1 << SOURCE_KIND_BIT;
        }
        if sink_kind == SinkKind::Action {
            packed |= 1 << SINK_KIND_BIT;
        }
        Gene(packed)
    }

    /// Total decode: never fails, whatever the bit pattern.
    pub fn unpack(self) -> GeneRecord {
        let bits = self.0;
        let source_kind = if bits >> SOURCE_KIND_BIT & 1 == 1 {
            SourceKind::Sensor
        } else {
            SourceKind::Internal
        };
        let sink_kind = if bits >> SINK_KIND_BIT & 1 == 1 {
            SinkKind::Action
        } else {
            SinkKind::Internal
        };
        let w_raw = (bits & WEIGHT_MASK) as u16 as i16;
        GeneRecord {
            source_kind,
            source_index: bits >> SOURCE_INDEX_SHIFT & INDEX_MASK,
            sink_kind,
            sink_index: bits >> SINK_INDEX_SHIFT & INDEX_MASK,
            weight: w_raw as f32 / i16::MAX as f32 * WEIGHT_LIMIT,
        }
    }

    /// Point mutation: each of the 32 bits flips independently with
    /// probability `rate`. Rate 0 is the identity, rate 1 a bitwise NOT.
    pub fn mutated<R: Rng + ?Sized>(self, rate: f32, rng: &mut R) -> Self {
        if rate <= 0.0 {
            return self;
        }
        if rate >= 1.0 {
            return Gene(!self.0);
        }
        let mut bits = self.0;
        for bit in 0..u32::BITS {
            if rng.random::<f32>() < rate {
                bits ^= 1 << bit;
            }
        }
        Gene(bits)
    }
}
