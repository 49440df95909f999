//! Memorable verification codes.
//!
//! Codes are built from a few short random numbers glued together, which
//! makes them easy to read off a WhatsApp message and type back in.

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::CODE_LENGTH;

/// Families a code can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePattern {
    /// Three numbers in `11..=99`, e.g. `224466`
    HighPairs,
    /// Two numbers in `111..=999`, e.g. `222888`
    Triples,
    /// Two repdigits `d*111`, e.g. `111222`
    RepeatedDigits,
    /// Three numbers in `10..=99`, e.g. `121314`
    Pairs,
}

impl CodePattern {
    /// Every pattern, in selection order
    pub const ALL: [CodePattern; 4] = [
        CodePattern::HighPairs,
        CodePattern::Triples,
        CodePattern::RepeatedDigits,
        CodePattern::Pairs,
    ];

    /// Draw one code of this family from `rng`
    pub fn render<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            CodePattern::HighPairs => format!(
                "{}{}{}",
                rng.gen_range(11..=99u32),
                rng.gen_range(11..=99u32),
                rng.gen_range(11..=99u32)
            ),
            CodePattern::Triples => format!(
                "{}{}",
                rng.gen_range(111..=999u32),
                rng.gen_range(111..=999u32)
            ),
            CodePattern::RepeatedDigits => format!(
                "{}{}",
                rng.gen_range(1..=9u32) * 111,
                rng.gen_range(1..=9u32) * 111
            ),
            CodePattern::Pairs => format!(
                "{}{}{}",
                rng.gen_range(10..=99u32),
                rng.gen_range(10..=99u32),
                rng.gen_range(10..=99u32)
            ),
        }
    }
}

/// Generates codes from the OS CSPRNG
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(CODE_LENGTH)
    }
}

impl CodeGenerator {
    /// Create a generator producing codes of `length` digits
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Generate a fresh code
    pub fn generate(&self) -> String {
        self.generate_with(&mut OsRng)
    }

    /// Generate a code from an explicit random source
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let pattern = CodePattern::ALL[rng.gen_range(0..CodePattern::ALL.len())];
        normalize_code_length(&pattern.render(rng), self.length)
    }
}

/// Left-pad with `0` or truncate so the code has exactly `length` digits
pub fn normalize_code_length(code: &str, length: usize) -> String {
    if code.len() >= length {
        code.chars().take(length).collect()
    } else {
        format!("{:0>width$}", code, width = length)
    }
}
