// doc-fuzzing/src/primitive.rs
//! Corruption strategies for scalar values

use std::fmt;

use fake::faker::lorem::en::Sentence;
use fake::Fake;
use tracing::warn;

use crate::constants::{patterns, BOUNDARY_LENGTHS};
use crate::provenance::LogEntry;
use crate::random::RandomSource;
use crate::utils::preview;

/// What a scalar is supposed to look like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveHint {
    Text,
    Uri,
    Code,
    Identifier,
}

impl PrimitiveHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveHint::Text => "text",
            PrimitiveHint::Uri => "uri",
            PrimitiveHint::Code => "code",
            PrimitiveHint::Identifier => "identifier",
        }
    }

    /// Characters that tend to break parsers of this kind of value
    fn hostile_chars(&self) -> &'static [char] {
        match self {
            PrimitiveHint::Text => &['\0', '\n', '\t', '"', '<', '>', '&', '\u{202E}', '\u{FEFF}', '😊'],
            PrimitiveHint::Uri => &[' ', ':', '/', '?', '#', '@', '%', '\\', '\u{3000}'],
            PrimitiveHint::Code => &[' ', '|', '^', '\t', '\'', 'ß', '\u{0301}'],
            PrimitiveHint::Identifier => &['/', '_', '~', ' ', '\0', '\u{200B}', 'é'],
        }
    }
}

impl fmt::Display for PrimitiveHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corruption {
    Insertion,
    Deletion,
    Duplication,
    CaseInversion,
    BoundaryLength,
}

impl Corruption {
    pub const ALL: [Corruption; 5] = [
        Corruption::Insertion,
        Corruption::Deletion,
        Corruption::Duplication,
        Corruption::CaseInversion,
        Corruption::BoundaryLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corruption::Insertion => "insertion",
            Corruption::Deletion => "deletion",
            Corruption::Duplication => "duplication",
            Corruption::CaseInversion => "case inversion",
            Corruption::BoundaryLength => "boundary length",
        }
    }
}

/// A corrupted value and the log entry describing it. The caller writes
/// `value` back into the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzed {
    pub value: String,
    pub log: LogEntry,
}

pub struct PrimitiveFuzzer;

impl PrimitiveFuzzer {
    /// Corrupt `current`, or a freshly synthesized value when it is absent or
    /// empty. The result is never empty and always differs from `current`.
    pub fn fuzz(
        random: &mut RandomSource,
        description: &str,
        hint: PrimitiveHint,
        current: Option<&str>,
    ) -> Fuzzed {
        let (original, synthesized) = match current {
            Some(value) if !value.is_empty() => (value.to_string(), false),
            _ => (Self::synthesize(random, hint), true),
        };

        let strategy = random
            .pick_one(&Corruption::ALL)
            .copied()
            .unwrap_or(Corruption::Insertion);
        let chars: Vec<char> = original.chars().collect();
        let (applied, corrupted) = match Self::apply(random, strategy, hint, &chars) {
            Some(corrupted) if !corrupted.is_empty() && corrupted != chars => (strategy, corrupted),
            _ => (
                Corruption::Insertion,
                Self::apply(random, Corruption::Insertion, hint, &chars).unwrap_or_default(),
            ),
        };
        let value: String = corrupted.into_iter().collect();

        let origin = if synthesized {
            format!("synthesized {}", preview(&original))
        } else {
            preview(&original)
        };
        let log = LogEntry::operation(format!(
            "{}: {} on {} value {} -> {} ({} -> {} chars)",
            description,
            applied.as_str(),
            hint,
            origin,
            preview(&value),
            chars.len(),
            value.chars().count(),
        ));

        Fuzzed { value, log }
    }

    /// A syntactically valid value of the given shape
    pub fn synthesize(random: &mut RandomSource, hint: PrimitiveHint) -> String {
        let pattern = match hint {
            PrimitiveHint::Text => return Sentence(2..8).fake_with_rng::<String, _>(random),
            PrimitiveHint::Identifier if random.next_bool() => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(&random.next_bytes(16));
                return uuid::Builder::from_random_bytes(bytes).into_uuid().to_string();
            }
            PrimitiveHint::Identifier => patterns::IDENTIFIER,
            PrimitiveHint::Uri => patterns::URI,
            PrimitiveHint::Code => patterns::CODE,
        };

        random.regex_string(pattern).unwrap_or_else(|err| {
            warn!("falling back to a fixed {} value: {}", hint, err);
            format!("fuzz-{}", hint)
        })
    }

    /// Apply one strategy. Returns `None` when the strategy cannot change a
    /// value of this length.
    fn apply(
        random: &mut RandomSource,
        strategy: Corruption,
        hint: PrimitiveHint,
        chars: &[char],
    ) -> Option<Vec<char>> {
        let len = chars.len();
        match strategy {
            Corruption::Insertion => {
                let at = random.next_int(0, len as i64 + 1) as usize;
                let mut inserted = Vec::new();
                if hint == PrimitiveHint::Uri && random.next_bool() {
                    // percent-encoded garbage
                    let count = random.next_int(1, 4) as usize;
                    for byte in random.next_bytes(count) {
                        inserted.push('%');
                        inserted.extend(hex::encode_upper([byte]).chars());
                    }
                } else {
                    for _ in 0..random.next_int(1, 5) {
                        inserted.extend(random.pick_one(hint.hostile_chars()).copied());
                    }
                }
                let mut result = chars.to_vec();
                result.splice(at..at, inserted);
                Some(result)
            }
            Corruption::Deletion => {
                if len < 2 {
                    return None;
                }
                let start = random.next_int(0, len as i64) as usize;
                let max_removed = (len - 1).min(len - start);
                let removed = random.next_int(1, max_removed as i64 + 1) as usize;
                let mut result = chars.to_vec();
                result.drain(start..start + removed);
                Some(result)
            }
            Corruption::Duplication => {
                if len == 0 {
                    return None;
                }
                let start = random.next_int(0, len as i64) as usize;
                let end = random.next_int(start as i64 + 1, len as i64 + 1) as usize;
                let copies = random.next_int(1, 9) as usize;
                let repeated: Vec<char> = chars[start..end]
                    .iter()
                    .copied()
                    .cycle()
                    .take((end - start) * copies)
                    .collect();
                let mut result = chars.to_vec();
                result.splice(end..end, repeated);
                Some(result)
            }
            Corruption::CaseInversion => Some(
                chars
                    .iter()
                    .flat_map(|c| -> Vec<char> {
                        if c.is_lowercase() {
                            c.to_uppercase().collect()
                        } else if c.is_uppercase() {
                            c.to_lowercase().collect()
                        } else {
                            vec![*c]
                        }
                    })
                    .collect(),
            ),
            Corruption::BoundaryLength => {
                if len == 0 {
                    return None;
                }
                let target = *random.pick_one(BOUNDARY_LENGTHS)?;
                Some(chars.iter().copied().cycle().take(target).collect())
            }
        }
    }
}
