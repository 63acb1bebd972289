use super::normalizer::NormalizedName;
use rphonetic::{DoubleMetaphone, Encoder, Nysiis};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Double Metaphone defaults to 4 characters, which would reduce a full name
/// to its first token.
const MAX_METAPHONE_LENGTH: usize = 64;

/// Composite key: metaphone primary + metaphone alternate + NYSIIS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhoneticKey(String);

impl PhoneticKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the configured phonetic encoders so a run builds them once.
pub struct NameEncoder {
    metaphone: DoubleMetaphone,
    nysiis: Nysiis,
}

impl Default for NameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NameEncoder {
    pub fn new() -> Self {
        Self {
            metaphone: DoubleMetaphone::new(MAX_METAPHONE_LENGTH),
            nysiis: Nysiis::new(false),
        }
    }

    pub fn encode(&self, name: &NormalizedName) -> PhoneticKey {
        self.encode_str(&name.joined())
    }

    /// Encodes an already-joined clean string.
    pub fn encode_str(&self, clean: &str) -> PhoneticKey {
        if clean.trim().is_empty() {
            return PhoneticKey(String::new());
        }

        let (primary, alternate) = self.metaphone_codes(clean);
        let sound_alike = self.nysiis.encode(clean);

        PhoneticKey(format!("{primary}{alternate}{sound_alike}"))
    }

    /// Primary and alternate Double Metaphone codes, the alternate blanked
    /// when it repeats the primary. The encoder panics on a few short inputs
    /// such as `ll`; those keep empty codes and are keyed on NYSIIS alone.
    fn metaphone_codes(&self, clean: &str) -> (String, String) {
        let metaphone = &self.metaphone;
        let codes = panic::catch_unwind(AssertUnwindSafe(|| {
            let codes = metaphone.double_metaphone(clean);
            (codes.primary().to_string(), codes.alternate().to_string())
        }));

        match codes {
            Ok((primary, mut alternate)) => {
                if alternate == primary {
                    alternate.clear();
                }
                (primary, alternate)
            }
            Err(_) => {
                warn!(name = clean, "double metaphone failed, keying on NYSIIS only");
                (String::new(), String::new())
            }
        }
    }
}
