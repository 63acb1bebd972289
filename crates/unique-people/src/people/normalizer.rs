use unicode_normalization::UnicodeNormalization;

/// Which folding rules `normalize` applies after ASCII folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    /// Drops everything outside `[a-z ]` and collapses whitespace.
    #[default]
    Clean,
    /// Splits on single spaces only and keeps punctuation, matching the
    /// historical output byte for byte.
    Legacy,
}

impl NormalizationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clean" => Some(Self::Clean),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Legacy => "legacy",
        }
    }
}

/// Alphabetically sorted ASCII-lowercase tokens of a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    tokens: Vec<String>,
}

impl NormalizedName {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens joined by single spaces.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(|token| token.is_empty())
    }
}

/// NFKD-decomposes `value`, drops every non-ASCII code point and lowercases.
/// Characters without an ASCII base (`æ`, `ø`, CJK) vanish entirely.
pub fn fold_to_ascii(value: &str) -> String {
    value
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_ascii_lowercase()
}

pub fn normalize(value: &str, mode: NormalizationMode) -> NormalizedName {
    let folded = fold_to_ascii(value);

    let mut tokens: Vec<String> = match mode {
        NormalizationMode::Clean => {
            let stripped: String = folded
                .chars()
                .map(|c| if c.is_ascii_whitespace() { ' ' } else { c })
                .filter(|c| c.is_ascii_lowercase() || *c == ' ')
                .collect();
            stripped.split_whitespace().map(str::to_string).collect()
        }
        NormalizationMode::Legacy => folded.split(' ').map(str::to_string).collect(),
    };

    tokens.sort();
    NormalizedName { tokens }
}
