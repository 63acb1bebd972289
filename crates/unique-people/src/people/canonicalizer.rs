use serde::Serialize;

/// First/last name pair chosen to represent a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalEntry {
    pub firstname: String,
    pub lastname: String,
}

impl CanonicalEntry {
    /// Splits on whitespace: the last token is the lastname, the rest is the
    /// firstname joined by single spaces.
    pub fn from_full_name(full_name: &str) -> Self {
        let mut tokens: Vec<&str> = full_name.split_whitespace().collect();
        let lastname = tokens.pop().unwrap_or_default().to_string();
        Self {
            firstname: tokens.join(" "),
            lastname,
        }
    }
}

/// Longest spelling by character count; the earliest one wins a tie.
pub fn representative(names: &[String]) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for name in names {
        let length = name.chars().count();
        match best {
            Some((_, best_length)) if length <= best_length => {}
            _ => best = Some((name.as_str(), length)),
        }
    }
    best.map(|(name, _)| name)
}

pub fn canonicalize(names: &[String]) -> Option<CanonicalEntry> {
    representative(names).map(CanonicalEntry::from_full_name)
}
