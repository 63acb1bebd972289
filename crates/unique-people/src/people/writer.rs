use super::canonicalizer::CanonicalEntry;
use std::io::Write;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `header` (when present) and one `firstname,lastname` line per entry.
///
/// Values are written verbatim. A name that contains a comma shifts the
/// columns of its row; such rows are reported with `warn!`.
pub fn write_entries<'a, W, I>(
    mut writer: W,
    header: Option<&str>,
    entries: I,
) -> Result<u64, WriteError>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalEntry>,
{
    if let Some(header) = header.filter(|header| !header.is_empty()) {
        writeln!(writer, "{header}")?;
    }

    let mut written = 0u64;
    for entry in entries {
        if entry.firstname.contains(',') || entry.lastname.contains(',') {
            warn!(
                firstname = %entry.firstname,
                lastname = %entry.lastname,
                "name contains a comma; output row will have extra columns"
            );
        }
        writeln!(writer, "{},{}", entry.firstname, entry.lastname)?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
