/// Canonical form used to compare disease names and synonyms: surrounding
/// whitespace removed, internal runs of whitespace collapsed to one space,
/// lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Replaces the `_` separator some ontologies use in identifiers (`MONDO_0000001`)
/// with the `:` form stored in the database.
#[must_use]
pub fn normalize_separator(s: &str) -> String {
    s.trim().replace('_', ":")
}

#[cfg(feature = "backend")]
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_not_blank(value: &str, _: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }

    Ok(())
}
