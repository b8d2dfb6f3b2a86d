/// Trims a cell and maps blank results to a missing cell, reusing the
/// allocation when nothing needs stripping.
pub fn trim_to_missing(cell: Option<String>) -> Option<String> {
    let value = cell?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// First label of the form `base_N` (N >= 2) that `taken` does not claim.
pub fn next_free_suffix(base: &str, taken: impl Fn(&str) -> bool) -> String {
    (2usize..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_to_missing_handles_blank_and_missing() {
        assert_eq!(trim_to_missing(Some("  Widget ".into())), Some("Widget".into()));
        assert_eq!(trim_to_missing(Some("clean".into())), Some("clean".into()));
        assert_eq!(trim_to_missing(Some(" \t ".into())), None);
        assert_eq!(trim_to_missing(Some(String::new())), None);
        assert_eq!(trim_to_missing(None), None);
    }

    #[test]
    fn next_free_suffix_skips_taken_names() {
        let taken = ["price_2", "price_3"];
        assert_eq!(next_free_suffix("price", |c| taken.contains(&c)), "price_4");
        assert_eq!(next_free_suffix("qty", |_| false), "qty_2");
    }
}
