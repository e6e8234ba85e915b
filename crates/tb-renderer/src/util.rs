use pulldown_cmark::HeadingLevel;

/// Numeric heading level (1-6).
pub(crate) fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Language token of a fenced code block info string (`rust,ignore` → `rust`).
pub(crate) fn fence_language(info: &str) -> Option<String> {
    let lang = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or_default()
        .trim();
    (!lang.is_empty()).then(|| lang.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level(HeadingLevel::H1), 1);
        assert_eq!(heading_level(HeadingLevel::H6), 6);
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), Some("rust".to_owned()));
        assert_eq!(fence_language("json title=\"data\""), Some("json".to_owned()));
        assert_eq!(fence_language("rust,ignore"), Some("rust".to_owned()));
        assert_eq!(fence_language(""), None);
        assert_eq!(fence_language("   "), None);
    }
}
