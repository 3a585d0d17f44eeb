// src/eligibility/normalizer.rs
//! Description clean-up ahead of sentence segmentation

const BULLET: char = '\u{2022}';

/// Clean and lowercase a raw job description.
///
/// Bullets are dropped, slashes become spaces and every line break is turned
/// into a sentence boundary unless the text before it already ends one.
pub fn normalize_description(raw: &str) -> String {
    let text = raw
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(BULLET, "")
        .replace('/', " ");

    let mut clean = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        if ch != '\n' {
            clean.push(ch);
            continue;
        }

        match clean.chars().last() {
            Some(prev) if prev == '.' || prev == ':' || prev.is_whitespace() => clean.push(' '),
            Some(_) => clean.push_str(". "),
            None => clean.push(' '),
        }
    }

    clean.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_becomes_sentence_boundary() {
        assert_eq!(
            normalize_description("Python developer\nRemote"),
            "python developer. remote"
        );
    }

    #[test]
    fn test_newline_after_terminator_becomes_space() {
        assert_eq!(normalize_description("Requirements:\nPython"), "requirements: python");
        assert_eq!(normalize_description("We are hiring.\nJoin us"), "we are hiring. join us");
        assert_eq!(normalize_description("Remote \nFull time"), "remote  full time");
    }

    #[test]
    fn test_consecutive_newlines_add_single_period() {
        assert_eq!(normalize_description("About us\n\nWe build"), "about us.  we build");
    }

    #[test]
    fn test_bullets_and_slashes_removed() {
        assert_eq!(
            normalize_description("\u{2022} Python/Django\n\u{2022} SQL"),
            " python django.  sql"
        );
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(normalize_description("Line one\r\nLine two"), "line one. line two");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let samples = [
            "Senior Engineer\n\u{2022} 5+ years of experience\nFluent German required.",
            "Requirements:\nPython/Scala\n\nApply at jobs@acme.com",
            "\nLeading newline and trailing one\n",
            "ALREADY CLEAN TEXT.",
        ];

        for sample in samples {
            let once = normalize_description(sample);
            let twice = normalize_description(&once);
            assert_eq!(once, twice, "normalization drifted for {:?}", sample);
            assert!(!once.contains(".."), "double period in {:?}", once);
        }
    }
}
