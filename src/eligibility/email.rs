// src/eligibility/email.rs
use super::annotator::AnnotatedDocument;

/// Email-shaped tokens in document order; an email means the job is applied
/// to off-platform.
pub fn extract_emails(doc: &AnnotatedDocument) -> Vec<String> {
    doc.tokens()
        .iter()
        .filter(|t| t.like_email)
        .map(|t| t.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::normalizer::normalize_description;
    use crate::eligibility::test_support::sample_annotator;

    fn emails(description: &str) -> Vec<String> {
        extract_emails(&sample_annotator().annotate(&normalize_description(description)))
    }

    #[test]
    fn test_extracts_email() {
        assert_eq!(emails("Apply at jobs@acme.com"), vec!["jobs@acme.com"]);
        assert_eq!(emails("Send your CV to hr@acme.io."), vec!["hr@acme.io"]);
    }

    #[test]
    fn test_keeps_every_match_in_order() {
        assert_eq!(
            emails("Write to a@acme.com (or b@acme.com)"),
            vec!["a@acme.com", "b@acme.com"]
        );
    }

    #[test]
    fn test_no_email() {
        assert!(emails("Apply through the platform. Contact @acme on social media").is_empty());
    }
}
