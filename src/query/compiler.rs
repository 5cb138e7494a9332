//! Query compiler: search specification to operator-annotated query string
//!
//! Clause order is fixed: sites, excluded sites, file types, excluded words,
//! title words, url words. Each clause is dropped when its dimension is empty.
//! Tag text is inserted verbatim; an embedded double quote produces a malformed
//! clause and is not escaped.

use super::spec::SearchSpecification;
use super::tags::TagSet;

/// Compile a specification into a query string. Returns `""` when there is
/// nothing to search for.
pub fn compile(spec: &SearchSpecification) -> String {
    let clauses = [
        or_group(&spec.sites, |t| format!("site:{}", t)),
        exclusions(&spec.exclude_sites, |t| format!("-site:{}", t)),
        or_group(&spec.file_types, |t| format!("filetype:{}", t)),
        exclusions(&spec.exclude_words, |t| format!("-\"{}\"", t)),
        or_group(&spec.words_in_title, |t| format!("intitle:\"{}\"", t)),
        or_group(&spec.words_in_url, |t| format!("inurl:\"{}\"", t)),
    ];

    let operators = clauses
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {}", spec.free_text.trim(), operators)
        .trim()
        .to_string()
}

/// `(a OR b OR c)` or nothing
fn or_group(tags: &TagSet, term: impl Fn(&str) -> String) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let terms: Vec<String> = tags.iter().map(|t| term(&t.text)).collect();
    Some(format!("({})", terms.join(" OR ")))
}

/// `a b c` or nothing
fn exclusions(tags: &TagSet, term: impl Fn(&str) -> String) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let terms: Vec<String> = tags.iter().map(|t| term(&t.text)).collect();
    Some(terms.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Dimension;

    fn full_spec() -> SearchSpecification {
        let mut spec = SearchSpecification::new();
        spec.free_text = "foo".to_string();
        spec.sites.add("a.com");
        spec.exclude_sites.add("b.com");
        spec.file_types.add("pdf");
        spec.exclude_words.add("x");
        spec.words_in_title.add("y");
        spec.words_in_url.add("z");
        spec
    }

    #[test]
    fn test_empty_spec_compiles_to_empty_string() {
        assert_eq!(compile(&SearchSpecification::new()), "");

        let mut spec = SearchSpecification::new();
        spec.free_text = "   ".to_string();
        assert_eq!(compile(&spec), "");
    }

    #[test]
    fn test_clause_order() {
        assert_eq!(
            compile(&full_spec()),
            r#"foo (site:a.com) -site:b.com (filetype:pdf) -"x" (intitle:"y") (inurl:"z")"#
        );
    }

    #[test]
    fn test_deterministic() {
        let spec = full_spec();
        assert_eq!(compile(&spec), compile(&spec));
    }

    #[test]
    fn test_clause_gating() {
        let expected = [
            (Dimension::Sites, "(site:v)"),
            (Dimension::ExcludeSites, "-site:v"),
            (Dimension::FileTypes, "(filetype:v)"),
            (Dimension::WordsInTitle, r#"(intitle:"v")"#),
            (Dimension::WordsInUrl, r#"(inurl:"v")"#),
            (Dimension::ExcludeWords, r#"-"v""#),
        ];

        for (dimension, clause) in expected {
            let mut spec = SearchSpecification::new();
            spec.tags_mut(dimension).add("v");
            assert_eq!(compile(&spec), clause, "dimension {}", dimension);
        }
    }

    #[test]
    fn test_multiple_values_follow_insertion_order() {
        let mut spec = SearchSpecification::new();
        spec.sites.extend_texts(["b.org", "a.org"]);
        spec.exclude_words.extend_texts(["ads", "login page"]);

        assert_eq!(
            compile(&spec),
            r#"(site:b.org OR site:a.org) -"ads" -"login page""#
        );
    }

    #[test]
    fn test_free_text_is_trimmed_not_quoted() {
        let mut spec = SearchSpecification::new();
        spec.free_text = "  annual report  ".to_string();
        spec.file_types.add("xlsx");

        assert_eq!(compile(&spec), "annual report (filetype:xlsx)");
    }

    #[test]
    fn test_quotes_in_tag_text_are_not_escaped() {
        let mut spec = SearchSpecification::new();
        spec.words_in_title.add(r#"say "hi""#);

        assert_eq!(compile(&spec), r#"(intitle:"say "hi"")"#);
    }
}
