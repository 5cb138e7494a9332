//! Recently searched free-text terms

/// Bounded, de-duplicated list of recent terms, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTerms {
    terms: Vec<String>,
    limit: usize,
}

impl RecentTerms {
    pub fn new(limit: usize) -> Self {
        Self {
            terms: Vec::new(),
            limit,
        }
    }

    /// Install persisted terms, re-applying the limit
    pub fn with_terms(mut self, terms: Vec<String>) -> Self {
        for term in terms.into_iter().rev() {
            self.push(&term);
        }
        self
    }

    /// Move `term` to the front; blank terms are ignored
    pub fn push(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.terms.retain(|t| t != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(self.limit);
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

impl Default for RecentTerms {
    fn default() -> Self {
        Self::new(crate::RECENT_TERMS_LIMIT)
    }
}
