//! Alert policy: which offices qualify, and how far out a slot may be.

/// Caller-supplied filter policy for availability results.
///
/// `keyword_filters` are matched as lowercase substrings against office
/// names; an empty list matches everything. `horizon_days` bounds how far in
/// the future the earliest open slot may fall; `None` leaves it unbounded.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    pub keyword_filters: Vec<String>,
    pub horizon_days: Option<i64>,
}

impl PolicyConfig {
    /// Build a policy, lowercasing filters and dropping empty entries.
    pub fn new<I, S>(filters: I, horizon_days: Option<i64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keyword_filters = filters
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        Self {
            keyword_filters,
            horizon_days,
        }
    }

    /// True when `name` satisfies the keyword gate: no filters configured, or
    /// any filter occurs as a substring of the lowercased name.
    pub fn keyword_match(&self, name: &str) -> bool {
        if self.keyword_filters.is_empty() {
            return true;
        }
        let lowered = name.to_lowercase();
        self.keyword_filters.iter().any(|f| lowered.contains(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_list_matches_everything() {
        let policy = PolicyConfig::new(Vec::<&str>::new(), None);
        assert!(policy.keyword_match("Newark"));
        assert!(policy.keyword_match(""));
    }

    #[test]
    fn filters_are_lowercased_and_match_substrings() {
        let policy = PolicyConfig::new(vec!["PATER", "newark"], None);
        assert!(policy.keyword_match("Paterson"));
        assert!(policy.keyword_match("NEWARK"));
        assert!(!policy.keyword_match("Camden"));
    }

    #[test]
    fn blank_filter_entries_are_dropped() {
        let policy = PolicyConfig::new(vec!["", "  ", "bayonne"], None);
        assert_eq!(policy.keyword_filters, vec!["bayonne"]);
        assert!(!policy.keyword_match("Paterson"));
    }
}
