use crate::host::Form;

/// Ephemeral per-invocation state. Constructed fresh for every command
/// invocation and never persisted.
#[derive(Debug, Default)]
pub struct MatchContext<'a> {
    /// Free-text match string; empty selects the unfiltered print path.
    pub match_string: String,
    /// Raw 4-character form-type filter token, possibly empty.
    pub type_filter: String,
    /// Forms accepted by the generic listing, sorted before printing.
    pub forms: Vec<&'a Form>,
    /// Ensures the cell section header prints at most once, and only when
    /// at least one cell matched.
    pub cell_header_printed: bool,
}

impl<'a> MatchContext<'a> {
    pub fn new(match_string: &str, type_filter: &str) -> Self {
        Self {
            match_string: match_string.to_owned(),
            type_filter: type_filter.to_owned(),
            forms: Vec::new(),
            cell_header_printed: false,
        }
    }

    /// True when the empty match string selected "print everything".
    pub fn is_unfiltered(&self) -> bool {
        self.match_string.is_empty()
    }
}
