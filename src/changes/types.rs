use std::collections::HashMap;

/// Which snapshot a set of column positions belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Previous,
    Current,
}

/// Column positions carrying one header in each snapshot.
///
/// Both lists are non-empty and sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    pub prev: Vec<usize>,
    pub curr: Vec<usize>,
}

impl ColumnMatch {
    pub fn positions(&self, side: Side) -> &[usize] {
        match side {
            Side::Previous => &self.prev,
            Side::Current => &self.curr,
        }
    }
}

/// Headers present in both snapshots, keyed by normalized header text.
///
/// Iteration order is unspecified; use [`ColumnMatches::sorted_headers`] wherever
/// order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMatches {
    columns: HashMap<String, ColumnMatch>,
}

impl ColumnMatches {
    pub fn get(&self, header: &str) -> Option<&ColumnMatch> {
        self.columns.get(header)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.columns.contains_key(header)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header texts in ascending order.
    pub fn sorted_headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        headers.sort_unstable();
        headers
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut ColumnMatch) -> bool) {
        self.columns.retain(keep);
    }
}

impl FromIterator<(String, ColumnMatch)> for ColumnMatches {
    fn from_iter<I: IntoIterator<Item = (String, ColumnMatch)>>(iter: I) -> Self {
        ColumnMatches {
            columns: iter.into_iter().collect(),
        }
    }
}
