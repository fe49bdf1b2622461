use regex::Regex;
use std::sync::OnceLock;

/// Snapshot sheets are named like "1.1", "12.3" or "4.10 Week 2".
const SNAPSHOT_SHEET_PATTERN: &str = r"^\d{1,2}\.\d{1,2}";

fn snapshot_sheet_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(SNAPSHOT_SHEET_PATTERN).expect("valid snapshot sheet pattern"))
}

/// Result of picking the two sheets to compare
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelection {
    Selected { previous: String, current: String },
    TooFew { found: usize },
}

pub fn is_snapshot_sheet(name: &str) -> bool {
    snapshot_sheet_regex().is_match(name)
}

/// Pick the last two snapshot sheets, in workbook order, as (previous, current).
pub fn select_sheets(names: &[String]) -> SheetSelection {
    let candidates: Vec<&String> = names.iter().filter(|name| is_snapshot_sheet(name)).collect();

    match candidates.as_slice() {
        [.., previous, current] => SheetSelection::Selected {
            previous: (*previous).clone(),
            current: (*current).clone(),
        },
        _ => SheetSelection::TooFew {
            found: candidates.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_picks_last_two_matching_in_order() {
        let selection = select_sheets(&names(&["Cover", "1.1", "1.2", "1.3"]));
        assert_eq!(
            selection,
            SheetSelection::Selected {
                previous: "1.2".to_string(),
                current: "1.3".to_string()
            }
        );
    }

    #[test]
    fn test_ignores_non_matching_sheets_between_candidates() {
        let selection = select_sheets(&names(&["1.1", "Notes", "12.3Foo", "Summary"]));
        assert_eq!(
            selection,
            SheetSelection::Selected {
                previous: "1.1".to_string(),
                current: "12.3Foo".to_string()
            }
        );
    }

    #[test]
    fn test_too_few_candidates() {
        assert_eq!(
            select_sheets(&names(&["Cover", "1.1"])),
            SheetSelection::TooFew { found: 1 }
        );
        assert_eq!(select_sheets(&[]), SheetSelection::TooFew { found: 0 });
    }

    #[test]
    fn test_pattern_is_anchored_at_start() {
        assert!(is_snapshot_sheet("1.1"));
        assert!(is_snapshot_sheet("12.34 extra"));
        assert!(!is_snapshot_sheet("Sheet 1.1"));
        assert!(!is_snapshot_sheet("123.1"));
        assert!(!is_snapshot_sheet("1.x"));
    }
}
