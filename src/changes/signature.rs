use super::normalize::normalize;
use super::types::{ColumnMatches, Side};
use crate::excel::Table;

/// Joins normalized cell values inside a signature
pub const SIGNATURE_SEPARATOR: &str = "-";

/// Positions to read on `side`: headers ascending, then positions ascending.
pub fn target_columns(matches: &ColumnMatches, side: Side) -> Vec<usize> {
    matches
        .sorted_headers()
        .into_iter()
        .filter_map(|header| matches.get(header))
        .flat_map(|column| column.positions(side).iter().copied())
        .collect()
}

/// One signature per data row of `table`, in row order.
///
/// Positions past the end of a row contribute an empty string. Distinct rows can
/// collide when values contain the separator; that is accepted.
pub fn generate_signatures(table: &Table, matches: &ColumnMatches, side: Side) -> Vec<String> {
    let columns = target_columns(matches, side);

    table
        .data_rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|&col| row.get(col).map(normalize).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(SIGNATURE_SEPARATOR)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::types::ColumnMatch;
    use crate::excel::CellValue;

    fn matches(entries: &[(&str, &[usize], &[usize])]) -> ColumnMatches {
        entries
            .iter()
            .map(|(header, prev, curr)| {
                (
                    header.to_string(),
                    ColumnMatch {
                        prev: prev.to_vec(),
                        curr: curr.to_vec(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_signatures_in_header_order() {
        let table = Table::new(vec![
            vec!["ColB".into(), "ColA".into()],
            vec!["ValB1".into(), "ValA1".into()],
            vec!["ValB2".into(), "ValA2".into()],
        ]);
        let m = matches(&[("ColA", &[1], &[0]), ("ColB", &[0], &[1])]);

        assert_eq!(
            generate_signatures(&table, &m, Side::Previous),
            vec!["ValA1-ValB1", "ValA2-ValB2"]
        );
    }

    #[test]
    fn test_side_selects_positions() {
        let m = matches(&[("A", &[0, 2], &[1])]);

        assert_eq!(target_columns(&m, Side::Previous), vec![0, 2]);
        assert_eq!(target_columns(&m, Side::Current), vec![1]);
    }

    #[test]
    fn test_out_of_bounds_position_is_empty() {
        let table = Table::new(vec![vec!["ColA".into()], vec!["x".into()]]);
        let m = matches(&[("ColA", &[5], &[5])]);

        assert_eq!(generate_signatures(&table, &m, Side::Current), vec![""]);
    }

    #[test]
    fn test_values_are_normalized() {
        let table = Table::new(vec![
            vec!["Qty".into(), "Name".into()],
            vec![CellValue::Number(10.0), " widget ".into()],
            vec![CellValue::Empty, CellValue::Error("#N/A".into())],
        ]);
        let m = matches(&[("Name", &[1], &[1]), ("Qty", &[0], &[0])]);

        assert_eq!(
            generate_signatures(&table, &m, Side::Current),
            vec!["widget-10", "-"]
        );
    }

    #[test]
    fn test_no_data_rows() {
        let table = Table::new(vec![vec!["A".into()]]);
        let m = matches(&[("A", &[0], &[0])]);

        assert!(generate_signatures(&table, &m, Side::Previous).is_empty());
    }
}
