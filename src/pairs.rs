//! Label Pairing
//!
//! A physical label holds a top line and an optional bottom line. Pairing
//! consumes the record list two rows at a time, in input order, with no
//! lookahead beyond the current window.

use serde::{Deserialize, Serialize};

use crate::records::LabelRecord;

/// One printable label: a top record plus an optional bottom record.
///
/// The top is never empty; a window with nothing printable emits no pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPair {
    pub top: LabelRecord,
    pub bottom: Option<LabelRecord>,
}

/// Group records into printable pairs.
///
/// Per two-record window `(a, b)` (`b` absent for an odd trailing record):
/// an empty `b` leaves the bottom absent; an empty `a` promotes a non-empty
/// `b` into the top slot, alone; a window where both are empty is dropped.
pub fn pair_records(records: &[LabelRecord]) -> Vec<LabelPair> {
    let mut pairs = Vec::with_capacity((records.len() + 1) / 2);

    for window in records.chunks(2) {
        let a = &window[0];
        let bottom = window.get(1).filter(|b| !b.is_empty());

        let (top, bottom) = if a.is_empty() {
            match bottom {
                Some(b) => (Some(b), None),
                None => (None, None),
            }
        } else {
            (Some(a), bottom)
        };

        if let Some(top) = top {
            pairs.push(LabelPair {
                top: top.clone(),
                bottom: bottom.cloned(),
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, value: &str, image: &str) -> LabelRecord {
        LabelRecord {
            kind: kind.to_string(),
            value: value.to_string(),
            image: image.to_string(),
        }
    }

    fn empty() -> LabelRecord {
        record("Name", "", "imgA")
    }

    #[test]
    fn two_full_rows_make_one_pair() {
        let records = vec![
            record("Name", "Alice", "imgA"),
            record("Email", "a@x.com", "imgB"),
        ];
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].top.value, "Alice");
        assert_eq!(pairs[0].bottom.as_ref().unwrap().value, "a@x.com");
    }

    #[test]
    fn empty_bottom_is_dropped() {
        let records = vec![record("Name", "Alice", "imgA"), empty()];
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].top.value, "Alice");
        assert!(pairs[0].bottom.is_none());
    }

    #[test]
    fn empty_top_promotes_bottom() {
        let records = vec![empty(), record("Email", "b@x.com", "imgB")];
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].top.kind, "Email");
        assert_eq!(pairs[0].top.value, "b@x.com");
        assert!(pairs[0].bottom.is_none());
    }

    #[test]
    fn both_empty_window_emits_nothing() {
        let pairs = pair_records(&[empty(), empty()]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn odd_trailing_record_stands_alone() {
        let records = vec![
            record("Name", "Alice", "imgA"),
            record("Email", "a@x.com", "imgB"),
            record("Phone", "555-0100", "imgC"),
        ];
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].top.value, "555-0100");
        assert!(pairs[1].bottom.is_none());
    }

    #[test]
    fn odd_trailing_empty_record_emits_nothing() {
        let records = vec![
            record("Name", "Alice", "imgA"),
            record("Email", "a@x.com", "imgB"),
            empty(),
        ];
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn no_pair_has_an_empty_top() {
        let records = vec![
            empty(),
            record("A", "1", ""),
            record("B", "2", ""),
            empty(),
            empty(),
            empty(),
            record("C", "3", ""),
        ];
        let pairs = pair_records(&records);
        assert!(pairs.iter().all(|p| !p.top.value.is_empty()));
        assert!(pairs.len() <= (records.len() + 1) / 2);
    }

    #[test]
    fn pair_count_equals_ceil_half_when_no_row_is_empty() {
        let records: Vec<_> = (0..5)
            .map(|i| record("Item", &format!("v{i}"), ""))
            .collect();
        let pairs = pair_records(&records);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn input_order_is_preserved() {
        let records: Vec<_> = (0..6)
            .map(|i| record("Item", &format!("v{i}"), ""))
            .collect();
        let pairs = pair_records(&records);
        let tops: Vec<_> = pairs.iter().map(|p| p.top.value.as_str()).collect();
        assert_eq!(tops, vec!["v0", "v2", "v4"]);
    }
}
