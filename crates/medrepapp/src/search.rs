//! Column search over a record collection.
//!
//! Matching is a case-insensitive substring test on the text form of one
//! column. The needle is trimmed first; a blank needle matches everything, so
//! the result is the collection unchanged (same records, same order).

use crate::model::{Doctor, SearchColumn};

/// Returns the records whose `column` contains `term`, in collection order.
pub fn filter_records<'a>(
    records: &'a [Doctor],
    column: SearchColumn,
    term: &str,
) -> Vec<&'a Doctor> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|doc| matches(doc, column, &needle))
        .collect()
}

fn matches(doc: &Doctor, column: SearchColumn, needle_lower: &str) -> bool {
    doc.fields
        .get(column.field())
        .to_lowercase()
        .contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DoctorFields, DoctorId};
    use proptest::prelude::*;

    fn doctor(id: &str, name: &str, code: &str) -> Doctor {
        Doctor::new(
            DoctorId::new(id),
            DoctorFields {
                name: name.to_string(),
                code: code.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_blank_term_keeps_everything() {
        let records = vec![doctor("1", "B", "x"), doctor("2", "A", "y")];
        let out = filter_records(&records, SearchColumn::Name, "   ");
        assert_eq!(out, records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let records = vec![
            doctor("1", "Sunday Clinic", "c1"),
            doctor("2", "Monday Care", "c2"),
        ];
        let out = filter_records(&records, SearchColumn::Name, "sun");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.as_str(), "1");
    }

    #[test]
    fn test_term_is_trimmed() {
        let records = vec![doctor("1", "Rao", "D-104")];
        assert_eq!(filter_records(&records, SearchColumn::Code, "  d-10 ").len(), 1);
    }

    #[test]
    fn test_searches_only_selected_column() {
        let records = vec![doctor("1", "Rao", "MEHTA-1")];
        assert!(filter_records(&records, SearchColumn::Name, "mehta").is_empty());
        assert_eq!(filter_records(&records, SearchColumn::Code, "mehta").len(), 1);
    }

    #[test]
    fn test_numeric_column_matches_text_form() {
        let mut doc = doctor("1", "Rao", "c");
        doc.fields.registration_no = "1042".into();
        let records = vec![doc];
        assert_eq!(
            filter_records(&records, SearchColumn::RegistrationNo, "04").len(),
            1
        );
    }

    fn arb_column() -> impl Strategy<Value = SearchColumn> {
        prop::sample::select(SearchColumn::ALL.to_vec())
    }

    fn arb_records() -> impl Strategy<Value = Vec<Doctor>> {
        prop::collection::vec(
            ("[a-zA-Z ]{0,12}", "[A-Z0-9-]{0,6}", "[0-9]{0,5}", "[A-Z0-9]{0,10}"),
            0..12,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (name, code, reg, pan))| {
                    Doctor::new(
                        DoctorId::new(i.to_string()),
                        DoctorFields {
                            name,
                            code,
                            registration_no: reg,
                            tax_id: pan,
                            ..Default::default()
                        },
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filtered_is_matching_subset(
            records in arb_records(),
            column in arb_column(),
            term in "[a-zA-Z0-9]{1,3}",
        ) {
            let out = filter_records(&records, column, &term);
            let needle = term.to_lowercase();
            prop_assert!(out.len() <= records.len());
            for doc in out {
                prop_assert!(records.iter().any(|r| r == doc));
                prop_assert!(doc.fields.get(column.field()).to_lowercase().contains(&needle));
            }
        }

        #[test]
        fn prop_blank_term_is_identity(
            records in arb_records(),
            column in arb_column(),
            term in "[ \t]{0,4}",
        ) {
            let out: Vec<Doctor> = filter_records(&records, column, &term)
                .into_iter()
                .cloned()
                .collect();
            prop_assert_eq!(out, records);
        }
    }
}
