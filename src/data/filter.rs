use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dimension, SalesTable};

// ---------------------------------------------------------------------------
// Filter predicate: which category values are selected per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state: maps dimension → set of selected values.
/// An absent dimension is unconstrained; an empty set selects nothing.
pub type Selection = BTreeMap<Dimension, BTreeSet<String>>;

/// Initialise a [`Selection`] with every observed value of every sidebar
/// dimension selected (i.e., show everything).
pub fn init_selection(table: &SalesTable) -> Selection {
    Dimension::FILTERS
        .iter()
        .map(|&dim| (dim, table.distinct(dim).iter().cloned().collect()))
        .collect()
}

/// Return indices of rows that pass every selection (logical AND).
///
/// A row passes a dimension when:
/// * The dimension is not present in `selection` → passes (no constraint)
/// * The selected set is empty → nothing selected → fails
/// * The row's value for that dimension is in the selected set → passes
pub fn filtered_indices(table: &SalesTable, selection: &Selection) -> Vec<usize> {
    if table.is_empty() || selection.values().any(BTreeSet::is_empty) {
        return Vec::new();
    }

    // Dimensions with every observed value selected cannot reject a row.
    let active: Vec<(Dimension, &BTreeSet<String>)> = selection
        .iter()
        .filter(|(dim, selected)| {
            !table
                .distinct(**dim)
                .iter()
                .all(|value| selected.contains(value))
        })
        .map(|(dim, selected)| (*dim, selected))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active
                .iter()
                .all(|(dim, selected)| selected.contains(row.category(*dim)))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    fn only(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn full_selection_keeps_every_row() {
        let table = sample_table();
        let selection = init_selection(&table);
        assert_eq!(filtered_indices(&table, &selection), (0..table.len()).collect::<Vec<_>>());
    }

    #[test]
    fn any_empty_selection_yields_nothing() {
        let table = sample_table();
        for dim in Dimension::FILTERS {
            let mut selection = init_selection(&table);
            selection.insert(dim, BTreeSet::new());
            assert!(filtered_indices(&table, &selection).is_empty(), "{dim:?}");
        }
    }

    #[test]
    fn empty_table_yields_nothing() {
        let table = SalesTable::from_rows(Vec::new());
        assert!(filtered_indices(&table, &Selection::new()).is_empty());
    }

    #[test]
    fn conjunction_of_city_gender_branch() {
        let table = sample_table();
        let mut selection = init_selection(&table);
        selection.insert(Dimension::City, only(&["Yangon"]));
        selection.insert(Dimension::Gender, only(&["Female"]));
        selection.insert(Dimension::Branch, only(&["A"]));
        assert_eq!(filtered_indices(&table, &selection), vec![0]);

        selection.insert(Dimension::City, only(&["Mandalay"]));
        selection.insert(Dimension::Gender, only(&["Male"]));
        selection.insert(Dimension::Branch, only(&["B"]));
        let indices = filtered_indices(&table, &selection);
        assert_eq!(indices, vec![4, 7]);
        for i in indices {
            let row = &table.rows[i];
            assert_eq!((row.city.as_str(), row.gender.as_str(), row.branch.as_str()), ("Mandalay", "Male", "B"));
        }
    }

    #[test]
    fn filtered_rows_never_exceed_the_table() {
        let table = sample_table();
        let cities = table.distinct(Dimension::City).to_vec();
        let genders = table.distinct(Dimension::Gender).to_vec();
        let subsets = |values: &[String]| -> Vec<BTreeSet<String>> {
            (0..1u32 << values.len())
                .map(|mask| {
                    values
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, v)| v.clone())
                        .collect()
                })
                .collect()
        };

        for city_set in subsets(&cities) {
            for gender_set in subsets(&genders) {
                let mut selection = init_selection(&table);
                selection.insert(Dimension::City, city_set.clone());
                selection.insert(Dimension::Gender, gender_set.clone());
                let indices = filtered_indices(&table, &selection);
                assert!(indices.len() <= table.len());
                assert!(indices.iter().all(|&i| {
                    let row = &table.rows[i];
                    city_set.contains(&row.city) && gender_set.contains(&row.gender)
                }));
            }
        }
    }

    #[test]
    fn absent_dimension_is_unconstrained() {
        let table = sample_table();
        let mut selection = Selection::new();
        selection.insert(Dimension::CustomerType, only(&["Member"]));
        let indices = filtered_indices(&table, &selection);
        assert_eq!(indices, vec![0, 3, 6, 7]);
    }
}
