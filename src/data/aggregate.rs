use std::collections::BTreeMap;

use super::model::Transaction;

/// Group `rows` by `key` and sum `value` per group.
///
/// Groups come back in ascending key order.
pub fn group_sum<'a, K, I>(
    rows: I,
    key: impl Fn(&Transaction) -> K,
    value: impl Fn(&Transaction) -> f64,
) -> Vec<(K, f64)>
where
    K: Ord,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for row in rows {
        *groups.entry(key(row)).or_insert(0.0) += value(row);
    }
    groups.into_iter().collect()
}

/// Stable sort of groups by their summed value, smallest first.
pub fn sort_by_value<K>(groups: &mut [(K, f64)]) {
    groups.sort_by(|a, b| a.1.total_cmp(&b.1));
}

/// Sum of `value` over `rows`.
pub fn sum<'a, I>(rows: I, value: impl Fn(&Transaction) -> f64) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    rows.into_iter().map(value).sum()
}

/// Mean of `value` over `rows`; `None` when there are no rows.
pub fn mean<'a, I>(rows: I, value: impl Fn(&Transaction) -> f64) -> Option<f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (total, count) = rows
        .into_iter()
        .fold((0.0, 0usize), |(total, count), row| (total + value(row), count + 1));
    (count > 0).then(|| total / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    #[test]
    fn groups_are_key_ordered() {
        let table = sample_table();
        let by_hour = group_sum(&table.rows, |r| r.hour, |r| r.total);
        let hours: Vec<u8> = by_hour.iter().map(|(h, _)| *h).collect();
        assert_eq!(hours, vec![10, 11, 13, 14, 18, 20]);
        assert!((by_hour[0].1 - (80.22 + 634.38)).abs() < 1e-9);
    }

    #[test]
    fn value_sort_is_ascending() {
        let mut groups = vec![("b", 3.0), ("a", 1.0), ("c", 2.0)];
        sort_by_value(&mut groups);
        assert_eq!(groups, vec![("a", 1.0), ("c", 2.0), ("b", 3.0)]);
    }

    #[test]
    fn mean_of_nothing_is_none() {
        let table = sample_table();
        assert_eq!(mean(table.rows.iter().take(0), |r| r.rating), None);
        assert_eq!(sum(table.rows.iter().take(0), |r| r.total), 0.0);
        let m = mean(&table.rows, |r| r.quantity as f64).unwrap();
        assert!((m - 57.0 / 8.0).abs() < 1e-12);
    }
}
