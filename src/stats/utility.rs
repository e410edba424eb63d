use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::types::{Bucket, Ranked};

/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Most frequent value; ties go to whichever value was seen first.
pub fn mode_first_seen<T, I>(values: I) -> Option<Ranked<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let counts = count_first_seen(values);

    let mut best: Option<Ranked<T>> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Ranked { value, count });
        }
    }
    best
}

/// Most frequent value; ties go to the value with the lowest `key`.
pub fn mode_by_key<T, K, I>(values: I, key: impl Fn(&T) -> K) -> Option<Ranked<T>>
where
    K: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<K, Ranked<T>> = BTreeMap::new();
    for value in values {
        counts
            .entry(key(&value))
            .and_modify(|r| r.count += 1)
            .or_insert(Ranked { value, count: 1 });
    }

    let mut best: Option<Ranked<T>> = None;
    for ranked in counts.into_values() {
        if best.as_ref().is_none_or(|b| ranked.count > b.count) {
            best = Some(ranked);
        }
    }
    best
}

/// Counts of each value, most frequent first. Equal counts keep first-seen order.
pub fn distribution<'a, I>(values: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut buckets: Vec<Bucket> = count_first_seen(values)
        .into_iter()
        .map(|(value, count)| Bucket {
            value: value.map(str::to_string),
            count,
        })
        .collect();

    // stable
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

fn count_first_seen<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: Vec<(T, usize)> = Vec::new();
    let mut index: HashMap<T, usize> = HashMap::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn test_mode_first_seen_breaks_ties_by_order() {
        let m = mode_first_seen(["b", "a", "a", "b", "c"]).unwrap();
        assert_eq!(m, Ranked { value: "b", count: 2 });
    }

    #[test]
    fn test_mode_first_seen_empty() {
        assert_eq!(mode_first_seen(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_mode_by_key_breaks_ties_by_lowest_key() {
        let m = mode_by_key([9u32, 5, 9, 5, 14], |h| *h).unwrap();
        assert_eq!(m, Ranked { value: 5, count: 2 });
    }

    #[test]
    fn test_distribution_counts_unknown() {
        let d = distribution([Some("Subscriber"), None, Some("Customer"), Some("Subscriber"), None]);
        assert_eq!(
            d,
            vec![
                Bucket { value: Some("Subscriber".to_string()), count: 2 },
                Bucket { value: None, count: 2 },
                Bucket { value: Some("Customer".to_string()), count: 1 },
            ]
        );
    }
}
