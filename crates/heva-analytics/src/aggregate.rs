//! Grouped counts, top-N ranking, percentages and averages.

use serde::Serialize;

/// Key used when a record has no value for the grouped field.
pub const UNKNOWN: &str = "Unknown";

/// Key of the bucket that absorbs entries cut by [`top_n`].
pub const OTHERS: &str = "Others";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

/// Counts per distinct key, in the order each key was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupCounts(Vec<GroupCount>);

impl GroupCounts {
    /// Count for `name`, zero when the key never occurred.
    pub fn get(&self, name: &str) -> usize {
        self.0
            .iter()
            .find(|entry| entry.name == name)
            .map_or(0, |entry| entry.count)
    }

    /// Sum over all groups. Equals the size of the grouped collection.
    pub fn total(&self) -> usize {
        self.0.iter().map(|entry| entry.count).sum()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupCount> {
        self.0.iter()
    }

    fn increment(&mut self, name: &str) {
        match self.0.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.count += 1,
            None => self.0.push(GroupCount {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
}

impl<'a> IntoIterator for &'a GroupCounts {
    type Item = &'a GroupCount;
    type IntoIter = std::slice::Iter<'a, GroupCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Count records per key.
///
/// A missing or blank key is counted under [`UNKNOWN`], so the groups
/// always sum to the number of records.
pub fn group_count<'a, T, I, F>(items: I, mut key: F) -> GroupCounts
where
    T: 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&'a T) -> Option<&'a str>,
{
    let mut counts = GroupCounts::default();
    for item in items {
        let name = match key(item) {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNKNOWN,
        };
        counts.increment(name);
    }
    counts
}

/// The `n` largest groups, largest first.
///
/// Equal counts keep their first-seen order. With `fold_others`, the
/// groups cut from the ranking are summed into one trailing [`OTHERS`]
/// entry, added only when that sum is non-zero.
pub fn top_n(counts: &GroupCounts, n: usize, fold_others: bool) -> Vec<GroupCount> {
    let mut ranked: Vec<&GroupCount> = counts.iter().collect();
    // `sort_by` is stable: ties stay in first-seen order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    let mut top: Vec<GroupCount> = ranked.iter().take(n).map(|entry| (*entry).clone()).collect();

    if fold_others {
        let rest: usize = ranked.iter().skip(n).map(|entry| entry.count).sum();
        if rest > 0 {
            top.push(GroupCount {
                name: OTHERS.to_string(),
                count: rest,
            });
        }
    }

    top
}

/// `round(value / total * 100)`, or 0 when `total` is 0.
pub fn percentage(value: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let (value, total) = (value as u64, total as u64);
    // Integer round-half-up: floor((200v + t) / 2t).
    let rounded = (value * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Mean of `selector` over `items`.
///
/// The divisor is the item count with a floor of 1, so an empty
/// collection averages to 0.
pub fn average<'a, T, I, F>(items: I, mut selector: F) -> f64
where
    T: 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&'a T) -> f64,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for item in items {
        sum += selector(item);
        count += 1;
    }
    sum / count.max(1) as f64
}
