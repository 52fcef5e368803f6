// Reference model for Llrb, entries are indexed by key, keys are
// restricted to 0..capacity.
struct RefNodes {
    entries: Vec<Option<i64>>,
}

impl RefNodes {
    fn new(capacity: usize) -> RefNodes {
        RefNodes {
            entries: vec![None; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|v| v.is_some()).count()
    }

    fn get(&self, key: i64) -> Option<i64> {
        self.entries[key as usize]
    }

    fn set(&mut self, key: i64, value: i64) -> Option<i64> {
        self.entries[key as usize].replace(value)
    }

    fn delete(&mut self, key: i64) -> Option<i64> {
        self.entries[key as usize].take()
    }

    fn present(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(key, value)| value.map(|value| (key as i64, value)))
    }

    fn keys(&self) -> Vec<i64> {
        self.present().map(|(key, _)| key).collect()
    }

    fn delete_min(&mut self) -> Option<(i64, i64)> {
        let (key, value) = self.present().next()?;
        self.entries[key as usize] = None;
        Some((key, value))
    }

    fn delete_max(&mut self) -> Option<(i64, i64)> {
        let (key, value) = self.present().last()?;
        self.entries[key as usize] = None;
        Some((key, value))
    }

    fn floor(&self, key: i64) -> Option<i64> {
        self.present().map(|(k, _)| k).filter(|k| *k <= key).last()
    }

    fn ceiling(&self, key: i64) -> Option<i64> {
        self.present().map(|(k, _)| k).find(|k| *k >= key)
    }

    fn rank(&self, key: i64) -> usize {
        self.present().filter(|(k, _)| *k < key).count()
    }

    fn select(&self, rank: usize) -> Option<i64> {
        self.present().nth(rank).map(|(key, _)| key)
    }

    fn keys_between(&self, low: i64, high: i64) -> Vec<i64> {
        self.present()
            .map(|(key, _)| key)
            .filter(|key| *key >= low && *key <= high)
            .collect()
    }

    fn iter(&self) -> std::vec::IntoIter<(i64, i64)> {
        self.present().collect::<Vec<(i64, i64)>>().into_iter()
    }

    fn range(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<(i64, i64)> {
        self.present()
            .filter(|(key, _)| in_bounds(*key, &low, &high))
            .collect::<Vec<(i64, i64)>>()
            .into_iter()
    }

    fn reverse(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<(i64, i64)> {
        let mut entries: Vec<(i64, i64)> = self.range(low, high).collect();
        entries.reverse();
        entries.into_iter()
    }
}

fn in_bounds(key: i64, low: &Bound<i64>, high: &Bound<i64>) -> bool {
    let above = match low {
        Bound::Included(low) => key >= *low,
        Bound::Excluded(low) => key > *low,
        Bound::Unbounded => true,
    };
    let below = match high {
        Bound::Included(high) => key <= *high,
        Bound::Excluded(high) => key < *high,
        Bound::Unbounded => true,
    };
    above && below
}

fn random_low_high(size: usize) -> (Bound<i64>, Bound<i64>) {
    let size = size as u64;
    let low = (random::<u64>() % size) as i64;
    let high = (random::<u64>() % size) as i64;
    let low = match random::<u8>() % 3 {
        0 => Bound::Included(low),
        1 => Bound::Excluded(low),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    let high = match random::<u8>() % 3 {
        0 => Bound::Included(high),
        1 => Bound::Excluded(high),
        2 => Bound::Unbounded,
        _ => unreachable!(),
    };
    (low, high)
}
