/// Iterator over every unordered pair of a slice, `(items[i], items[j])` with `i < j`.
///
/// Pairs come out in lexicographic index order: `(0,1), (0,2), .., (1,2), ..`.
#[derive(Debug, Clone)]
pub struct UnorderedPairs<'a, T> {
    items: &'a [T],
    i: usize,
    j: usize,
}

/// All unordered pairs of `items`; `n * (n - 1) / 2` of them.
pub fn unordered_pairs<T>(items: &[T]) -> UnorderedPairs<'_, T> {
    UnorderedPairs { items, i: 0, j: 1 }
}

impl<'a, T> Iterator for UnorderedPairs<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.j >= self.items.len() {
            self.i += 1;
            self.j = self.i + 1;
            if self.j >= self.items.len() {
                return None;
            }
        }
        let pair = (&self.items[self.i], &self.items[self.j]);
        self.j += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.len();
        if self.i >= n {
            return (0, Some(0));
        }
        // Rest of row i, then every full row after it.
        let row = n.saturating_sub(self.j);
        let after = n - self.i - 1;
        let remaining = row + after * after.saturating_sub(1) / 2;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for UnorderedPairs<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pairs_in_index_order() {
        let pairs: Vec<_> = unordered_pairs(&[1, 2, 3]).map(|(a, b)| (*a, *b)).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn fewer_than_two_items_yield_nothing() {
        assert_eq!(unordered_pairs::<i32>(&[]).count(), 0);
        assert_eq!(unordered_pairs(&[1]).count(), 0);
    }

    proptest! {
        #[test]
        fn count_matches_binomial(n in 0usize..30) {
            let items: Vec<usize> = (0..n).collect();
            let iter = unordered_pairs(&items);
            let expected = n * n.saturating_sub(1) / 2;
            prop_assert_eq!(iter.len(), expected);
            let pairs: Vec<_> = iter.collect();
            prop_assert_eq!(pairs.len(), expected);
            prop_assert!(pairs.iter().all(|(a, b)| a < b));
        }
    }
}
