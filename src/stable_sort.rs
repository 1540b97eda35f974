//! Stable merge sort that tolerates inconsistent comparators
//!
//! Record comparisons are allowed to be non-transitive when data is
//! malformed (one-sided missing values, incompatible types). The standard
//! library sorts may panic when they detect such an order, so list sorting
//! goes through this index-based merge sort instead. It always terminates,
//! never panics, and keeps equal items in their original order.

use std::cmp::Ordering;

/// Runs at most this long are sorted by insertion before merging
const INSERTION_RUN: usize = 16;

/// Sort `items` in place using `compare`
pub fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }

    let order = sorted_order(items.len(), |a, b| compare(&items[a], &items[b]));
    apply_permutation(items, order);
}

/// Compute the sorted order of `len` items as a list of original indices
pub fn sorted_order<F>(len: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..len).collect();

    for run in order.chunks_mut(INSERTION_RUN) {
        insertion_sort(run, &mut compare);
    }

    let mut buffer = order.clone();
    let mut width = INSERTION_RUN;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(&order[start..mid], &order[mid..end], &mut buffer[start..end], &mut compare);
            start = end;
        }
        std::mem::swap(&mut order, &mut buffer);
        width *= 2;
    }

    order
}

fn insertion_sort<F>(run: &mut [usize], compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    for i in 1..run.len() {
        let key = run[i];
        let mut j = i;

        while j > 0 && compare(run[j - 1], key) == Ordering::Greater {
            run[j] = run[j - 1];
            j -= 1;
        }

        run[j] = key;
    }
}

fn merge<F>(left: &[usize], right: &[usize], output: &mut [usize], compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut i = 0;
    let mut j = 0;

    for slot in output.iter_mut() {
        // Left wins ties to keep the sort stable
        let take_left = j >= right.len()
            || (i < left.len() && compare(left[i], right[j]) != Ordering::Greater);
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}

/// Reorder `items` so position `i` holds the item previously at `order[i]`
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != start {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}
