//! Fork-join merge sort.
//!
//! With more than one thread available the two halves are sorted on their
//! own scoped threads, each handed half of the budget; below that the
//! recursion stays on the calling thread.

use std::thread;

/// Merge two sorted slices into a new sorted vector.
pub fn merge<T: PartialOrd + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    let (mut l, mut r) = (0, 0);

    while l < left.len() && r < right.len() {
        if left[l] < right[r] {
            result.push(left[l].clone());
            l += 1;
        } else {
            result.push(right[r].clone());
            r += 1;
        }
    }

    result.extend_from_slice(&left[l..]);
    result.extend_from_slice(&right[r..]);
    result
}

/// Return a sorted copy of `values`, splitting work over up to `threads`
/// threads.
pub fn merge_sort<T>(values: &[T], threads: usize) -> Vec<T>
where
    T: PartialOrd + Clone + Send + Sync,
{
    if values.len() <= 1 {
        return values.to_vec();
    }

    let (left, right) = values.split_at(values.len() / 2);

    let (left, right) = if threads > 1 {
        let half = threads / 2;
        thread::scope(|s| {
            let l = s.spawn(|| merge_sort(left, half));
            let r = s.spawn(|| merge_sort(right, half));
            (join(l), join(r))
        })
    } else {
        (merge_sort(left, 1), merge_sort(right, 1))
    };

    merge(&left, &right)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, Vec<T>>) -> Vec<T> {
    match handle.join() {
        Ok(sorted) => sorted,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// Whether `values` is in non-decreasing order.
pub fn is_sorted<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
