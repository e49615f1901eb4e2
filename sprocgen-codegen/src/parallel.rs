//! Per-table fan-out over scoped worker threads

use std::thread;

/// Apply `f` to every item using up to `jobs` threads
///
/// Items are split into contiguous chunks, one per worker, and the chunk results
/// are concatenated in input order, so the output never depends on completion order.
pub(crate) fn map_ordered<T, R, F>(items: &[T], jobs: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if jobs <= 1 || items.len() <= 1 {
        return items.iter().map(&f).collect();
    }

    let chunk_size = items.len().div_ceil(jobs);
    let f = &f;

    thread::scope(|scope| {
        let handles: Vec<_> = items
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(f).collect::<Vec<R>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_sequential() {
        let items: Vec<u32> = (0..37).collect();
        let sequential = map_ordered(&items, 1, |n| n * 2);
        let parallel = map_ordered(&items, 4, |n| n * 2);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel[36], 72);
    }

    #[test]
    fn test_more_jobs_than_items() {
        let items = vec!["a", "b"];
        assert_eq!(map_ordered(&items, 16, |s| s.to_uppercase()), vec!["A", "B"]);
        let empty: Vec<u8> = Vec::new();
        assert!(map_ordered(&empty, 4, |n| *n).is_empty());
    }
}
