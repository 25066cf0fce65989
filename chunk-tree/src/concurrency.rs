use futures::stream::{self, StreamExt};
use std::future::Future;

/// Runs `f` over `items` with at most `limit` instances in flight at once,
/// returning results in the *original* input order regardless of which
/// instance happened to finish first. Completion order is irrelevant here
/// because the only thing callers do with the result is place each
/// address back into its original input slot — which is exactly what
/// tagging each future with its index and sorting afterwards gives for
/// free, without hand-rolling a semaphore.
pub async fn bounded_ordered_map<T, F, Fut, R>(items: Vec<T>, limit: usize, f: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let limit = limit.max(1);

    let mut tagged: Vec<(usize, R)> = stream::iter(items.into_iter().enumerate())
        .map(|(i, item)| {
            let fut = f(item);
            async move { (i, fut.await) }
        })
        .buffer_unordered(limit)
        .collect()
        .await;

    tagged.sort_by_key(|(i, _)| *i);
    tagged.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn preserves_input_order_despite_reversed_completion() {
        // Item 0 finishes last, item N-1 finishes first — order must still
        // come back as 0, 1, 2, ... to exercise the "placed back into
        // original input slots" guarantee.
        let items: Vec<usize> = (0..5).collect();
        let results = bounded_ordered_map(items, 5, |i| async move {
            tokio::time::sleep(std::time::Duration::from_millis((5 - i as u64) * 2)).await;
            i * 10
        })
        .await;

        assert_eq!(results, vec![0, 10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn never_exceeds_the_concurrency_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..20).collect();
        bounded_ordered_map(items, 3, |_| {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(max_seen.load(Ordering::SeqCst) <= 3);
    }
}
