// THEORY:
// The row executor is the only place in the crate that creates threads for image
// work. It splits an image's rows into contiguous, non-overlapping ranges and runs
// one range per worker.
//
// Key architectural principles:
// 1.  **Pure Partition**: `partition` depends only on `(total_rows, thread_count)`.
//     Every pixel's value depends only on its coordinates and the read-only source,
//     so output is bit-identical whatever the worker count or finishing order.
// 2.  **Disjoint Ownership**: Workers are not given indices into a shared buffer;
//     they are given the `&mut` slice that holds exactly their rows. A transform
//     cannot write outside its assigned rows because it has no reference to them.
// 3.  **Pool Per Call**: A pool of exactly `thread_count` threads is built for each
//     call. `scope` is the join barrier for the row tasks, and `build_scoped` joins
//     the pool's threads themselves, so none outlive the call.

use log::warn;
use std::ops::Range;

/// Splits `[0, total_rows)` into at most `thread_count` contiguous chunks of
/// `ceil(total_rows / thread_count)` rows. The last chunk may be shorter.
pub fn partition(total_rows: usize, thread_count: usize) -> Vec<Range<usize>> {
    if total_rows == 0 {
        return Vec::new();
    }
    let threads = thread_count.max(1);
    let chunk_size = total_rows.div_ceil(threads);

    (0..threads)
        .map(|i| i * chunk_size)
        .take_while(|&start| start < total_rows)
        .map(|start| start..(start + chunk_size).min(total_rows))
        .collect()
}

/// Runs `action(row_range, rows)` over every chunk of `partition(total_rows, thread_count)`,
/// where `total_rows = rows.len() / row_len` and `rows` is the matching sub-slice of
/// the destination. Blocks until every chunk is done.
pub fn run<T, F>(rows: &mut [T], row_len: usize, thread_count: usize, action: F)
where
    T: Send,
    F: Fn(Range<usize>, &mut [T]) + Sync,
{
    if row_len == 0 || rows.is_empty() {
        return;
    }
    debug_assert_eq!(rows.len() % row_len, 0, "destination is not row aligned");
    let total_rows = rows.len() / row_len;

    if thread_count <= 1 {
        action(0..total_rows, rows);
        return;
    }

    let ranges = partition(total_rows, thread_count);
    let chunk_len = ranges[0].len() * row_len;

    let scoped = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|i| format!("row-worker-{i}"))
        .build_scoped(
            |worker| worker.run(),
            |pool| {
                let action = &action;
                pool.scope(|scope| {
                    for (range, chunk) in ranges.iter().cloned().zip(rows.chunks_mut(chunk_len)) {
                        scope.spawn(move |_| action(range, chunk));
                    }
                });
            },
        );

    if let Err(e) = scoped {
        warn!("could not build a {thread_count}-thread pool ({e}); running rows sequentially");
        for (range, chunk) in ranges.into_iter().zip(rows.chunks_mut(chunk_len)) {
            action(range, chunk);
        }
    }
}
