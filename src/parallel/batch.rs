//! Run-index batches for sweeps that report progress between chunks.

/// Split run indices `0..runs` into at most `batches` contiguous `[start, end)` ranges.
/// Sizes differ by at most one; earlier batches take the extra runs.
///
/// # Example
/// ```
/// # use hiresim::parallel::batch_ranges;
/// // Seven runs reported in three chunks.
/// assert_eq!(batch_ranges(7, 3), vec![(0, 3), (3, 5), (5, 7)]);
/// ```
pub fn batch_ranges(runs: usize, batches: usize) -> Vec<(usize, usize)> {
    let batches = batches.min(runs);
    if batches == 0 {
        return Vec::new();
    }
    let (per_batch, extra) = (runs / batches, runs % batches);
    (0..batches)
        .scan(0, |start, batch| {
            let end = *start + per_batch + usize::from(batch < extra);
            let range = (*start, end);
            *start = end;
            Some(range)
        })
        .collect()
}
