//! Visualizer reducer: raw frequency bins to normalized bars

/// Largest magnitude an analyzer bin can hold
const MAX_MAGNITUDE: f32 = 255.0;

/// Reduce raw frequency bins to `bar_count` magnitudes in `[0, 1]`
///
/// The bins are split into `bar_count` contiguous chunks of
/// `len / bar_count` bins (the remainder at the tail is dropped) and each bar
/// is the mean of its chunk over 255. Absent or empty input gives all zeros.
/// With fewer bins than bars, bar `i` reads the single bin at
/// `i * len / bar_count`.
pub fn reduce(raw: Option<&[u8]>, bar_count: usize) -> Vec<f32> {
    let raw = match raw {
        Some(bins) if !bins.is_empty() => bins,
        _ => return vec![0.0; bar_count],
    };

    let points_per_bar = raw.len() / bar_count.max(1);
    if points_per_bar == 0 {
        return (0..bar_count)
            .map(|i| f32::from(raw[i * raw.len() / bar_count]) / MAX_MAGNITUDE)
            .collect();
    }

    raw.chunks_exact(points_per_bar)
        .take(bar_count)
        .map(|chunk| {
            let sum: u32 = chunk.iter().map(|&b| u32::from(b)).sum();
            sum as f32 / points_per_bar as f32 / MAX_MAGNITUDE
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_input_gives_zeros() {
        assert_eq!(reduce(None, 4), vec![0.0; 4]);
        assert_eq!(reduce(Some(&[]), 3), vec![0.0; 3]);
    }

    #[test]
    fn chunks_are_averaged() {
        let raw = [0, 255, 255, 255, 51, 51];
        let bars = reduce(Some(&raw), 3);
        assert_eq!(bars, vec![0.5, 1.0, 0.2]);
    }

    #[test]
    fn remainder_is_dropped() {
        // 7 bins over 3 bars: 2 per bar, last bin ignored
        let raw = [255, 255, 0, 0, 255, 255, 255];
        assert_eq!(reduce(Some(&raw), 3), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn fewer_bins_than_bars_repeats_bins() {
        let raw = [0, 255];
        assert_eq!(reduce(Some(&raw), 4), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_bars_is_empty() {
        assert!(reduce(Some(&[1, 2, 3]), 0).is_empty());
        assert!(reduce(None, 0).is_empty());
    }

    #[test]
    fn default_shape_128_bins_to_64_bars() {
        let raw: Vec<u8> = (0..128).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        let bars = reduce(Some(&raw), 64);
        assert_eq!(bars.len(), 64);
        assert!(bars.iter().all(|b| (b - 0.5).abs() < 1e-6));
    }

    proptest! {
        /// Output length always equals bar count and every bar is in [0, 1]
        #[test]
        fn bars_are_bounded(
            raw in prop::collection::vec(any::<u8>(), 0..1024),
            bar_count in 0usize..200,
        ) {
            let bars = reduce(Some(&raw), bar_count);
            prop_assert_eq!(bars.len(), bar_count);
            prop_assert!(bars.iter().all(|b| (0.0..=1.0).contains(b)));
        }

        /// Reduction is pure: same input, same output
        #[test]
        fn reduction_is_deterministic(
            raw in prop::collection::vec(any::<u8>(), 1..512),
            bar_count in 1usize..100,
        ) {
            prop_assert_eq!(reduce(Some(&raw), bar_count), reduce(Some(&raw), bar_count));
        }
    }
}
