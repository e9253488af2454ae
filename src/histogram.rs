use crate::constants::HISTOGRAM_LEVELS;

/// Smallest clip level, so a nearly black image does not blow up the scale.
const MIN_CLIP: f64 = 10.0;

/// Counts pixels per luma value (ITU-R 601 weights).
pub fn luminance_histogram<I>(pixels: I) -> [u32; HISTOGRAM_LEVELS]
where
    I: IntoIterator<Item = (u8, u8, u8)>,
{
    let mut bins = [0u32; HISTOGRAM_LEVELS];
    for (r, g, b) in pixels {
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        bins[luma as usize] += 1;
    }
    bins
}

/// Count above which bins are clipped: the last of 25 quantile cut points
/// of the bin counts, at least `MIN_CLIP`.
pub fn clip_level(bins: &[u32]) -> f64 {
    if bins.is_empty() {
        return MIN_CLIP;
    }
    let mut sorted: Vec<u32> = bins.to_vec();
    sorted.sort_unstable();
    let n = 25;
    let m = sorted.len() + 1;
    let i = n - 1;
    let j = (i * m / n).clamp(1, sorted.len().saturating_sub(1).max(1));
    let delta = (i * m - j * n) as f64;
    let quantile = match sorted.len() {
        1 => sorted[0] as f64,
        _ => (sorted[j - 1] as f64 * (n as f64 - delta) + sorted[j] as f64 * delta) / n as f64,
    };
    quantile.max(MIN_CLIP)
}

/// Heights of the histogram bars when drawn `max_height` pixels tall.
pub fn bar_heights(bins: &[u32], max_height: i32) -> Vec<i32> {
    let clip = clip_level(bins);
    let scale = max_height as f64 / clip;
    bins.iter()
        .map(|&count| (scale * (count as f64).min(clip)).round() as i32)
        .collect()
}
