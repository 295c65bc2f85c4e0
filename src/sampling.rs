/// Frame indices to decode for a clip with `native_len` frames when the
/// caller asked for `target` frames.
///
/// `target == 0` (or a target equal to the native length) disables
/// resampling and yields every frame in order. A single requested frame
/// picks the clip midpoint. Any other target spreads the indices evenly
/// across `[0, native_len - 1]` inclusive, so the first and last native
/// frames are always part of the sample. Targets larger than the native
/// length repeat indices.
pub fn sample_indices(native_len: usize, target: usize) -> Vec<usize> {
    if native_len == 0 {
        return Vec::new();
    }
    if target == 0 || target == native_len {
        return (0..native_len).collect();
    }
    if target == 1 {
        // Midpoint of the clip, floored to an addressable index.
        return vec![native_len / 2];
    }
    let step = (native_len - 1) as f64 / (target - 1) as f64;
    (0..target).map(|i| (i as f64 * step).round() as usize).collect()
}
