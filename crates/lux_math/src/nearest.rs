/// Position of the value closest to `target`.
///
/// Scans left to right and keeps the first minimum, so ties resolve to the
/// lowest index. Values that compare as NaN are never selected. Returns
/// `None` for an empty slice.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, &value) in values.iter().enumerate() {
        let distance = (value - target).abs();
        if distance.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((i, distance));
        }
    }

    best.map(|(i, _)| i)
}
