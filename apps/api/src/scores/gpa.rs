/// Arithmetic mean of the given scores on the 0-100 scale, clamped to
/// [0, 100] and rounded to two decimals. `None` when no scores are given.
pub fn compute_gpa<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = i32>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), s| (sum + i64::from(s), count + 1));

    if count == 0 {
        return None;
    }

    let mean = (sum as f64 / f64::from(count)).clamp(0.0, 100.0);
    Some(round2(mean))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
