/// Computes the arithmetic mean of the values present. Returns 0.0 when none are.
pub fn mean_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
