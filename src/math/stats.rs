//! Numeric primitives shared by scaling and motion summaries.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (denominator n).
pub fn std_dev(values: &[f64], mean_val: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values
        .iter()
        .map(|v| (v - mean_val) * (v - mean_val))
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}

pub fn l2_norm(components: &[f64]) -> f64 {
    components.iter().map(|c| c * c).sum::<f64>().sqrt()
}

/// Differences against the previous element with an implicit leading 0,
/// so the output has the same length as the input.
pub fn diff_from_zero(values: &[f64]) -> Vec<f64> {
    let mut prev = 0.0;
    values
        .iter()
        .map(|&v| {
            let d = v - prev;
            prev = v;
            d
        })
        .collect()
}

/// `count / total * 100`, 0 for an empty total.
pub fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}
