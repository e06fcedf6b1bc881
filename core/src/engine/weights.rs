/// Rescales sibling weights so they sum to 100.
///
/// Non-finite and negative weights count as 0. When everything is 0 the
/// siblings share equally; an empty slice yields an empty result.
pub fn normalize(weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let cleaned: Vec<f64> = weights.iter().map(|w| sanitize(*w)).collect();
    let total: f64 = cleaned.iter().sum();

    if total <= 0.0 || !total.is_finite() {
        let equal = 100.0 / cleaned.len() as f64;
        return vec![equal; cleaned.len()];
    }

    cleaned.iter().map(|w| w / total * 100.0).collect()
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
