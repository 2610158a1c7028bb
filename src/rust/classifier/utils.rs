use ndarray::Array1;

pub(crate) fn normalize_l2(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn normalize_l1(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|x| x.abs()).sum();
    if norm > 1e-12 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

/// Logistic function, split on sign so neither branch overflows `exp`.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_l2_unit_length() {
        let v = normalize_l2(&array![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-12);
        assert!((v[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vectors_stay_zero() {
        assert_eq!(normalize_l2(&Array1::zeros(3)), Array1::<f64>::zeros(3));
        assert_eq!(normalize_l1(&Array1::zeros(3)), Array1::<f64>::zeros(3));
    }

    #[test]
    fn test_normalize_l1_sums_to_one() {
        let v = normalize_l1(&array![1.0, -3.0]);
        assert!((v[0] - 0.25).abs() < 1e-12);
        assert!((v[1] + 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }
}
