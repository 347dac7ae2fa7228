//! Shared math utilities: normalization and similarity ranking.

/// L2-normalize a vector in place so its magnitude is 1.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// L2-normalize a slice, returning a new vector with unit magnitude.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let mut result = v.to_vec();
    l2_normalize_in_place(&mut result);
    result
}

/// Dot product of two equal-length vectors.
///
/// For unit-normalized inputs this is the cosine similarity, in [-1, 1].
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Indices of the `k` highest scores, in descending score order.
///
/// Exact ties prefer the lower index, so rankings over a fixed label list
/// are deterministic and reproducible across runs. Returns fewer than `k`
/// indices when the input has fewer than `k` entries.
pub fn top_k_indices(scores: &[f32], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(k);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(&[3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let v = l2_normalize(&[0.0, 0.0, 0.0]);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dot_is_cosine_for_unit_vectors() {
        let a = l2_normalize(&[1.0, 0.0]);
        let b = l2_normalize(&[1.0, 1.0]);
        let cos = dot(&a, &b);
        assert!((cos - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_top_k_descending_order() {
        let scores = [0.1, 0.9, 0.5, 0.7];
        assert_eq!(top_k_indices(&scores, 3), vec![1, 3, 2]);
    }

    #[test]
    fn test_top_k_exact_tie_prefers_lower_index() {
        let scores = [0.5, 0.9, 0.9, 0.5];
        assert_eq!(top_k_indices(&scores, 2), vec![1, 2]);
        // Both ties resolved toward the earlier label
        assert_eq!(top_k_indices(&scores, 4), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_top_k_clamps_to_length() {
        let scores = [0.3, 0.2];
        assert_eq!(top_k_indices(&scores, 5), vec![0, 1]);
        assert!(top_k_indices(&[], 2).is_empty());
    }

    #[test]
    fn test_top_k_zero() {
        assert!(top_k_indices(&[0.1, 0.2], 0).is_empty());
    }
}
