use ndarray::{ArrayBase, Data, Ix1};

/// Computes the l2 norm (euclidean metric) of a vector.
///
/// # Panics
/// Panics if the vector doesn't consist solely of real values.
pub fn l2_norm<S>(a: &ArrayBase<S, Ix1>) -> f32
where
    S: Data<Elem = f32>,
{
    let norm = a.dot(a).sqrt();
    assert!(
        norm.is_finite(),
        "vector must consist of real values only, but got:\n{:?}",
        a,
    );

    norm
}

/// Computes the cosine similarity of two vectors.
///
/// The similarity with a zero vector is zero.
///
/// # Panics
/// Panics if the vectors don't consist solely of real values or their shapes don't match.
pub fn cosine_similarity<S, T>(a: &ArrayBase<S, Ix1>, b: &ArrayBase<T, Ix1>) -> f32
where
    S: Data<Elem = f32>,
    T: Data<Elem = f32>,
{
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    (norm_a != 0. && norm_b != 0.)
        .then(|| a.dot(b) / norm_a / norm_b)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use ndarray::arr1;

    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_l2_norm() {
        assert_approx_eq!(f32, l2_norm(&arr1(&[1., 2., 3.])), 3.7416575);
    }

    #[test]
    #[should_panic(expected = "vector must consist of real values only, but got")]
    fn test_l2_norm_nan() {
        l2_norm(&arr1(&[1., f32::NAN, 3.]));
    }

    #[test]
    fn test_cosine_similarity() {
        let a = arr1(&[1., 2., 3.]);
        let b = arr1(&[4., 5., 6.]);
        assert_approx_eq!(f32, cosine_similarity(&a, &b), 0.97463185);
    }

    #[test]
    fn test_cosine_similarity_of_binary_vectors() {
        let a = arr1(&[1., 1., 0.]);
        let b = arr1(&[0., 1., 1.]);
        assert_approx_eq!(f32, cosine_similarity(&a, &b), 0.5);
        assert_approx_eq!(f32, cosine_similarity(&a, &a.view()), 1.);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = arr1(&[0., 0.]);
        let b = arr1(&[1., 0.]);
        assert_approx_eq!(f32, cosine_similarity(&a, &b), 0.);
    }
}
