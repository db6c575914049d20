use ndarray::{ArrayBase, Data, Dimension, IntoDimension, Ix};

/// Asserts the approximate equality of two similarities or containers of similarities.
///
/// # Examples
///
/// Single similarities:
///
/// ```
/// use test_utils::assert_approx_eq;
/// assert_approx_eq!(f32, 1. - 2. / 3., 1. / 3., epsilon = 1e-6);
/// ```
///
/// Nested sequences, compared element by element in logical order:
///
/// ```
/// use test_utils::assert_approx_eq;
/// assert_approx_eq!(f32, &[[1., 0.5], [0., 0.25]], vec![[1., 0.5], [0., 0.25]]);
/// ```
///
/// Or similarity tensors and their views:
///
/// ```
/// use ndarray::{arr1, arr3, s};
/// use test_utils::assert_approx_eq;
/// let tensor = arr3(&[[[1.], [0.5]], [[0.], [0.25]]]);
/// assert_approx_eq!(f32, tensor.slice(s![.., 1, 0]), arr1(&[0.5, 0.25]));
/// ```
///
/// The `ulps` default to `2` and the `epsilon` defaults to `0` if not specified.
///
/// Two `NaN` values are treated as equal, a failed cell of a similarity tensor is expected to be
/// `NaN`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($t:ty, $left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, ulps = $ulps:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = $ulps)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = $epsilon, ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr, ulps = $ulps:expr $(,)?) => {{
        let epsilon = $epsilon;
        let ulps = $ulps;
        let left = $left;
        let right = $right;
        let mut left_iter = $crate::ApproxEqIter::indexed_iter_logical_order(&left, Vec::new());
        let mut right_iter = $crate::ApproxEqIter::indexed_iter_logical_order(&right, Vec::new());
        loop {
            match (left_iter.next(), right_iter.next()) {
                (Some((left_index, left_value)), Some((right_index, right_value))) => {
                    std::assert_eq!(
                        left_index, right_index,
                        "shapes differ in logical order: {:?} != {:?}",
                        left_index, right_index,
                    );
                    if !(left_value.is_nan() && right_value.is_nan()) {
                        std::assert!(
                            $crate::approx_eq!(
                                $t,
                                left_value,
                                right_value,
                                ulps = ulps,
                                epsilon = epsilon
                            ),
                            "approximate equality failed (ulps={:?}, epsilon={:?}) at index {:?}: {:?} != {:?}",
                            ulps,
                            epsilon,
                            left_index,
                            left_value,
                            right_value,
                        );
                    }
                }
                (Some((index, _)), None) => {
                    std::panic!("left input is longer, starting at index {:?}", index);
                }
                (None, Some((index, _))) => {
                    std::panic!("right input is longer, starting at index {:?}", index);
                }
                (None, None) => break,
            }
        }
    }};
}

/// Flattens a similarity or a container of similarities for [`assert_approx_eq!`].
///
/// Implemented on `&`-references of the compared things, leaf values yield themselves at the
/// index prefix, sequential containers extend the prefix by the index of each element.
pub trait ApproxEqIter<'a>: Copy {
    /// The leaf element, e.g. `f32`.
    type LeafElement;

    /// Iterates over all leaf elements together with their full index.
    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a>;
}

impl<'a> ApproxEqIter<'a> for &'a f32 {
    type LeafElement = f32;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        Box::new(std::iter::once((index_prefix, *self)))
    }
}

impl<'a, T> ApproxEqIter<'a> for &'a &'a T
where
    &'a T: ApproxEqIter<'a>,
    T: 'a + ?Sized,
{
    type LeafElement = <&'a T as ApproxEqIter<'a>>::LeafElement;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        (*self).indexed_iter_logical_order(index_prefix)
    }
}

impl<'a, T: 'a> ApproxEqIter<'a> for &'a [T]
where
    &'a T: ApproxEqIter<'a>,
{
    type LeafElement = <&'a T as ApproxEqIter<'a>>::LeafElement;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        Box::new(self.iter().enumerate().flat_map(move |(index, element)| {
            let mut prefix = index_prefix.clone();
            prefix.push(index);
            element.indexed_iter_logical_order(prefix)
        }))
    }
}

impl<'a, T, const N: usize> ApproxEqIter<'a> for &'a [T; N]
where
    &'a T: ApproxEqIter<'a>,
{
    type LeafElement = <&'a T as ApproxEqIter<'a>>::LeafElement;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        self.as_ref().indexed_iter_logical_order(index_prefix)
    }
}

impl<'a, T: 'a> ApproxEqIter<'a> for &'a Vec<T>
where
    &'a T: ApproxEqIter<'a>,
{
    type LeafElement = <&'a T as ApproxEqIter<'a>>::LeafElement;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        self.as_slice().indexed_iter_logical_order(index_prefix)
    }
}

impl<'a, S, D> ApproxEqIter<'a> for &'a ArrayBase<S, D>
where
    S: Data,
    S::Elem: Copy,
    &'a S::Elem: ApproxEqIter<'a>,
    D: Dimension,
{
    type LeafElement = S::Elem;

    fn indexed_iter_logical_order(
        self,
        index_prefix: Vec<Ix>,
    ) -> Box<dyn Iterator<Item = (Vec<Ix>, Self::LeafElement)> + 'a> {
        Box::new(self.indexed_iter().map(move |(index, element)| {
            let mut prefix = index_prefix.clone();
            prefix.extend(index.into_dimension().as_array_view().iter());
            (prefix, *element)
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::panic::catch_unwind;

    use ndarray::{arr1, arr2, arr3, s};

    #[test]
    fn test_similarities() {
        assert_approx_eq!(f32, 1. - 2. / 3., 1. / 3., epsilon = 1e-6);
        assert_approx_eq!(f32, 0.15039155, 0.1503916, ulps = 3);
        catch_unwind(|| assert_approx_eq!(f32, 0.15039155, 0.1503916, ulps = 2)).unwrap_err();
    }

    #[test]
    fn test_epsilon() {
        assert_approx_eq!(f32, 0.5, 0.625, epsilon = 0.125);
    }

    #[test]
    #[should_panic(expected = "at index []")]
    fn test_epsilon_exceeded() {
        assert_approx_eq!(f32, 0.5, 0.75, epsilon = 0.125);
    }

    #[test]
    fn test_sequences() {
        assert_approx_eq!(f32, [1., 0.5], vec![1., 0.5]);
        assert_approx_eq!(f32, &[1., 0.5], arr1(&[1., 0.5]));
        assert_approx_eq!(f32, &[[1., 0.5], [0., 0.25]], arr2(&[[1., 0.5], [0., 0.25]]));
    }

    #[test]
    fn test_views() {
        let tensor = arr3(&[[[1.], [0.5]], [[0.], [0.25]]]);
        assert_approx_eq!(f32, tensor.slice(s![.., 1, 0]), [0.5, 0.25]);
        assert_approx_eq!(f32, tensor.slice(s![0, .., ..]), [[1.], [0.5]]);
    }

    #[test]
    fn test_failed_cells() {
        assert_approx_eq!(f32, [1., f32::NAN, 0.], [1., f32::NAN, 0.]);
    }

    #[test]
    #[should_panic(expected = "at index [1]")]
    fn test_failed_cell_differs() {
        assert_approx_eq!(f32, [1., f32::NAN, 0.], [1., 0.5, 0.]);
    }

    #[test]
    #[should_panic(expected = "at index [0, 1, 0]")]
    fn test_tensor_differs() {
        assert_approx_eq!(
            f32,
            &[[[1.], [0.5]]],
            arr3(&[[[1.], [0.75]]]),
        );
    }

    #[test]
    #[should_panic(expected = "right input is longer, starting at index [0, 2]")]
    fn test_shape_differs() {
        assert_approx_eq!(f32, &[[1., 0.5]], &[[1., 0.5, 0.]]);
    }
}
