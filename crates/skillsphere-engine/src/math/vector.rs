use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

use num_traits::Zero;

#[derive(Clone, Debug, PartialEq)]
pub struct Array1<T> {
    data: Vec<T>,
}

impl<T> Array1<T> {
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }
}

impl<T> Array1<T>
where
    T: Clone + Zero,
{
    pub fn zeros(len: usize) -> Self {
        Array1::from_vec(vec![T::zero(); len])
    }
}

impl<T> From<Vec<T>> for Array1<T> {
    fn from(value: Vec<T>) -> Self {
        Array1::from_vec(value)
    }
}

impl<T> From<Array1<T>> for Vec<T> {
    fn from(value: Array1<T>) -> Self {
        value.data
    }
}

impl<T> FromIterator<T> for Array1<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array1::from_vec(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for Array1<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Array1<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Array1<f64> {
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.iter().copied().sum::<f64>() / self.len() as f64)
        }
    }
}

/// Squared Euclidean distance between two equally sized points.
#[inline]
pub fn squared_distance(lhs: &[f64], rhs: &[f64]) -> f64 {
    debug_assert_eq!(lhs.len(), rhs.len(), "points must have equal dimension");
    lhs.iter()
        .zip(rhs.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Index of the closest centroid and the squared distance to it.
///
/// Ties resolve to the lowest centroid index.
pub fn nearest_centroid<'a, I>(point: &[f64], centroids: I) -> (usize, f64)
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.into_iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best.1 {
            best = (idx, d);
        }
    }
    best
}
