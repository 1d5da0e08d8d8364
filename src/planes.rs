use crate::{layout::PlaneLayout, util::ArrayIter};

#[derive(Debug, thiserror::Error)]
#[error("got invalid number of planes, expected {expected} but got {got}")]
pub struct InvalidNumberOfPlanesError {
    pub expected: usize,
    pub got: usize,
}

/// Split a buffer holding consecutive planes into one slice per plane
///
/// # Panics
///
/// If `buf` is too small for the given planes, or there are neither one nor three planes
pub(crate) fn split_planes<S: AnySlice>(planes: &[PlaneLayout], buf: S) -> ArrayIter<S> {
    if let Ok(planes) = <&[PlaneLayout; 3]>::try_from(planes) {
        ArrayIter::from(split_impl(planes, buf))
    } else if let Ok(planes) = <&[PlaneLayout; 1]>::try_from(planes) {
        ArrayIter::from(split_impl(planes, buf))
    } else {
        unreachable!("planar formats have one or three planes")
    }
}

fn split_impl<const N: usize, S: AnySlice>(planes: &[PlaneLayout; N], mut buf: S) -> [S; N] {
    std::array::from_fn(|i| {
        let (plane, rem) = std::mem::take(&mut buf).slice_split_at(planes[i].size());
        buf = rem;
        plane
    })
}

/// Helper trait implemented on &[T] and &mut [T]
#[diagnostic::on_unimplemented(message = "AnySlice is only implemented for &[T] and &mut [T].\n\
               When using or Vec<T> or similar try .as_slice() or .as_mut_slice()")]
pub trait AnySlice: sealed::Sealed + Default + Sized {
    fn slice_split_at(self, at: usize) -> (Self, Self);
}

mod sealed {
    pub trait Sealed {}
    impl<T> Sealed for &[T] {}
    impl<T> Sealed for &mut [T] {}
}

impl<T> AnySlice for &[T] {
    fn slice_split_at(self, at: usize) -> (Self, Self) {
        self.split_at(at)
    }
}

impl<T> AnySlice for &mut [T] {
    fn slice_split_at(self, at: usize) -> (Self, Self) {
        self.split_at_mut(at)
    }
}
