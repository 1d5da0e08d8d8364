use crate::Error;

pub(crate) enum ArrayIter<T> {
    One(std::array::IntoIter<T, 1>),
    Thr(std::array::IntoIter<T, 3>),
}

impl<T> From<[T; 1]> for ArrayIter<T> {
    fn from(value: [T; 1]) -> Self {
        Self::One(value.into_iter())
    }
}

impl<T> From<[T; 3]> for ArrayIter<T> {
    fn from(value: [T; 3]) -> Self {
        Self::Thr(value.into_iter())
    }
}

impl<S> Iterator for ArrayIter<S> {
    type Item = S;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ArrayIter::One(iter) => iter.next(),
            ArrayIter::Thr(iter) => iter.next(),
        }
    }
}

/// Allocate a zeroed buffer, reporting memory exhaustion instead of aborting
pub(crate) fn alloc_zeroed(len: usize, what: &'static str) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();

    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { what, bytes: len })?;
    buf.resize(len, 0);

    Ok(buf)
}
