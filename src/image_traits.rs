use crate::{BoundsCheckError, PixelFormat, image::Plane};

/// Read access to a planar image
///
/// Implementations must return the same values on every call
pub trait ImageRef {
    fn format(&self) -> PixelFormat;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Returns an iterator yielding every plane with their associated stride
    fn planes(&self) -> Box<dyn Iterator<Item = (&[u8], usize)> + '_>;
}

/// Write access to a planar image
pub trait ImageMut: ImageRef {
    /// Returns an iterator yielding every plane with their associated stride
    fn planes_mut(&mut self) -> Box<dyn Iterator<Item = (&mut [u8], usize)> + '_>;
}

/// [`ImageRef`] extension methods
pub trait ImageRefExt: ImageRef {
    /// Perform a bounds check, return an error when it fails
    fn bounds_check(&self) -> Result<(), BoundsCheckError> {
        self.format()
            .bounds_check(self.planes(), self.width(), self.height())
    }

    /// Logical width in samples of the given plane
    fn plane_width(&self, plane: usize) -> usize {
        self.format().plane_width(plane, self.width())
    }

    /// Logical height in rows of the given plane
    fn plane_height(&self, plane: usize) -> usize {
        self.format().plane_height(plane, self.height())
    }

    /// View of a single plane, `None` if the format has no such plane
    fn plane(&self, plane: usize) -> Option<Plane<'_>> {
        if plane >= self.format().num_planes() {
            return None;
        }

        let (data, stride) = self.planes().nth(plane)?;

        Some(Plane {
            data,
            stride,
            width: self.plane_width(plane),
            height: self.plane_height(plane),
        })
    }
}

impl<T: ImageRef + ?Sized> ImageRefExt for T {}

impl<T: ImageRef + ?Sized> ImageRef for &T {
    fn format(&self) -> PixelFormat {
        <T as ImageRef>::format(self)
    }

    fn width(&self) -> usize {
        <T as ImageRef>::width(self)
    }

    fn height(&self) -> usize {
        <T as ImageRef>::height(self)
    }

    fn planes(&self) -> Box<dyn Iterator<Item = (&[u8], usize)> + '_> {
        <T as ImageRef>::planes(self)
    }
}

impl<T: ImageRef + ?Sized> ImageRef for &mut T {
    fn format(&self) -> PixelFormat {
        <T as ImageRef>::format(self)
    }

    fn width(&self) -> usize {
        <T as ImageRef>::width(self)
    }

    fn height(&self) -> usize {
        <T as ImageRef>::height(self)
    }

    fn planes(&self) -> Box<dyn Iterator<Item = (&[u8], usize)> + '_> {
        <T as ImageRef>::planes(self)
    }
}

impl<T: ImageMut + ?Sized> ImageMut for &mut T {
    fn planes_mut(&mut self) -> Box<dyn Iterator<Item = (&mut [u8], usize)> + '_> {
        <T as ImageMut>::planes_mut(self)
    }
}
