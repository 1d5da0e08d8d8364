use crate::{Error, PixelFormat, planes::split_planes};

/// Geometry of a single plane inside a [`PlanarLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Bytes between the start of two consecutive rows
    pub stride: usize,
    /// Samples per row which are backed by memory
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl PlaneLayout {
    pub fn size(&self) -> usize {
        self.stride * self.height
    }
}

/// Positions of all planes of an image stored back to back in one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarLayout {
    planes: Vec<PlaneLayout>,
    len: usize,
}

impl PlanarLayout {
    /// Layout a JPEG codec decodes into: dimensions are padded to whole sub sampling blocks and every row is
    /// padded to `align` bytes
    pub fn packed(
        format: PixelFormat,
        width: usize,
        height: usize,
        align: usize,
    ) -> Result<Self, Error> {
        let sub = format.subsampling();

        let width = width
            .checked_next_multiple_of(sub.horizontal_factor())
            .ok_or(Error::Overflow { what: "plane width" })?;
        let height = height
            .checked_next_multiple_of(sub.vertical_factor())
            .ok_or(Error::Overflow {
                what: "plane height",
            })?;

        Self::build(format, width, height, align)
    }

    /// Layout of a frame of exactly `width` x `height` pixels with every row padded to `align` bytes
    pub fn aligned(
        format: PixelFormat,
        width: usize,
        height: usize,
        align: usize,
    ) -> Result<Self, Error> {
        Self::build(format, width, height, align)
    }

    fn build(format: PixelFormat, width: usize, height: usize, align: usize) -> Result<Self, Error> {
        let align = align.max(1);
        let mut len: usize = 0;

        let planes = format
            .plane_desc()
            .iter()
            .map(|desc| {
                let plane_width = desc.width(width);
                let stride = plane_width
                    .checked_next_multiple_of(align)
                    .ok_or(Error::Overflow { what: "stride" })?;
                let plane = PlaneLayout {
                    stride,
                    width: plane_width,
                    height: desc.height(height),
                };

                len = stride
                    .checked_mul(plane.height)
                    .and_then(|size| size.checked_add(len))
                    .ok_or(Error::Overflow { what: "image" })?;

                Ok(plane)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self { planes, len })
    }

    pub fn planes(&self) -> &[PlaneLayout] {
        &self.planes
    }

    /// # Panics
    ///
    /// If `plane` is out of range
    pub fn plane(&self, plane: usize) -> &PlaneLayout {
        &self.planes[plane]
    }

    pub fn strides(&self) -> impl Iterator<Item = usize> + '_ {
        self.planes.iter().map(|plane| plane.stride)
    }

    /// Size in bytes of the whole buffer
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Split `buf` into its planes
    ///
    /// # Panics
    ///
    /// If `buf` is shorter than [`PlanarLayout::len`]
    pub fn split<'a>(&self, buf: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        split_planes(&self.planes, buf)
    }

    /// Split `buf` into its mutable planes
    ///
    /// # Panics
    ///
    /// If `buf` is shorter than [`PlanarLayout::len`]
    pub fn split_mut<'a>(&self, buf: &'a mut [u8]) -> impl Iterator<Item = &'a mut [u8]> + use<'a> {
        split_planes(&self.planes, buf)
    }
}
