use crate::{
    Error, ImageError, ImageMut, ImageRef, PixelFormat, PlanarLayout, util::alloc_zeroed,
};

/// A planar image owning all of its planes in one buffer
///
/// The width and height are the logical image dimensions. The [`PlanarLayout`] may describe more memory than that,
/// a decoded JPEG keeps the codec's padding to whole sub sampling blocks.
#[derive(Debug, Clone)]
pub struct Image {
    format: PixelFormat,
    width: usize,
    height: usize,
    buffer: Vec<u8>,
    layout: PlanarLayout,
}

impl Image {
    /// Allocate a zeroed image with every row padded to `align` bytes
    pub fn blank(
        format: PixelFormat,
        width: usize,
        height: usize,
        align: usize,
    ) -> Result<Self, Error> {
        let layout = PlanarLayout::aligned(format, width, height, align)?;
        let buffer = alloc_zeroed(layout.len(), "image")?;

        Ok(Self::from_buffer(format, width, height, buffer, layout)?)
    }

    pub fn from_buffer(
        format: PixelFormat,
        width: usize,
        height: usize,
        buffer: Vec<u8>,
        layout: PlanarLayout,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions);
        }

        if buffer.len() < layout.len() {
            return Err(ImageError::BufferSize {
                needed: layout.len(),
                len: buffer.len(),
            });
        }

        let fits = layout.planes().len() == format.num_planes()
            && layout.planes().iter().enumerate().all(|(i, plane)| {
                plane.width >= format.plane_width(i, width)
                    && plane.height >= format.plane_height(i, height)
            });

        if !fits {
            return Err(ImageError::LayoutMismatch {
                format,
                width,
                height,
            });
        }

        let this = Self {
            format,
            width,
            height,
            buffer,
            layout,
        };

        format.bounds_check(this.planes(), width, height)?;

        Ok(this)
    }

    pub fn layout(&self) -> &PlanarLayout {
        &self.layout
    }

    /// View of a single plane
    ///
    /// # Panics
    ///
    /// If `plane` is not smaller than [`PixelFormat::num_planes`]
    pub fn plane(&self, plane: usize) -> Plane<'_> {
        let data = self
            .layout
            .split(&self.buffer)
            .nth(plane)
            .expect("plane index out of range");

        Plane {
            data,
            stride: self.layout.plane(plane).stride,
            width: self.format.plane_width(plane, self.width),
            height: self.format.plane_height(plane, self.height),
        }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

impl ImageRef for Image {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn planes(&self) -> Box<dyn Iterator<Item = (&[u8], usize)> + '_> {
        Box::new(self.layout.split(&self.buffer).zip(self.layout.strides()))
    }
}

impl ImageMut for Image {
    fn planes_mut(&mut self) -> Box<dyn Iterator<Item = (&mut [u8], usize)> + '_> {
        Box::new(
            self.layout
                .split_mut(&mut self.buffer)
                .zip(self.layout.strides()),
        )
    }
}

/// Read only view of one plane
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    /// Bytes between the start of two consecutive rows
    pub stride: usize,
    /// Logical width in samples
    pub width: usize,
    /// Logical height in rows
    pub height: usize,
}

impl<'a> Plane<'a> {
    /// The logical samples of row `y`
    ///
    /// # Panics
    ///
    /// If `y` is out of range
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of range");

        &self.data[y * self.stride..][..self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        let (stride, width) = (self.stride, self.width);

        self.data
            .chunks(stride)
            .take(self.height)
            .map(move |row| &row[..width])
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.row(y)[x]
    }
}
