use crate::{
    Error, FrameRate, Image, ImageMut, ImageRef, PixelFormat, PlanarLayout, image::Plane,
    util::alloc_zeroed,
};

/// Range of the sample values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRange {
    /// 0 - 255
    Full,
    /// Y 16 - 235, U & V 16 - 240
    Limited,
}

/// Metadata handed to the host together with the pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameProps {
    pub color_range: Option<ColorRange>,
    pub frame_rate: FrameRate,
}

/// Output frame consumed by the host video pipeline
#[derive(Debug, Clone)]
pub struct Frame {
    image: Image,
    props: FrameProps,
}

impl Frame {
    /// Wrap an image, the frame has no properties set
    pub fn new(image: Image) -> Self {
        Self {
            image,
            props: FrameProps::default(),
        }
    }

    /// Allocate a zeroed frame with the given layout
    pub fn with_layout(
        format: PixelFormat,
        width: usize,
        height: usize,
        layout: PlanarLayout,
    ) -> Result<Self, Error> {
        let buffer = alloc_zeroed(layout.len(), "frame")?;
        let image = Image::from_buffer(format, width, height, buffer, layout)?;

        Ok(Self::new(image))
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn layout(&self) -> &PlanarLayout {
        self.image.layout()
    }

    /// # Panics
    ///
    /// If `plane` is not smaller than [`PixelFormat::num_planes`]
    pub fn plane(&self, plane: usize) -> Plane<'_> {
        self.image.plane(plane)
    }

    /// # Panics
    ///
    /// If `plane` is not smaller than [`PixelFormat::num_planes`]
    pub fn stride(&self, plane: usize) -> usize {
        self.layout().plane(plane).stride
    }

    pub fn props(&self) -> &FrameProps {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut FrameProps {
        &mut self.props
    }

    /// Tag the frame as holding full range samples, which is what JPEG decodes to
    pub fn mark_full_range(&mut self) {
        self.props.color_range = Some(ColorRange::Full);
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        self.image.buffer_mut()
    }
}

impl ImageRef for Frame {
    fn format(&self) -> PixelFormat {
        self.image.format()
    }

    fn width(&self) -> usize {
        self.image.width()
    }

    fn height(&self) -> usize {
        self.image.height()
    }

    fn planes(&self) -> Box<dyn Iterator<Item = (&[u8], usize)> + '_> {
        self.image.planes()
    }
}

impl ImageMut for Frame {
    fn planes_mut(&mut self) -> Box<dyn Iterator<Item = (&mut [u8], usize)> + '_> {
        self.image.planes_mut()
    }
}

/// Allocates the frames handed to the host
pub trait FrameAllocator: Sync {
    fn new_frame(&self, format: PixelFormat, width: usize, height: usize) -> Result<Frame, Error>;
}

impl<A: FrameAllocator + ?Sized> FrameAllocator for &A {
    fn new_frame(&self, format: PixelFormat, width: usize, height: usize) -> Result<Frame, Error> {
        (**self).new_frame(format, width, height)
    }
}

/// Allocates contiguous frames with every row padded to `alignment` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedAllocator {
    alignment: usize,
}

impl Default for AlignedAllocator {
    fn default() -> Self {
        Self { alignment: 32 }
    }
}

impl AlignedAllocator {
    /// # Panics
    ///
    /// If `alignment` is not a power of two
    pub fn new(alignment: usize) -> Self {
        assert!(
            alignment.is_power_of_two(),
            "alignment must be a power of two"
        );

        Self { alignment }
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

impl FrameAllocator for AlignedAllocator {
    fn new_frame(&self, format: PixelFormat, width: usize, height: usize) -> Result<Frame, Error> {
        let layout = PlanarLayout::aligned(format, width, height, self.alignment)?;

        Frame::with_layout(format, width, height, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_frames() {
        let allocator = AlignedAllocator::new(32);
        assert_eq!(allocator.alignment(), 32);

        let frame = allocator
            .new_frame(PixelFormat::YUV420, 130, 32)
            .unwrap();

        assert_eq!(frame.stride(0), 160);
        assert_eq!(frame.stride(1), 96);
        assert_eq!(frame.plane(1).width, 65);
        assert_eq!(frame.plane(2).height, 16);
        assert_eq!(frame.props().color_range, None);
    }

    #[test]
    fn zero_sized_frames_are_rejected() {
        let err = AlignedAllocator::default()
            .new_frame(PixelFormat::Gray8, 0, 16)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn full_range_tag() {
        let mut frame = AlignedAllocator::default()
            .new_frame(PixelFormat::RGB24, 4, 4)
            .unwrap();
        frame.mark_full_range();

        assert_eq!(frame.props().color_range, Some(ColorRange::Full));
        assert_eq!(frame.props().frame_rate, FrameRate::default());
        assert_eq!(frame.image().width(), 4);

        let image = frame.into_image();
        assert_eq!(image.format(), PixelFormat::RGB24);
        assert_eq!(image.layout().len(), 3 * 32 * 4);
    }
}
