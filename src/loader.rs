use crate::{
    Error, Frame, Image, ImageMut, ImageRef, PixelFormat, PlanarLayout,
    codec::{JpegCodec, JpegHeader},
    copy::copy,
    util::alloc_zeroed,
};

/// Header facts of one JPEG, enough to validate a stitch before decoding any pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub header: JpegHeader,
    pub format: PixelFormat,
}

impl ImageInfo {
    /// Width and height truncated to the format's sub sampling
    pub fn truncated(&self) -> (usize, usize) {
        self.format.truncate(self.header.width, self.header.height)
    }

    pub fn width(&self) -> usize {
        self.header.width
    }

    pub fn height(&self) -> usize {
        self.header.height
    }
}

/// Decodes single JPEG images into planar buffers
pub struct Loader<C> {
    codec: C,
    alignment: usize,
}

impl<C: JpegCodec> Loader<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            alignment: 1,
        }
    }

    /// Row alignment of the buffers the codec decodes into
    ///
    /// # Panics
    ///
    /// If `alignment` is not a power of two
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        assert!(
            alignment.is_power_of_two(),
            "alignment must be a power of two"
        );

        self.alignment = alignment;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Parse the header and resolve the pixel format without decoding the image
    pub fn probe(&mut self, data: &[u8]) -> Result<ImageInfo, Error> {
        let header = self.codec.read_header(data)?;
        let format = header.pixel_format()?;

        if header.width == 0 || header.height == 0 {
            return Err(Error::Bitstream(format!(
                "invalid dimensions {}x{}",
                header.width, header.height
            )));
        }

        Ok(ImageInfo { header, format })
    }

    /// Decode a whole image into a tightly packed buffer
    ///
    /// With `truncate` the image's dimensions are cut down to its sub sampling. Otherwise they stay as the header
    /// says and chroma planes keep the codec's rounded up sample count.
    pub fn load(&mut self, data: &[u8], truncate: bool) -> Result<Image, Error> {
        let info = self.probe(data)?;

        self.load_with_info(data, &info, truncate)
    }

    pub(crate) fn load_with_info(
        &mut self,
        data: &[u8],
        info: &ImageInfo,
        truncate: bool,
    ) -> Result<Image, Error> {
        // Images without a single whole sub sampling block are rejected even when not truncating
        let (truncated_width, truncated_height) = info.truncated();

        if truncated_width == 0 || truncated_height == 0 {
            return Err(Error::Bitstream(format!(
                "{}x{} image is too small for {:?}",
                info.width(),
                info.height(),
                info.format
            )));
        }

        let (width, height) = if truncate {
            (truncated_width, truncated_height)
        } else {
            (info.width(), info.height())
        };

        if info.format == PixelFormat::RGB24 {
            let mut image = Image::blank(info.format, width, height, self.alignment)?;
            self.decode_rgb_into(data, info, &mut image)?;
            return Ok(image);
        }

        let layout = PlanarLayout::packed(info.format, info.width(), info.height(), self.alignment)?;
        let mut buffer = alloc_zeroed(layout.len(), "decoded planes")?;

        self.codec
            .decode_planes(data, &info.header, self.alignment, &mut buffer)?;

        Ok(Image::from_buffer(
            info.format,
            width,
            height,
            buffer,
            layout,
        )?)
    }

    /// Decode into a host frame of the image's format and truncated dimensions
    ///
    /// If the frame's layout is exactly what the codec produces the image is decoded in place, otherwise it is
    /// decoded into a temporary buffer and copied row by row.
    pub fn load_into(
        &mut self,
        data: &[u8],
        info: &ImageInfo,
        frame: &mut Frame,
    ) -> Result<(), Error> {
        let (width, height) = info.truncated();

        if frame.format() != info.format || (frame.width(), frame.height()) != (width, height) {
            return Err(crate::MismatchError::Dimensions {
                index: 0,
                width: frame.width(),
                height: frame.height(),
                got_width: width,
                got_height: height,
            }
            .into());
        }

        if info.format == PixelFormat::RGB24 {
            return self.decode_rgb_into(data, info, frame);
        }

        let native = PlanarLayout::packed(info.format, info.width(), info.height(), self.alignment)?;

        if frame.layout() == &native {
            log::debug!(
                "decoding {}x{} {:?} directly into the frame",
                width,
                height,
                info.format
            );

            return self.codec.decode_planes(
                data,
                &info.header,
                self.alignment,
                &mut frame.buffer_mut()[..native.len()],
            );
        }

        log::debug!(
            "decoding {}x{} {:?} through a temporary buffer",
            info.width(),
            info.height(),
            info.format
        );

        let image = self.load_with_info(data, info, true)?;
        copy(&image, frame)
    }

    fn decode_rgb_into(
        &mut self,
        data: &[u8],
        info: &ImageInfo,
        dst: &mut dyn ImageMut,
    ) -> Result<(), Error> {
        let len = info
            .width()
            .checked_mul(info.height())
            .and_then(|n| n.checked_mul(3))
            .ok_or(Error::Overflow { what: "rgb buffer" })?;
        let mut rgb = alloc_zeroed(len, "rgb buffer")?;

        self.codec.decode_rgb(data, &info.header, &mut rgb)?;

        let (width, height) = (dst.width(), dst.height());
        deinterleave_rgb(&rgb, info.width(), dst, width, height);

        Ok(())
    }
}

/// Split interleaved RGB rows of `src_width` pixels into the three planes of `dst`
fn deinterleave_rgb(
    src: &[u8],
    src_width: usize,
    dst: &mut dyn ImageMut,
    width: usize,
    height: usize,
) {
    let mut planes = dst.planes_mut();

    let (Some((r, r_stride)), Some((g, g_stride)), Some((b, b_stride))) =
        (planes.next(), planes.next(), planes.next())
    else {
        unreachable!("RGB images have three planes")
    };

    let src_rows = src.chunks_exact(src_width * 3);
    let dst_rows = r
        .chunks_mut(r_stride)
        .zip(g.chunks_mut(g_stride))
        .zip(b.chunks_mut(b_stride));

    for (src_row, ((r, g), b)) in src_rows.zip(dst_rows).take(height) {
        for (x, px) in src_row.chunks_exact(3).take(width).enumerate() {
            r[x] = px[0];
            g[x] = px[1];
            b[x] = px[2];
        }
    }
}
