//! Boundary to the external JPEG decoder

use crate::{Error, PixelFormat};

#[cfg(test)]
pub(crate) mod synthetic;
#[cfg(feature = "turbojpeg")]
mod turbo;

#[cfg(feature = "turbojpeg")]
pub use turbo::TurboJpeg;

/// Color space of the compressed components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JpegColorspace {
    YCbCr,
    Gray,
    Rgb,
    Cmyk,
    Ycck,
    Other,
}

/// Sub sampling of the compressed chroma components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JpegSubsampling {
    S444,
    S422,
    S420,
    S440,
    S411,
    Gray,
    Other,
}

/// Header facts of a JPEG bitstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegHeader {
    pub width: usize,
    pub height: usize,
    pub colorspace: JpegColorspace,
    pub subsampling: JpegSubsampling,
}

impl JpegHeader {
    /// The planar format this image decodes into
    pub fn pixel_format(&self) -> Result<PixelFormat, Error> {
        use JpegSubsampling::*;

        let format = match (self.colorspace, self.subsampling) {
            (JpegColorspace::YCbCr, S444) => PixelFormat::YUV444,
            (JpegColorspace::YCbCr, S422) => PixelFormat::YUV422,
            (JpegColorspace::YCbCr, S420) => PixelFormat::YUV420,
            (JpegColorspace::YCbCr, S440) => PixelFormat::YUV440,
            (JpegColorspace::YCbCr, S411) => PixelFormat::YUV411,
            (JpegColorspace::Gray, _) => PixelFormat::Gray8,
            (JpegColorspace::Rgb, _) => PixelFormat::RGB24,
            (colorspace, subsampling) => {
                return Err(Error::UnsupportedColorspace {
                    colorspace,
                    subsampling,
                });
            }
        };

        Ok(format)
    }
}

/// A JPEG decoder
///
/// One instance is used by one thread at a time, see [`CodecProvider`] for creating one per worker.
pub trait JpegCodec {
    fn read_header(&mut self, data: &[u8]) -> Result<JpegHeader, Error>;

    /// Decode the Y, Cb and Cr components (or the single gray component) without color conversion
    ///
    /// `out` must hold the planes back to back as described by
    /// [`PlanarLayout::packed`](crate::PlanarLayout::packed) for the header's format, dimensions and `align`.
    fn decode_planes(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        align: usize,
        out: &mut [u8],
    ) -> Result<(), Error>;

    /// Decode into interleaved 8 bit RGB, rows are `width * 3` bytes without padding
    fn decode_rgb(&mut self, data: &[u8], header: &JpegHeader, out: &mut [u8])
    -> Result<(), Error>;
}

impl<C: JpegCodec + ?Sized> JpegCodec for &mut C {
    fn read_header(&mut self, data: &[u8]) -> Result<JpegHeader, Error> {
        (**self).read_header(data)
    }

    fn decode_planes(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        align: usize,
        out: &mut [u8],
    ) -> Result<(), Error> {
        (**self).decode_planes(data, header, align, out)
    }

    fn decode_rgb(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        out: &mut [u8],
    ) -> Result<(), Error> {
        (**self).decode_rgb(data, header, out)
    }
}

impl<C: JpegCodec + ?Sized> JpegCodec for Box<C> {
    fn read_header(&mut self, data: &[u8]) -> Result<JpegHeader, Error> {
        (**self).read_header(data)
    }

    fn decode_planes(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        align: usize,
        out: &mut [u8],
    ) -> Result<(), Error> {
        (**self).decode_planes(data, header, align, out)
    }

    fn decode_rgb(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        out: &mut [u8],
    ) -> Result<(), Error> {
        (**self).decode_rgb(data, header, out)
    }
}

/// Creates codecs, one for every thread decoding in parallel
pub trait CodecProvider: Sync {
    type Codec: JpegCodec;

    fn codec(&self) -> Result<Self::Codec, Error>;
}

impl<F, C> CodecProvider for F
where
    F: Fn() -> Result<C, Error> + Sync,
    C: JpegCodec,
{
    type Codec = C;

    fn codec(&self) -> Result<C, Error> {
        self()
    }
}
