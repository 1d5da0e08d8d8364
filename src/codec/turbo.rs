use super::{JpegCodec, JpegColorspace, JpegHeader, JpegSubsampling};
use crate::Error;
use turbojpeg::{Colorspace, Decompressor, Image, PixelFormat as TjPixelFormat, Subsamp, YuvImage};

/// [`JpegCodec`] backed by libjpeg-turbo
pub struct TurboJpeg {
    decompressor: Decompressor,
}

impl TurboJpeg {
    pub fn new() -> Result<Self, Error> {
        let decompressor = Decompressor::new().map_err(Error::bitstream)?;

        Ok(Self { decompressor })
    }
}

impl JpegCodec for TurboJpeg {
    fn read_header(&mut self, data: &[u8]) -> Result<JpegHeader, Error> {
        let header = self
            .decompressor
            .read_header(data)
            .map_err(Error::bitstream)?;

        Ok(JpegHeader {
            width: header.width,
            height: header.height,
            colorspace: colorspace_from_tj(header.colorspace),
            subsampling: subsampling_from_tj(header.subsamp),
        })
    }

    fn decode_planes(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        align: usize,
        out: &mut [u8],
    ) -> Result<(), Error> {
        let subsamp = subsampling_to_tj(header.subsampling, header.colorspace).ok_or(
            Error::UnsupportedColorspace {
                colorspace: header.colorspace,
                subsampling: header.subsampling,
            },
        )?;

        let image = YuvImage {
            pixels: out,
            width: header.width,
            align,
            height: header.height,
            subsamp,
        };

        self.decompressor
            .decompress_to_yuv(data, image)
            .map_err(Error::bitstream)
    }

    fn decode_rgb(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        out: &mut [u8],
    ) -> Result<(), Error> {
        let image = Image {
            pixels: out,
            width: header.width,
            pitch: header.width * 3,
            height: header.height,
            format: TjPixelFormat::RGB,
        };

        self.decompressor
            .decompress(data, image)
            .map_err(Error::bitstream)
    }
}

fn colorspace_from_tj(colorspace: Colorspace) -> JpegColorspace {
    match colorspace {
        Colorspace::YCbCr => JpegColorspace::YCbCr,
        Colorspace::Gray => JpegColorspace::Gray,
        Colorspace::RGB => JpegColorspace::Rgb,
        Colorspace::CMYK => JpegColorspace::Cmyk,
        Colorspace::YCCK => JpegColorspace::Ycck,
        #[allow(unreachable_patterns)]
        _ => JpegColorspace::Other,
    }
}

fn subsampling_from_tj(subsamp: Subsamp) -> JpegSubsampling {
    match subsamp {
        Subsamp::None => JpegSubsampling::S444,
        Subsamp::Sub2x1 => JpegSubsampling::S422,
        Subsamp::Sub2x2 => JpegSubsampling::S420,
        Subsamp::Sub1x2 => JpegSubsampling::S440,
        Subsamp::Sub4x1 => JpegSubsampling::S411,
        Subsamp::Gray => JpegSubsampling::Gray,
        #[allow(unreachable_patterns)]
        _ => JpegSubsampling::Other,
    }
}

fn subsampling_to_tj(subsampling: JpegSubsampling, colorspace: JpegColorspace) -> Option<Subsamp> {
    if colorspace == JpegColorspace::Gray {
        return Some(Subsamp::Gray);
    }

    match subsampling {
        JpegSubsampling::S444 => Some(Subsamp::None),
        JpegSubsampling::S422 => Some(Subsamp::Sub2x1),
        JpegSubsampling::S420 => Some(Subsamp::Sub2x2),
        JpegSubsampling::S440 => Some(Subsamp::Sub1x2),
        JpegSubsampling::S411 => Some(Subsamp::Sub4x1),
        JpegSubsampling::Gray => Some(Subsamp::Gray),
        JpegSubsampling::Other => None,
    }
}
