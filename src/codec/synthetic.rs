//! Deterministic stand-in for a JPEG decoder
//!
//! A "bitstream" is a small header followed by nothing: the decoded samples are a pure function of the seed,
//! the plane and the position, so tests can predict every output sample exactly.

use super::{JpegCodec, JpegColorspace, JpegHeader, JpegSubsampling};
use crate::{Error, PlanarLayout};

const MAGIC: &[u8; 4] = b"SYNJ";

pub(crate) fn encode(
    colorspace: JpegColorspace,
    subsampling: JpegSubsampling,
    width: u16,
    height: u16,
    seed: u8,
) -> Vec<u8> {
    let mut data = MAGIC.to_vec();
    data.push(colorspace as u8);
    data.push(subsampling as u8);
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.push(seed);
    data
}

pub(crate) fn yuv(subsampling: JpegSubsampling, width: u16, height: u16, seed: u8) -> Vec<u8> {
    encode(JpegColorspace::YCbCr, subsampling, width, height, seed)
}

/// Sample value at `(x, y)` of `plane` for an image created with `seed`
pub(crate) fn sample(seed: u8, plane: usize, x: usize, y: usize) -> u8 {
    seed.wrapping_add((plane * 71 + x * 3 + y * 7) as u8)
}

#[derive(Default)]
pub(crate) struct SyntheticCodec {
    pub(crate) planar_decodes: usize,
    pub(crate) rgb_decodes: usize,
}

fn colorspace(v: u8) -> JpegColorspace {
    use JpegColorspace::*;

    [YCbCr, Gray, Rgb, Cmyk, Ycck, Other]
        .into_iter()
        .find(|c| *c as u8 == v)
        .unwrap_or(Other)
}

fn subsampling(v: u8) -> JpegSubsampling {
    use JpegSubsampling::*;

    [S444, S422, S420, S440, S411, Gray, Other]
        .into_iter()
        .find(|s| *s as u8 == v)
        .unwrap_or(Other)
}

fn seed(data: &[u8]) -> u8 {
    data[10]
}

impl JpegCodec for SyntheticCodec {
    fn read_header(&mut self, data: &[u8]) -> Result<JpegHeader, Error> {
        if data.len() != 11 || &data[..4] != MAGIC {
            return Err(Error::Bitstream("not a synthetic image".into()));
        }

        Ok(JpegHeader {
            width: u16::from_le_bytes([data[6], data[7]]).into(),
            height: u16::from_le_bytes([data[8], data[9]]).into(),
            colorspace: colorspace(data[4]),
            subsampling: subsampling(data[5]),
        })
    }

    fn decode_planes(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        align: usize,
        out: &mut [u8],
    ) -> Result<(), Error> {
        self.read_header(data)?;
        self.planar_decodes += 1;

        let format = header.pixel_format()?;
        let layout = PlanarLayout::packed(format, header.width, header.height, align)?;

        if out.len() < layout.len() {
            return Err(Error::Bitstream("output buffer too small".into()));
        }

        let seed = seed(data);

        for ((i, plane), desc) in layout.split_mut(out).enumerate().zip(layout.planes()) {
            for (y, row) in plane.chunks_mut(desc.stride).enumerate() {
                for (x, v) in row[..desc.width].iter_mut().enumerate() {
                    *v = sample(seed, i, x, y);
                }
            }
        }

        Ok(())
    }

    fn decode_rgb(
        &mut self,
        data: &[u8],
        header: &JpegHeader,
        out: &mut [u8],
    ) -> Result<(), Error> {
        self.read_header(data)?;
        self.rgb_decodes += 1;

        let seed = seed(data);
        let width = header.width;

        for (y, row) in out
            .chunks_exact_mut(width * 3)
            .take(header.height)
            .enumerate()
        {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                for (c, v) in px.iter_mut().enumerate() {
                    *v = sample(seed, c, x, y);
                }
            }
        }

        Ok(())
    }
}
