use crate::{
    BoundsCheckError, PixelFormat,
    codec::{JpegColorspace, JpegSubsampling},
};
use std::path::PathBuf;

/// Everything that can fail while decoding or stitching
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode jpeg: {0}")]
    Bitstream(String),

    #[error("unsupported color space {colorspace:?} with sub sampling {subsampling:?}")]
    UnsupportedColorspace {
        colorspace: JpegColorspace,
        subsampling: JpegSubsampling,
    },

    #[error(transparent)]
    Mismatch(#[from] MismatchError),

    #[error("unable to allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: usize },

    #[error("size of {what} overflows")]
    Overflow { what: &'static str },

    #[error(transparent)]
    InvalidImage(#[from] ImageError),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    Bitstream,
    UnsupportedColorspace,
    Mismatch,
    Allocation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Bitstream(_) => ErrorKind::Bitstream,
            Error::UnsupportedColorspace { .. } => ErrorKind::UnsupportedColorspace,
            Error::Mismatch(_) => ErrorKind::Mismatch,
            Error::Allocation { .. } | Error::Overflow { .. } | Error::InvalidImage(_) => {
                ErrorKind::Allocation
            }
        }
    }

    /// Wrap a decoder error message
    pub fn bitstream(err: impl std::fmt::Display) -> Self {
        Error::Bitstream(err.to_string())
    }
}

/// Images which cannot be concatenated into one frame
#[derive(Debug, thiserror::Error)]
pub enum MismatchError {
    #[error("at least one image is required")]
    NoImages,

    #[error("image {index} is {got:?}, expected {expected:?}")]
    Format {
        index: usize,
        expected: PixelFormat,
        got: PixelFormat,
    },

    #[error("image {index} is {got} pixels high, expected {expected}")]
    Height {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("image {index} is {got_width}x{got_height}, expected {width}x{height}")]
    Dimensions {
        index: usize,
        width: usize,
        height: usize,
        got_width: usize,
        got_height: usize,
    },
}

/// Everything that can go wrong when constructing an [`Image`](crate::Image)
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("width or height must not be zero")]
    InvalidDimensions,

    #[error("layout needs {needed} bytes, but the buffer only has {len}")]
    BufferSize { needed: usize, len: usize },

    #[error("layout does not describe a {format:?} image of {width}x{height}")]
    LayoutMismatch {
        format: PixelFormat,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    BoundsCheck(#[from] BoundsCheckError),
}
