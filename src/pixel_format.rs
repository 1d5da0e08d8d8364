use crate::{InvalidNumberOfPlanesError, plane_decs::*};

/// Supported pixel formats, all planar with 8 bits per sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFormat {
    /// Single luma plane
    Gray8,

    /// Y, U and V planes, 4:4:4 sub sampling
    YUV444,

    /// Y, U and V planes, 4:4:0 sub sampling
    YUV440,

    /// Y, U and V planes, 4:2:2 sub sampling
    YUV422,

    /// Y, U and V planes, 4:2:0 sub sampling
    YUV420,

    /// Y, U and V planes, 4:1:1 sub sampling
    YUV411,

    /// R, G and B planes
    RGB24,
}

/// Chroma sub sampling expressed as horizontal and vertical divisor exponents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Subsampling {
    pub w: u32,
    pub h: u32,
}

impl Subsampling {
    pub const NONE: Self = Self { w: 0, h: 0 };

    /// Number of luma columns sharing one chroma sample
    pub fn horizontal_factor(self) -> usize {
        1 << self.w
    }

    /// Number of luma rows sharing one chroma sample
    pub fn vertical_factor(self) -> usize {
        1 << self.h
    }
}

impl PixelFormat {
    pub fn num_planes(self) -> usize {
        self.plane_desc().len()
    }

    /// Sub sampling of the chroma planes, [`Subsampling::NONE`] for gray and RGB
    pub fn subsampling(self) -> Subsampling {
        use PixelFormat::*;

        match self {
            Gray8 | YUV444 | RGB24 => Subsampling::NONE,
            YUV440 => Subsampling { w: 0, h: 1 },
            YUV422 => Subsampling { w: 1, h: 0 },
            YUV420 => Subsampling { w: 1, h: 1 },
            YUV411 => Subsampling { w: 2, h: 0 },
        }
    }

    /// Drop the trailing columns and rows which cannot be represented with this format's sub sampling
    pub fn truncate(self, width: usize, height: usize) -> (usize, usize) {
        let sub = self.subsampling();

        (
            width & !(sub.horizontal_factor() - 1),
            height & !(sub.vertical_factor() - 1),
        )
    }

    /// Width in samples of the given plane, rounded up for dimensions which are not truncated
    ///
    /// # Panics
    ///
    /// If `plane` is not smaller than [`PixelFormat::num_planes`]
    pub fn plane_width(self, plane: usize, width: usize) -> usize {
        self.plane_desc()[plane].width(width)
    }

    /// Height in rows of the given plane, rounded up for dimensions which are not truncated
    ///
    /// # Panics
    ///
    /// If `plane` is not smaller than [`PixelFormat::num_planes`]
    pub fn plane_height(self, plane: usize, height: usize) -> usize {
        self.plane_desc()[plane].height(height)
    }

    /// Calculate the required buffer size of a tightly packed image given the [`PixelFormat`] self and image dimensions
    pub fn buffer_size(self, width: usize, height: usize) -> usize {
        self.plane_desc()
            .iter()
            .map(|plane| plane.packed_stride(width) * plane.height(height))
            .sum()
    }

    /// Calculate the strides of an image in a packed buffer
    pub fn packed_strides(self, width: usize) -> Vec<usize> {
        self.plane_desc()
            .iter()
            .map(|desc| desc.packed_stride(width))
            .collect()
    }

    /// Check if the given planes+strides are valid for dimensions
    pub fn bounds_check<'a>(
        self,
        planes: impl Iterator<Item = (&'a [u8], usize)>,
        width: usize,
        height: usize,
    ) -> Result<(), BoundsCheckError> {
        let descs = self.plane_desc();
        let mut got = 0;

        for (i, (slice, stride)) in planes.enumerate() {
            let Some(plane) = descs.get(i) else {
                return Err(InvalidNumberOfPlanesError {
                    expected: descs.len(),
                    got: i + 1,
                }
                .into());
            };

            got += 1;

            // Ensure stride is not smaller than the width would allow
            let min_stride = plane.packed_stride(width);

            if min_stride > stride {
                return Err(BoundsCheckError::InvalidStride {
                    plane: i,
                    minimum: min_stride,
                    got: stride,
                });
            }

            // The last row only needs to hold the samples, not a whole stride
            let rows = plane.height(height);
            let min_len = match rows {
                0 => 0,
                rows => stride * (rows - 1) + min_stride,
            };

            if min_len > slice.len() {
                return Err(BoundsCheckError::InvalidPlaneSize {
                    plane: i,
                    minimum: min_len,
                    got: slice.len(),
                });
            }
        }

        if got != descs.len() {
            return Err(InvalidNumberOfPlanesError {
                expected: descs.len(),
                got,
            }
            .into());
        }

        Ok(())
    }

    pub(crate) fn plane_desc(&self) -> &'static [PlaneDesc] {
        use PixelFormat::*;

        match self {
            Gray8 => &GRAY8_PLANES,
            YUV444 => &YUV444_PLANES,
            YUV440 => &YUV440_PLANES,
            YUV422 => &YUV422_PLANES,
            YUV420 => &YUV420_PLANES,
            YUV411 => &YUV411_PLANES,
            RGB24 => &RGB24_PLANES,
        }
    }

    pub fn variants() -> impl IntoIterator<Item = Self> {
        use PixelFormat::*;

        [Gray8, YUV444, YUV440, YUV422, YUV420, YUV411, RGB24]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundsCheckError {
    #[error(transparent)]
    InvalidNumberOfPlanes(#[from] InvalidNumberOfPlanesError),

    #[error("invalid stride at plane {plane}, expected it to be at least {minimum}, but got {got}")]
    InvalidStride {
        plane: usize,
        minimum: usize,
        got: usize,
    },

    #[error(
        "invalid plane size at plane {plane}, expected it to be at least {minimum}, but got {got}"
    )]
    InvalidPlaneSize {
        plane: usize,
        minimum: usize,
        got: usize,
    },
}
