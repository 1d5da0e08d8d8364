/// Description for a Plane which can be used to implement bounds checks, stride calculation and buffer sizes.
///
/// Shifts are divisor exponents: a plane of an image `width` pixels wide holds `width >> width_shift` samples
/// per row (rounded up).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlaneDesc {
    pub(crate) width_shift: u32,
    pub(crate) height_shift: u32,
}

impl PlaneDesc {
    pub(crate) fn width(&self, width: usize) -> usize {
        width.div_ceil(1 << self.width_shift)
    }

    pub(crate) fn height(&self, height: usize) -> usize {
        height.div_ceil(1 << self.height_shift)
    }

    /// Every sample is a single byte
    pub(crate) fn packed_stride(&self, width: usize) -> usize {
        self.width(width)
    }
}

const FULL: PlaneDesc = PlaneDesc {
    width_shift: 0,
    height_shift: 0,
};

const fn chroma(width_shift: u32, height_shift: u32) -> PlaneDesc {
    PlaneDesc {
        width_shift,
        height_shift,
    }
}

pub(crate) const GRAY8_PLANES: [PlaneDesc; 1] = [FULL];

pub(crate) const YUV444_PLANES: [PlaneDesc; 3] = [FULL, FULL, FULL];

pub(crate) const YUV440_PLANES: [PlaneDesc; 3] = [FULL, chroma(0, 1), chroma(0, 1)];

pub(crate) const YUV422_PLANES: [PlaneDesc; 3] = [FULL, chroma(1, 0), chroma(1, 0)];

pub(crate) const YUV420_PLANES: [PlaneDesc; 3] = [FULL, chroma(1, 1), chroma(1, 1)];

pub(crate) const YUV411_PLANES: [PlaneDesc; 3] = [FULL, chroma(2, 0), chroma(2, 0)];

pub(crate) const RGB24_PLANES: [PlaneDesc; 3] = [FULL, FULL, FULL];
