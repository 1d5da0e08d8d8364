/// Frame rate attached to produced frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self { num: 1, den: 1 }
    }
}

impl FrameRate {
    /// Missing or non-positive parts default to 1
    pub fn from_parts(num: Option<i64>, den: Option<i64>) -> Self {
        fn part(v: Option<i64>) -> u64 {
            v.and_then(|v| u64::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(1)
        }

        Self {
            num: part(num),
            den: part(den),
        }
    }
}

/// Options shared by all requests of a [`JpegSource`](crate::JpegSource)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub frame_rate: FrameRate,

    /// Row alignment in bytes of frames and decode buffers
    pub alignment: usize,

    /// Truncate every stitch input to its sub sampling before planning the stitch
    ///
    /// When disabled the inputs keep their full width and the stitcher compensates odd totals by cropping the
    /// last image and widening the chroma of the first images.
    pub truncate_stitch_inputs: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            alignment: 32,
            truncate_stitch_inputs: true,
        }
    }
}

impl Options {
    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

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

    pub fn with_truncate_stitch_inputs(mut self, truncate: bool) -> Self {
        self.truncate_stitch_inputs = truncate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_defaults() {
        assert_eq!(FrameRate::from_parts(None, None), FrameRate { num: 1, den: 1 });
        assert_eq!(
            FrameRate::from_parts(Some(30000), Some(1001)),
            FrameRate {
                num: 30000,
                den: 1001
            }
        );
        assert_eq!(
            FrameRate::from_parts(Some(0), Some(-5)),
            FrameRate { num: 1, den: 1 }
        );
        assert_eq!(
            FrameRate::from_parts(Some(24), None),
            FrameRate { num: 24, den: 1 }
        );
    }

    #[test]
    #[should_panic]
    fn alignment_must_be_power_of_two() {
        let _ = Options::default().with_alignment(24);
    }
}
