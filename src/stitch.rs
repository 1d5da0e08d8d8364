//! Horizontal concatenation of decoded images into one frame
//!
//! Every plane is placed independently: image `i` contributes a number of columns to each plane and the
//! destination offset of a plane is the sum of the contributions of all images before it. For sub sampled
//! formats a total luma width which is not a multiple of the horizontal sub sampling factor is fixed up by
//! cropping the remainder off the last image's luma and widening the chroma of the first images by one column
//! each. This trades a slight chroma shift at the seams for never having to split a chroma sample.

use crate::{
    Error, Frame, FrameAllocator, Image, ImageMut, ImageRef, MismatchError, PixelFormat,
    copy::blit,
};

/// Column counts and offsets of every image in every plane of a stitch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchPlan {
    format: PixelFormat,
    width: usize,
    height: usize,
    cropped: usize,
    /// contributions[image][plane]
    contributions: Vec<[usize; 3]>,
    /// offsets[image][plane]
    offsets: Vec<[usize; 3]>,
}

impl StitchPlan {
    /// Plan the stitch of images with the given luma `widths`, all `height` rows high
    pub fn new(format: PixelFormat, widths: &[usize], height: usize) -> Result<Self, MismatchError> {
        if widths.is_empty() {
            return Err(MismatchError::NoImages);
        }

        let sub = format.subsampling();
        let num_planes = format.num_planes();

        let mut contributions: Vec<[usize; 3]> = widths
            .iter()
            .map(|&width| {
                let mut planes = [0; 3];

                for (plane, contribution) in planes.iter_mut().enumerate().take(num_planes) {
                    *contribution = if plane == 0 { width } else { width >> sub.w };
                }

                planes
            })
            .collect();

        let total: usize = widths.iter().sum();
        let cropped = total % sub.horizontal_factor();

        if cropped != 0 {
            // Crop the remainder off the right side of the last image. Only if the last image is narrower than
            // the remainder the crop continues on the images before it.
            let mut left = cropped;
            for planes in contributions.iter_mut().rev() {
                let n = left.min(planes[0]);
                planes[0] -= n;
                left -= n;

                if left == 0 {
                    break;
                }
            }

            // Widen the chroma of the first images, one column each. Whatever exceeds the number of images goes
            // to the first one.
            let n = contributions.len();
            for i in 0..cropped {
                let image = if i < n { i } else { 0 };

                for contribution in contributions[image].iter_mut().take(num_planes).skip(1) {
                    *contribution += 1;
                }
            }

            log::debug!(
                "stitch width {total} is not a multiple of {}, cropped {cropped} columns and widened chroma of {} images",
                sub.horizontal_factor(),
                cropped.min(n)
            );
        }

        let offsets = contributions
            .iter()
            .scan([0usize; 3], |next, planes| {
                let offsets = *next;

                for (next, contribution) in next.iter_mut().zip(planes) {
                    *next += contribution;
                }

                Some(offsets)
            })
            .collect();

        Ok(Self {
            format,
            width: total - cropped,
            height: format.truncate(total, height).1,
            cropped,
            contributions,
            offsets,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Width of the stitched frame
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the stitched frame, truncated to the vertical sub sampling
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_images(&self) -> usize {
        self.contributions.len()
    }

    /// Number of luma columns cropped off to make the width a multiple of the sub sampling
    pub fn cropped_columns(&self) -> usize {
        self.cropped
    }

    /// Columns of `plane` filled from `image`
    ///
    /// # Panics
    ///
    /// If `image` or `plane` are out of range
    pub fn contribution(&self, image: usize, plane: usize) -> usize {
        assert!(plane < self.format.num_planes());

        self.contributions[image][plane]
    }

    /// Column of `plane` at which `image` starts
    ///
    /// # Panics
    ///
    /// If `image` or `plane` are out of range
    pub fn offset(&self, image: usize, plane: usize) -> usize {
        assert!(plane < self.format.num_planes());

        self.offsets[image][plane]
    }
}

/// Make sure all images share format and height, returns both
pub fn validate<I>(images: I) -> Result<(PixelFormat, usize), MismatchError>
where
    I: IntoIterator<Item = (PixelFormat, usize)>,
{
    let mut images = images.into_iter();
    let (format, height) = images.next().ok_or(MismatchError::NoImages)?;

    for (index, (got_format, got_height)) in images.enumerate() {
        let index = index + 1;

        if got_format != format {
            return Err(MismatchError::Format {
                index,
                expected: format,
                got: got_format,
            });
        }

        if got_height != height {
            return Err(MismatchError::Height {
                index,
                expected: height,
                got: got_height,
            });
        }
    }

    Ok((format, height))
}

/// Plan the stitch of already decoded images
pub fn plan(images: &[Image]) -> Result<StitchPlan, MismatchError> {
    let (format, height) = validate(images.iter().map(|i| (i.format(), i.height())))?;
    let widths: Vec<usize> = images.iter().map(|i| i.width()).collect();

    StitchPlan::new(format, &widths, height)
}

/// Concatenate `images` from left to right into a single frame
///
/// Each image is dropped as soon as all of its planes are copied.
pub fn stitch<A>(images: Vec<Image>, allocator: &A) -> Result<Frame, Error>
where
    A: FrameAllocator + ?Sized,
{
    let plan = plan(&images)?;

    if plan.width() == 0 || plan.height() == 0 {
        return Err(Error::Bitstream(format!(
            "stitched {:?} frame of {}x{} is empty",
            plan.format(),
            plan.width(),
            plan.height()
        )));
    }

    let mut frame = allocator.new_frame(plan.format(), plan.width(), plan.height())?;

    for (i, image) in images.into_iter().enumerate() {
        copy_image(&plan, i, &image, &mut frame);
    }

    frame.mark_full_range();

    Ok(frame)
}

fn copy_image(plan: &StitchPlan, index: usize, image: &Image, frame: &mut Frame) {
    let format = plan.format();
    let (frame_width, frame_height) = (frame.width(), frame.height());

    for (plane, (dst, dst_stride)) in frame.planes_mut().enumerate() {
        let src = image.plane(plane);
        let offset = plan.offset(index, plane);
        let dst_width = format.plane_width(plane, frame_width);

        // Never leave the source plane or the destination row
        let width = plan
            .contribution(index, plane)
            .min(src.width)
            .min(dst_width.saturating_sub(offset));
        let height = format.plane_height(plane, frame_height).min(src.height);

        log::trace!(
            "image {index} plane {plane}: {width}x{height} samples at column {offset}"
        );

        if width == 0 || height == 0 {
            continue;
        }

        blit(&mut dst[offset..], dst_stride, src.data, src.stride, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AlignedAllocator, ErrorKind, Loader,
        codec::{
            JpegSubsampling,
            synthetic::{self, SyntheticCodec, sample},
        },
    };

    fn decode(subsampling: JpegSubsampling, width: u16, height: u16, seed: u8, truncate: bool) -> Image {
        let data = synthetic::yuv(subsampling, width, height, seed);
        Loader::new(SyntheticCodec::default())
            .load(&data, truncate)
            .unwrap()
    }

    #[test]
    fn even_total_needs_no_redistribution() {
        let plan = StitchPlan::new(PixelFormat::YUV420, &[64, 66], 32).unwrap();

        assert_eq!(plan.width(), 130);
        assert_eq!(plan.height(), 32);
        assert_eq!(plan.cropped_columns(), 0);
        assert_eq!(plan.contribution(0, 1) + plan.contribution(1, 1), 65);
        assert_eq!(plan.offset(1, 0), 64);
        assert_eq!(plan.offset(1, 1), 32);
    }

    #[test]
    fn odd_inputs_are_truncated_before_planning() {
        let images = vec![
            decode(JpegSubsampling::S420, 65, 32, 0, true),
            decode(JpegSubsampling::S420, 65, 32, 100, true),
        ];

        let plan = plan(&images).unwrap();
        assert_eq!(plan.width(), 128);
        assert_eq!(plan.cropped_columns(), 0);
        assert_eq!(plan.contribution(1, 2), 32);
    }

    #[test]
    fn remainder_crops_last_image_and_widens_first_chroma() {
        let plan = StitchPlan::new(PixelFormat::YUV420, &[65, 65, 65], 32).unwrap();

        assert_eq!(plan.num_images(), 3);
        assert_eq!(plan.cropped_columns(), 1);
        assert_eq!(plan.width(), 194);

        // Luma of the last image lost the remainder
        assert_eq!(
            (0..3).map(|i| plan.contribution(i, 0)).collect::<Vec<_>>(),
            vec![65, 65, 64]
        );

        // Only the first image got a wider chroma
        for plane in 1..3 {
            assert_eq!(
                (0..3).map(|i| plan.contribution(i, plane)).collect::<Vec<_>>(),
                vec![33, 32, 32]
            );
            assert_eq!(
                (0..3).map(|i| plan.offset(i, plane)).collect::<Vec<_>>(),
                vec![0, 33, 65]
            );
        }

        let chroma: usize = (0..3).map(|i| plan.contribution(i, 1)).sum();
        assert_eq!(chroma, plan.width() / 2);

        let luma: usize = (0..3).map(|i| plan.contribution(i, 0)).sum();
        assert_eq!(luma, plan.width());
    }

    #[test]
    fn remainder_beyond_image_count_piles_onto_first_image() {
        // 5 + 6 = 11, 11 % 4 = 3 with only two images
        let plan = StitchPlan::new(PixelFormat::YUV411, &[5, 6], 8).unwrap();

        assert_eq!(plan.cropped_columns(), 3);
        assert_eq!(plan.width(), 8);
        assert_eq!(plan.contribution(1, 0), 3);
        assert_eq!(plan.contribution(0, 1), 1 + 2);
        assert_eq!(plan.contribution(1, 1), 1 + 1);
        assert_eq!(plan.contribution(0, 2), plan.contribution(0, 1));
    }

    #[test]
    fn crop_continues_on_earlier_images_when_last_is_too_narrow() {
        let plan = StitchPlan::new(PixelFormat::YUV411, &[8, 6, 1], 4).unwrap();

        // 15 % 4 = 3, the last image only has one column
        assert_eq!(plan.width(), 12);
        assert_eq!(plan.contribution(2, 0), 0);
        assert_eq!(plan.contribution(1, 0), 4);
        assert_eq!(plan.contribution(0, 0), 8);
    }

    #[test]
    fn height_is_truncated_for_vertical_subsampling() {
        let plan = StitchPlan::new(PixelFormat::YUV440, &[10, 10], 33).unwrap();

        assert_eq!(plan.height(), 32);
        assert_eq!(plan.width(), 20);
        assert_eq!(plan.cropped_columns(), 0);
    }

    #[test]
    fn unsubsampled_formats_never_crop() {
        for format in [PixelFormat::Gray8, PixelFormat::YUV444, PixelFormat::RGB24] {
            let plan = StitchPlan::new(format, &[3, 5, 7], 9).unwrap();

            assert_eq!(plan.width(), 15);
            assert_eq!(plan.height(), 9);
            for plane in 0..format.num_planes() {
                assert_eq!(plan.offset(2, plane), 8);
            }
        }
    }

    #[test]
    fn no_images() {
        assert!(matches!(
            StitchPlan::new(PixelFormat::YUV420, &[], 16),
            Err(MismatchError::NoImages)
        ));
        assert!(matches!(
            stitch(Vec::new(), &AlignedAllocator::default()),
            Err(Error::Mismatch(MismatchError::NoImages))
        ));
    }

    #[test]
    fn empty_stitch_result_is_a_bitstream_error() {
        let image = Image::blank(PixelFormat::YUV420, 1, 8, 1).unwrap();

        let err = stitch(vec![image], &AlignedAllocator::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bitstream);
    }

    #[test]
    fn mismatched_heights_fail() {
        let images = vec![
            decode(JpegSubsampling::S420, 100, 50, 0, true),
            decode(JpegSubsampling::S420, 100, 60, 0, true),
        ];

        let err = stitch(images, &AlignedAllocator::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mismatch);
        assert!(matches!(
            err,
            Error::Mismatch(MismatchError::Height {
                index: 1,
                expected: 50,
                got: 60
            })
        ));
    }

    #[test]
    fn mismatched_formats_fail() {
        let images = vec![
            decode(JpegSubsampling::S420, 64, 32, 0, true),
            decode(JpegSubsampling::S422, 64, 32, 0, true),
        ];

        let err = stitch(images, &AlignedAllocator::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Mismatch(MismatchError::Format { index: 1, .. })
        ));
    }

    #[test]
    fn samples_land_at_their_offsets() {
        let images = vec![
            decode(JpegSubsampling::S420, 64, 32, 10, true),
            decode(JpegSubsampling::S420, 66, 32, 200, true),
        ];

        let frame = stitch(images, &AlignedAllocator::new(32)).unwrap();

        assert_eq!((frame.width(), frame.height()), (130, 32));
        assert_eq!(frame.plane(1).width, 65);
        assert_eq!(frame.props().color_range, Some(crate::ColorRange::Full));

        for plane in 0..3 {
            let view = frame.plane(plane);
            let seam = if plane == 0 { 64 } else { 32 };

            for y in 0..view.height {
                for x in 0..view.width {
                    let expected = if x < seam {
                        sample(10, plane, x, y)
                    } else {
                        sample(200, plane, x - seam, y)
                    };

                    assert_eq!(view.get(x, y), expected, "plane {plane} at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn redistributed_chroma_copies_the_extra_column() {
        let images = vec![
            decode(JpegSubsampling::S420, 65, 32, 1, false),
            decode(JpegSubsampling::S420, 65, 32, 2, false),
            decode(JpegSubsampling::S420, 65, 32, 3, false),
        ];

        let frame = stitch(images, &AlignedAllocator::default()).unwrap();
        assert_eq!((frame.width(), frame.height()), (194, 32));

        let y = frame.plane(0);
        assert_eq!(y.get(64, 0), sample(1, 0, 64, 0));
        assert_eq!(y.get(65, 0), sample(2, 0, 0, 0));
        assert_eq!(y.get(130, 0), sample(3, 0, 0, 0));
        assert_eq!(y.get(193, 0), sample(3, 0, 63, 0));

        let u = frame.plane(1);
        assert_eq!(u.width, 97);

        // First image contributes its rounded up 33rd chroma column
        assert_eq!(u.get(32, 5), sample(1, 1, 32, 5));
        assert_eq!(u.get(33, 5), sample(2, 1, 0, 5));
        assert_eq!(u.get(65, 5), sample(3, 1, 0, 5));
        assert_eq!(u.get(96, 5), sample(3, 1, 31, 5));
    }

    #[test]
    fn gray_and_rgb_stitch() {
        use crate::codec::JpegColorspace;

        let load = |data: Vec<u8>| {
            Loader::new(SyntheticCodec::default())
                .load(&data, true)
                .unwrap()
        };

        let gray = vec![
            load(synthetic::encode(JpegColorspace::Gray, JpegSubsampling::Gray, 3, 4, 0)),
            load(synthetic::encode(JpegColorspace::Gray, JpegSubsampling::Gray, 5, 4, 9)),
        ];
        let frame = stitch(gray, &AlignedAllocator::default()).unwrap();
        assert_eq!(frame.planes().count(), 1);
        assert_eq!((frame.width(), frame.height()), (8, 4));
        assert_eq!(frame.plane(0).get(3, 2), sample(9, 0, 0, 2));

        let rgb = vec![
            load(synthetic::encode(JpegColorspace::Rgb, JpegSubsampling::S444, 3, 4, 0)),
            load(synthetic::encode(JpegColorspace::Rgb, JpegSubsampling::S444, 3, 4, 50)),
        ];
        let frame = stitch(rgb, &AlignedAllocator::default()).unwrap();
        assert_eq!(frame.planes().count(), 3);
        assert_eq!((frame.width(), frame.height()), (6, 4));
        assert_eq!(frame.plane(2).get(4, 3), sample(50, 2, 1, 3));
    }

    #[test]
    fn single_image_stitch_is_a_plain_decode() {
        let image = decode(JpegSubsampling::S422, 33, 7, 77, true);
        let frame = stitch(vec![image.clone()], &AlignedAllocator::default()).unwrap();

        assert_eq!((frame.width(), frame.height()), (32, 7));
        for plane in 0..3 {
            assert!(frame.plane(plane).rows().eq(image.plane(plane).rows()));
        }
    }
}
