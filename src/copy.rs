use crate::{Error, ImageMut, ImageRef, ImageRefExt, MismatchError};

/// Copy a `width` x `height` block of samples between two strided buffers
///
/// # Panics
///
/// If either buffer is too small for the block
pub fn blit(
    dst: &mut [u8],
    dst_stride: usize,
    src: &[u8],
    src_stride: usize,
    width: usize,
    height: usize,
) {
    if width == 0 || height == 0 {
        return;
    }

    assert!(width <= dst_stride && width <= src_stride);

    let src_rows = src.chunks(src_stride).take(height);
    let dst_rows = dst.chunks_mut(dst_stride).take(height);

    let mut copied = 0;

    for (src_row, dst_row) in src_rows.zip(dst_rows) {
        dst_row[..width].copy_from_slice(&src_row[..width]);
        copied += 1;
    }

    assert_eq!(copied, height, "buffers hold fewer than {height} rows");
}

/// Copy all planes of `src` into `dst`, both images must have the same format and dimensions
pub fn copy(src: &dyn ImageRef, dst: &mut dyn ImageMut) -> Result<(), Error> {
    if src.format() != dst.format() {
        return Err(MismatchError::Format {
            index: 0,
            expected: dst.format(),
            got: src.format(),
        }
        .into());
    }

    if (src.width(), src.height()) != (dst.width(), dst.height()) {
        return Err(MismatchError::Dimensions {
            index: 0,
            width: dst.width(),
            height: dst.height(),
            got_width: src.width(),
            got_height: src.height(),
        }
        .into());
    }

    src.bounds_check().map_err(crate::ImageError::from)?;
    dst.bounds_check().map_err(crate::ImageError::from)?;

    let format = src.format();
    let (width, height) = (src.width(), src.height());

    for (i, ((src_plane, src_stride), (dst_plane, dst_stride))) in
        src.planes().zip(dst.planes_mut()).enumerate()
    {
        blit(
            dst_plane,
            dst_stride,
            src_plane,
            src_stride,
            format.plane_width(i, width),
            format.plane_height(i, height),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Image, ImageRefExt, PixelFormat};

    #[test]
    fn blit_at_offset() {
        let src = [1, 2, 9, 3, 4, 9];
        let mut dst = [0u8; 8];

        blit(&mut dst[1..], 4, &src, 3, 2, 2);

        assert_eq!(dst, [0, 1, 2, 0, 0, 3, 4, 0]);
    }

    #[test]
    fn blit_last_row_without_padding() {
        let src = [5, 6, 7, 8];
        let mut dst = [0u8; 6];

        blit(&mut dst, 4, &src, 2, 2, 2);

        assert_eq!(dst, [5, 6, 0, 0, 7, 8]);
    }

    #[test]
    fn run_copy_custom_strides() {
        let width = 67;
        let height = 33;

        for format in PixelFormat::variants() {
            let (width, height) = format.truncate(width, height);

            let mut src = Image::blank(format, width, height, 1).unwrap();
            for (i, (plane, _)) in src.planes_mut().enumerate() {
                for (j, sample) in plane.iter_mut().enumerate() {
                    *sample = (i * 50 + j) as u8;
                }
            }

            let mut dst = Image::blank(format, width, height, 64).unwrap();
            copy(&src, &mut dst).unwrap();

            for plane in 0..format.num_planes() {
                let a = src.plane(plane);
                let b = ImageRefExt::plane(&dst, plane).unwrap();
                assert!(a.rows().eq(b.rows()), "{format:?} plane {plane}");
            }
        }
    }

    #[test]
    fn copy_rejects_other_formats() {
        let src = Image::blank(PixelFormat::YUV420, 16, 16, 1).unwrap();
        let mut dst = Image::blank(PixelFormat::YUV444, 16, 16, 1).unwrap();

        let err = copy(&src, &mut dst).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Mismatch);
    }
}
