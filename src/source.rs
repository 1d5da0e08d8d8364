use crate::{
    AlignedAllocator, Error, Frame, FrameAllocator, Image, ImageInfo, JpegSequence, Loader,
    MismatchError, Options, StillClip,
    codec::CodecProvider,
    stitch::stitch,
};
use std::path::{Path, PathBuf};

/// Decodes JPEG files into frames, either one per request or several stitched side by side
pub struct JpegSource<P, A = AlignedAllocator> {
    provider: P,
    allocator: A,
    options: Options,
}

impl<P: CodecProvider> JpegSource<P> {
    /// Create a source which allocates frames aligned to [`Options::alignment`]
    pub fn new(provider: P, options: Options) -> Self {
        let allocator = AlignedAllocator::new(options.alignment);

        Self::with_allocator(provider, allocator, options)
    }
}

impl<P: CodecProvider, A: FrameAllocator> JpegSource<P, A> {
    pub fn with_allocator(provider: P, allocator: A, options: Options) -> Self {
        Self {
            provider,
            allocator,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub(crate) fn loader(&self) -> Result<Loader<P::Codec>, Error> {
        Ok(Loader::new(self.provider.codec()?).with_alignment(self.options.alignment))
    }

    /// Decode one file into a frame of its truncated dimensions
    pub fn decode_single(&self, path: impl AsRef<Path>) -> Result<Frame, Error> {
        let path = path.as_ref();
        let data = read(path)?;

        log::debug!("decoding {}", path.display());

        self.decode_single_bytes(&data)
    }

    pub fn decode_single_bytes(&self, data: &[u8]) -> Result<Frame, Error> {
        let mut loader = self.loader()?;
        let info = loader.probe(data)?;

        let (width, height) = info.truncated();
        if width == 0 || height == 0 {
            return Err(Error::Bitstream(format!(
                "{}x{} image is too small for {:?}",
                info.width(),
                info.height(),
                info.format
            )));
        }

        let mut frame = self.allocator.new_frame(info.format, width, height)?;
        loader.load_into(data, &info, &mut frame)?;

        Ok(self.finish(frame))
    }

    /// Decode all files and concatenate them from left to right
    ///
    /// Every file is read and its header checked against the first one before any pixels are decoded.
    pub fn decode_stitched<Q: AsRef<Path>>(&self, paths: &[Q]) -> Result<Frame, Error> {
        if paths.is_empty() {
            return Err(MismatchError::NoImages.into());
        }

        let mut loader = self.loader()?;
        let mut inputs: Vec<(Vec<u8>, ImageInfo)> = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let data = read(path)?;
            let info = loader.probe(&data)?;

            if let Some((_, first)) = inputs.first() {
                check_header(first, inputs.len(), &info)?;
            }

            log::debug!(
                "stitch input {}: {} {}x{} {:?}",
                inputs.len(),
                path.display(),
                info.width(),
                info.height(),
                info.format
            );

            inputs.push((data, info));
        }

        self.stitch_inputs(&inputs)
    }

    pub fn decode_stitched_bytes<D>(&self, datas: &[D]) -> Result<Frame, Error>
    where
        D: AsRef<[u8]> + Sync,
    {
        if datas.is_empty() {
            return Err(MismatchError::NoImages.into());
        }

        let mut loader = self.loader()?;
        let mut inputs: Vec<(&[u8], ImageInfo)> = Vec::with_capacity(datas.len());

        for data in datas {
            let data = data.as_ref();
            let info = loader.probe(data)?;

            if let Some((_, first)) = inputs.first() {
                check_header(first, inputs.len(), &info)?;
            }

            inputs.push((data, info));
        }

        self.stitch_inputs(&inputs)
    }

    /// Clip which returns the decoded file for every request
    pub fn still_clip(&self, path: impl AsRef<Path>) -> Result<StillClip, Error> {
        Ok(StillClip::new(self.decode_single(path)?))
    }

    /// Clip which returns the stitched files for every request
    pub fn stitched_clip<Q: AsRef<Path>>(&self, paths: &[Q]) -> Result<StillClip, Error> {
        Ok(StillClip::new(self.decode_stitched(paths)?))
    }

    /// Clip with one frame per file, decoded when requested
    pub fn sequence(self, paths: Vec<PathBuf>) -> Result<JpegSequence<P, A>, Error> {
        JpegSequence::new(self, paths)
    }

    fn stitch_inputs<D>(&self, inputs: &[(D, ImageInfo)]) -> Result<Frame, Error>
    where
        D: AsRef<[u8]> + Sync,
    {
        let alignment = self.options.alignment;
        let truncate = self.options.truncate_stitch_inputs;

        #[cfg(feature = "multi-thread")]
        let images = crate::multi_thread::decode_multi_thread(&self.provider, inputs, alignment, truncate)?;
        #[cfg(not(feature = "multi-thread"))]
        let images = decode_serial(&self.provider, inputs, alignment, truncate)?;

        let frame = stitch(images, &self.allocator)?;

        Ok(self.finish(frame))
    }

    fn finish(&self, mut frame: Frame) -> Frame {
        frame.props_mut().frame_rate = self.options.frame_rate;
        frame.mark_full_range();
        frame
    }
}

/// Decode all `inputs` one after another with a single codec
pub(crate) fn decode_serial<P, D>(
    provider: &P,
    inputs: &[(D, ImageInfo)],
    alignment: usize,
    truncate: bool,
) -> Result<Vec<Image>, Error>
where
    P: CodecProvider,
    D: AsRef<[u8]>,
{
    log::debug!("decoding {} images serially", inputs.len());

    let mut loader = Loader::new(provider.codec()?).with_alignment(alignment);

    inputs
        .iter()
        .map(|(data, info)| loader.load_with_info(data.as_ref(), info, truncate))
        .collect()
}

/// Images of a stitch must match the first one in format and height
fn check_header(first: &ImageInfo, index: usize, info: &ImageInfo) -> Result<(), MismatchError> {
    if info.format != first.format {
        return Err(MismatchError::Format {
            index,
            expected: first.format,
            got: info.format,
        });
    }

    if info.height() != first.height() {
        return Err(MismatchError::Height {
            index,
            expected: first.height(),
            got: info.height(),
        });
    }

    Ok(())
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(feature = "turbojpeg")]
mod turbo {
    use super::*;
    use crate::{FrameRate, codec::TurboJpeg};

    /// Provider creating a libjpeg-turbo decompressor for every worker
    pub type TurboJpegProvider = fn() -> Result<TurboJpeg, Error>;

    impl JpegSource<TurboJpegProvider> {
        pub fn turbojpeg(options: Options) -> Self {
            Self::new(TurboJpeg::new, options)
        }
    }

    /// Decode a single JPEG file with libjpeg-turbo
    ///
    /// A missing or non-positive frame rate part defaults to 1.
    pub fn decode_single(
        path: impl AsRef<Path>,
        fps_num: Option<i64>,
        fps_den: Option<i64>,
    ) -> Result<Frame, Error> {
        let options = Options::default().with_frame_rate(FrameRate::from_parts(fps_num, fps_den));

        JpegSource::turbojpeg(options).decode_single(path)
    }

    /// Decode JPEG files with libjpeg-turbo and concatenate them from left to right
    ///
    /// A missing or non-positive frame rate part defaults to 1.
    pub fn decode_stitched<Q: AsRef<Path>>(
        paths: &[Q],
        fps_num: Option<i64>,
        fps_den: Option<i64>,
    ) -> Result<Frame, Error> {
        let options = Options::default().with_frame_rate(FrameRate::from_parts(fps_num, fps_den));

        JpegSource::turbojpeg(options).decode_stitched(paths)
    }
}

#[cfg(feature = "turbojpeg")]
pub use turbo::{TurboJpegProvider, decode_single, decode_stitched};
