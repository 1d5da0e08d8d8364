use crate::{
    Error, Frame, FrameAllocator, FrameRate, ImageRef, JpegSource, MismatchError, PixelFormat,
    codec::CodecProvider, source::read,
};
use std::{path::PathBuf, sync::Arc};

/// Properties of a clip, the same for every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub format: PixelFormat,
    pub width: usize,
    pub height: usize,
    pub num_frames: usize,
    pub frame_rate: FrameRate,
}

/// Frame producer queried by the host
pub trait Clip: Send + Sync {
    fn info(&self) -> &VideoInfo;

    /// Get frame `n`, requests past the end return the last frame
    fn get_frame(&self, n: usize) -> Result<Arc<Frame>, Error>;
}

/// Clip of a single precomputed frame, every request returns a reference to it
#[derive(Debug, Clone)]
pub struct StillClip {
    info: VideoInfo,
    frame: Arc<Frame>,
}

impl StillClip {
    pub fn new(frame: Frame) -> Self {
        let info = VideoInfo {
            format: frame.format(),
            width: frame.width(),
            height: frame.height(),
            num_frames: 1,
            frame_rate: frame.props().frame_rate,
        };

        Self {
            info,
            frame: Arc::new(frame),
        }
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }
}

impl Clip for StillClip {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(&self, _n: usize) -> Result<Arc<Frame>, Error> {
        Ok(self.frame.clone())
    }
}

/// Clip with one frame per file
///
/// Nothing but the first file's header is read up front, every frame is decoded when it is requested.
pub struct JpegSequence<P, A> {
    source: JpegSource<P, A>,
    paths: Vec<PathBuf>,
    info: VideoInfo,
}

impl<P: CodecProvider, A: FrameAllocator> JpegSequence<P, A> {
    pub fn new(source: JpegSource<P, A>, paths: Vec<PathBuf>) -> Result<Self, Error> {
        let first = paths.first().ok_or(MismatchError::NoImages)?;

        let data = read(first)?;
        let info = source.loader()?.probe(&data)?;
        let (width, height) = info.truncated();

        log::debug!(
            "sequence of {} files, {width}x{height} {:?}",
            paths.len(),
            info.format
        );

        let info = VideoInfo {
            format: info.format,
            width,
            height,
            num_frames: paths.len(),
            frame_rate: source.options().frame_rate,
        };

        Ok(Self {
            source,
            paths,
            info,
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl<P, A> Clip for JpegSequence<P, A>
where
    P: CodecProvider + Send,
    A: FrameAllocator + Send,
{
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(&self, n: usize) -> Result<Arc<Frame>, Error> {
        let index = n.min(self.paths.len() - 1);
        let frame = self.source.decode_single(&self.paths[index])?;

        if frame.format() != self.info.format {
            return Err(MismatchError::Format {
                index,
                expected: self.info.format,
                got: frame.format(),
            }
            .into());
        }

        if (frame.width(), frame.height()) != (self.info.width, self.info.height) {
            return Err(MismatchError::Dimensions {
                index,
                width: self.info.width,
                height: self.info.height,
                got_width: frame.width(),
                got_height: frame.height(),
            }
            .into());
        }

        Ok(Arc::new(frame))
    }
}
