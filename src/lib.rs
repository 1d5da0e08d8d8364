//! Decode JPEG images into planar video frames without color conversion and stitch several of them side by side
//!
//! Decoding goes through the [`codec::JpegCodec`] trait, libjpeg-turbo backs it with the `turbojpeg` feature.
//! [`JpegSource`] ties a codec, a [`FrameAllocator`] and [`Options`] together, [`StitchPlan`] and [`stitch`]
//! can also be used on their own with already decoded [`Image`]s.

pub use clip::{Clip, JpegSequence, StillClip, VideoInfo};
pub use config::{FrameRate, Options};
pub use copy::{blit, copy};
pub use error::{Error, ErrorKind, ImageError, MismatchError};
pub use frame::{AlignedAllocator, ColorRange, Frame, FrameAllocator, FrameProps};
pub use image::{Image, Plane};
pub use image_traits::{ImageMut, ImageRef, ImageRefExt};
pub use layout::{PlanarLayout, PlaneLayout};
pub use loader::{ImageInfo, Loader};
pub use pixel_format::{BoundsCheckError, PixelFormat, Subsampling};
pub use planes::InvalidNumberOfPlanesError;
#[cfg(feature = "turbojpeg")]
pub use source::{TurboJpegProvider, decode_single, decode_stitched};
pub use source::JpegSource;
pub use stitch::{StitchPlan, stitch};

pub mod codec;

mod clip;
mod config;
mod copy;
mod error;
mod frame;
mod image;
mod image_traits;
mod layout;
mod loader;
#[cfg(feature = "multi-thread")]
mod multi_thread;
mod pixel_format;
mod plane_decs;
mod planes;
mod source;
mod stitch;
mod util;
