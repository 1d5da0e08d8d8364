use crate::{Error, Image, ImageInfo, Loader, codec::CodecProvider, source::decode_serial};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Decode all `inputs` in parallel, every task gets its own codec
///
/// The images are returned in the order of `inputs`. The first failure is returned and the remaining tasks are
/// not awaited for their images.
pub(crate) fn decode_multi_thread<P, D>(
    provider: &P,
    inputs: &[(D, ImageInfo)],
    alignment: usize,
    truncate: bool,
) -> Result<Vec<Image>, Error>
where
    P: CodecProvider,
    D: AsRef<[u8]> + Sync,
{
    let threads = num_cpus::get();

    if threads == 1 || inputs.len() < 2 {
        return decode_serial(provider, inputs, alignment, truncate);
    }

    log::debug!("decoding {} images on up to {threads} threads", inputs.len());

    inputs
        .par_iter()
        .map(|(data, info)| {
            Loader::new(provider.codec()?)
                .with_alignment(alignment)
                .load_with_info(data.as_ref(), info, truncate)
        })
        .collect()
}
