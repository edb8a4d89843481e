//! Single-frame extraction using FFmpeg

use crate::{Error, Result};
use ffmpeg_next as ffmpeg;
use image::RgbImage;
use std::path::Path;
use std::sync::Once;
use tracing::{debug, warn};

static FFMPEG_INIT: Once = Once::new();

/// Initialize FFmpeg (once per process). Only its error messages are printed;
/// broken candidates are reported through our errors as well.
fn init_ffmpeg() {
    FFMPEG_INIT.call_once(|| {
        if let Err(err) = ffmpeg::init() {
            warn!("FFmpeg initialization failed: {}", err);
        }
        ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
    });
}

/// Source of sampled frames.
///
/// Every failure (missing file, unknown container, offset past the end,
/// undecodable stream) is returned as an error for that one file.
pub trait FrameSampler {
    /// Returns the first frame decoded at or after the keyframe preceding
    /// `offset_seconds`.
    fn extract_frame(&self, path: &Path, offset_seconds: u32) -> Result<RgbImage>;
}

impl<S: FrameSampler + ?Sized> FrameSampler for &S {
    fn extract_frame(&self, path: &Path, offset_seconds: u32) -> Result<RgbImage> {
        (**self).extract_frame(path, offset_seconds)
    }
}

/// Frame sampler backed by libavformat/libavcodec
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegSampler;

impl FfmpegSampler {
    pub fn new() -> Self {
        init_ffmpeg();
        Self
    }
}

impl FrameSampler for FfmpegSampler {
    fn extract_frame(&self, path: &Path, offset_seconds: u32) -> Result<RgbImage> {
        init_ffmpeg();

        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        // The input context closes the container when dropped, on every return path.
        let mut input = ffmpeg::format::input(path)?;

        let (video_stream_index, mut decoder) = {
            let video_stream = input
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or(Error::NoVideoStream)?;

            let context =
                ffmpeg::codec::context::Context::from_parameters(video_stream.parameters())?;
            (video_stream.index(), context.decoder().video()?)
        };

        // Container-wide time base, not the video stream's; the frame found is
        // therefore only close to the requested offset.
        let target = i64::from(offset_seconds) * i64::from(ffmpeg::ffi::AV_TIME_BASE);
        let duration = input.duration();
        if duration > 0 && target >= duration {
            return Err(Error::OffsetPastEnd {
                offset_seconds,
                duration_seconds: duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE),
            });
        }

        input.seek(target, ..target)?;

        let mut decoded = ffmpeg::frame::Video::empty();
        for (stream, packet) in input.packets() {
            if stream.index() != video_stream_index {
                continue;
            }
            if let Err(err) = decoder.send_packet(&packet) {
                debug!("Skipping undecodable packet in {}: {}", path.display(), err);
                continue;
            }
            if decoder.receive_frame(&mut decoded).is_ok() {
                return frame_to_rgb(&decoded);
            }
        }

        // Drain frames still buffered in the decoder
        decoder.send_eof()?;
        if decoder.receive_frame(&mut decoded).is_ok() {
            return frame_to_rgb(&decoded);
        }

        Err(Error::NoFrame)
    }
}

/// Converts a decoded frame to interleaved RGB, dropping the line padding
fn frame_to_rgb(decoded: &ffmpeg::frame::Video) -> Result<RgbImage> {
    let width = decoded.width();
    let height = decoded.height();
    if width == 0 || height == 0 {
        return Err(Error::InvalidFrame);
    }

    let mut scaler = ffmpeg::software::scaling::Context::get(
        decoded.format(),
        width,
        height,
        ffmpeg::format::Pixel::RGB24,
        width,
        height,
        ffmpeg::software::scaling::Flags::BILINEAR,
    )?;

    let mut rgb_frame = ffmpeg::frame::Video::empty();
    scaler.run(decoded, &mut rgb_frame)?;

    let stride = rgb_frame.stride(0);
    let row_bytes = width as usize * 3;
    let data = rgb_frame.data(0);

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let line = data
            .get(start..start + row_bytes)
            .ok_or(Error::InvalidFrame)?;
        pixels.extend_from_slice(line);
    }

    RgbImage::from_raw(width, height, pixels).ok_or(Error::InvalidFrame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_library_errors_stay_visible() {
        FfmpegSampler::new();

        assert!(matches!(
            ffmpeg::util::log::get_level(),
            Ok(ffmpeg::util::log::Level::Error)
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.mp4");

        let result = FfmpegSampler::new().extract_frame(&path, 5);

        assert!(matches!(result, Err(Error::NotFound(p)) if p == path));
    }

    #[test]
    fn test_directory_is_not_a_video() {
        let dir = tempdir().unwrap();

        assert!(FfmpegSampler::new().extract_frame(dir.path(), 5).is_err());
    }

    #[test]
    fn test_garbage_file_fails_without_panicking() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp4");
        fs::write(&path, b"this is not a media container at all").unwrap();

        assert!(FfmpegSampler::new().extract_frame(&path, 5).is_err());
    }

    #[test]
    fn test_empty_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.mkv");
        fs::write(&path, b"").unwrap();

        assert!(FfmpegSampler::new().extract_frame(&path, 1).is_err());
    }
}
