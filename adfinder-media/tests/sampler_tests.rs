use std::path::Path;

use adfinder_media::{score, Error, FfmpegSampler, FrameSampler};
use ffmpeg_next as ffmpeg;
use tempfile::tempdir;

const WIDTH: u32 = 160;
const HEIGHT: u32 = 120;
const FPS: i32 = 25;
const CLIP_SECONDS: i32 = 3;

/// Encodes a short MPEG-4 clip in Matroska whose every frame is bright on the
/// left half and dark on the right half.
///
/// Returns false when this FFmpeg build ships no MPEG-4 encoder.
fn write_clip(path: &Path) -> Result<bool, ffmpeg::Error> {
    let Some(codec) = ffmpeg::encoder::find(ffmpeg::codec::Id::MPEG4) else {
        return Ok(false);
    };
    let time_base = ffmpeg::Rational(1, FPS);

    let mut output = ffmpeg::format::output(&path)?;
    let global_header = output
        .format()
        .flags()
        .contains(ffmpeg::format::Flags::GLOBAL_HEADER);

    let context =
        ffmpeg::codec::context::Context::from_parameters(ffmpeg::codec::Parameters::new())?;
    let mut video = context.encoder().video()?;
    video.set_width(WIDTH);
    video.set_height(HEIGHT);
    video.set_format(ffmpeg::format::Pixel::YUV420P);
    video.set_time_base(time_base);
    video.set_frame_rate(Some(ffmpeg::Rational(FPS, 1)));
    if global_header {
        video.set_flags(ffmpeg::codec::Flags::GLOBAL_HEADER);
    }
    let mut encoder = video.open_as(codec)?;

    let stream_index = {
        let mut stream = output.add_stream(codec)?;
        stream.set_parameters(&encoder);
        stream.set_time_base(time_base);
        stream.index()
    };
    output.write_header()?;
    let stream_time_base = output
        .stream(stream_index)
        .ok_or(ffmpeg::Error::StreamNotFound)?
        .time_base();

    for index in 0..i64::from(FPS * CLIP_SECONDS) {
        let mut frame = ffmpeg::frame::Video::new(ffmpeg::format::Pixel::YUV420P, WIDTH, HEIGHT);
        paint_halves(&mut frame);
        frame.set_pts(Some(index));

        encoder.send_frame(&frame)?;
        write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base)?;
    }

    encoder.send_eof()?;
    write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base)?;
    output.write_trailer()?;
    Ok(true)
}

fn write_packets(
    encoder: &mut ffmpeg::encoder::video::Encoder,
    output: &mut ffmpeg::format::context::Output,
    stream_index: usize,
    encoder_time_base: ffmpeg::Rational,
    stream_time_base: ffmpeg::Rational,
) -> Result<(), ffmpeg::Error> {
    let mut packet = ffmpeg::Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(encoder_time_base, stream_time_base);
        packet.write_interleaved(output)?;
    }
    Ok(())
}

/// Fills the YUV420P planes (respecting stride) with a bright left half and a dark right half
fn paint_halves(frame: &mut ffmpeg::frame::Video) {
    let width = WIDTH as usize;

    let stride = frame.stride(0);
    let luma = frame.data_mut(0);
    for row in 0..HEIGHT as usize {
        let line = &mut luma[row * stride..row * stride + width];
        let (left, right) = line.split_at_mut(width / 2);
        left.fill(235);
        right.fill(16);
    }

    for plane in 1..3 {
        let stride = frame.stride(plane);
        let chroma = frame.data_mut(plane);
        for row in 0..HEIGHT as usize / 2 {
            chroma[row * stride..row * stride + width / 2].fill(128);
        }
    }
}

#[test]
fn test_samples_frames_from_an_encoded_clip() {
    let sampler = FfmpegSampler::new();
    let dir = tempdir().unwrap();
    let path = dir.path().join("halves.mkv");
    if !write_clip(&path).unwrap() {
        eprintln!("No MPEG-4 encoder in this FFmpeg build, skipping");
        return;
    }

    let first = sampler.extract_frame(&path, 1).unwrap();
    let again = sampler.extract_frame(&path, 1).unwrap();
    let later = sampler.extract_frame(&path, 2).unwrap();

    assert_eq!(first.dimensions(), (WIDTH, HEIGHT));
    assert_eq!(score(&first, &again).unwrap().value(), 1.0);
    assert_eq!(score(&first, &later).unwrap().value(), 1.0);

    let bright = first.get_pixel(WIDTH / 4, HEIGHT / 2);
    let dark = first.get_pixel(3 * WIDTH / 4, HEIGHT / 2);
    assert!(bright.0.iter().all(|&c| c > 200), "left half: {bright:?}");
    assert!(dark.0.iter().all(|&c| c < 50), "right half: {dark:?}");
}

#[test]
fn test_offset_past_the_clip_end() {
    let sampler = FfmpegSampler::new();
    let dir = tempdir().unwrap();
    let path = dir.path().join("halves.mkv");
    if !write_clip(&path).unwrap() {
        eprintln!("No MPEG-4 encoder in this FFmpeg build, skipping");
        return;
    }

    for offset in [4, 60] {
        let result = sampler.extract_frame(&path, offset);
        assert!(
            matches!(result, Err(Error::OffsetPastEnd { offset_seconds, .. }) if offset_seconds == offset),
            "offset {offset}s: {result:?}"
        );
    }
}
