//! Video classification.
//!
//! A file counts as a video when the prober reports a video stream carrying
//! a moving-picture codec. Images and cover art also surface as ffprobe
//! "video" streams, so still-image codecs are excluded. Classification never
//! fails: an unprobeable file is simply not a video.

use std::path::Path;

use log::debug;

use crate::external::{MediaProber, MediaSummary};

/// Codecs ffprobe reports for still images and attached pictures.
const STILL_IMAGE_CODECS: &[&str] = &[
    "png", "apng", "mjpeg", "jpegls", "jpeg2000", "bmp", "tiff", "webp", "gif", "ppm", "pgm",
    "pbm", "pam", "targa", "dpx", "exr", "qoi", "sgi", "pcx", "xbm", "xwd", "ljpeg", "pictor",
    "sunrast", "photocd", "psd", "hdr", "jpegxl", "svg", "alias_pix", "mjpegb",
];

/// Result of classifying a file: whether to encode it and, if so, its
/// duration for progress output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Video { duration: Option<f64> },
    NotVideo,
}

impl Classification {
    #[must_use]
    pub fn is_video(&self) -> bool {
        matches!(self, Classification::Video { .. })
    }
}

/// Classifies `path` using `prober`. Probe failures are logged at debug
/// level and yield `NotVideo`.
pub fn classify<P: MediaProber>(prober: &P, path: &Path) -> Classification {
    match prober.probe(path) {
        Ok(summary) if has_moving_video(&summary) => Classification::Video {
            duration: summary.duration.filter(|d| d.is_finite() && *d > 0.0),
        },
        Ok(_) => Classification::NotVideo,
        Err(e) => {
            debug!("Treating {} as non-video: {e}", path.display());
            Classification::NotVideo
        }
    }
}

/// True when any stream is a video stream with a non-image codec.
#[must_use]
pub fn has_moving_video(summary: &MediaSummary) -> bool {
    summary.streams.iter().any(|stream| {
        stream.codec_type.as_deref() == Some("video")
            && stream
                .codec_name
                .as_deref()
                .is_none_or(|codec| !STILL_IMAGE_CODECS.contains(&codec.to_ascii_lowercase().as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockMediaProber, stream};

    #[test]
    fn test_video_stream_is_video() {
        let prober = MockMediaProber::new();
        let path = Path::new("/media/clip.mp4");
        prober.expect_video(path, "h264", Some(12.5));

        assert_eq!(
            classify(&prober, path),
            Classification::Video {
                duration: Some(12.5)
            }
        );
    }

    #[test]
    fn test_images_and_audio_are_not_video() {
        let prober = MockMediaProber::new();
        let image = Path::new("/media/photo.jpg");
        let song = Path::new("/media/song.mp3");
        prober.expect_summary(
            image,
            MediaSummary {
                streams: vec![stream("video", "mjpeg")],
                duration: None,
            },
        );
        // MP3 with embedded cover art
        prober.expect_summary(
            song,
            MediaSummary {
                streams: vec![stream("audio", "mp3"), stream("video", "png")],
                duration: Some(200.0),
            },
        );

        assert_eq!(classify(&prober, image), Classification::NotVideo);
        assert_eq!(classify(&prober, song), Classification::NotVideo);
    }

    #[test]
    fn test_probe_failure_is_not_video() {
        let prober = MockMediaProber::new();
        let path = Path::new("/media/notes.txt");
        prober.expect_error(path, "Invalid data found when processing input");
        assert!(!classify(&prober, path).is_video());

        // No expectation at all behaves the same
        assert!(!classify(&prober, Path::new("/media/other.bin")).is_video());
    }

    #[test]
    fn test_unknown_duration_is_dropped() {
        let prober = MockMediaProber::new();
        let path = Path::new("/media/stream.ts");
        prober.expect_video(path, "mpeg2video", Some(0.0));
        assert_eq!(
            classify(&prober, path),
            Classification::Video { duration: None }
        );
    }
}
