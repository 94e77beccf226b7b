use std::io::{ErrorKind, Read};

use serde::Serialize;

use crate::config::BYTES_PER_PIXEL;

/// Frame size of the video stream, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Returns `None` unless both dimensions are positive.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one rgb24 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// Sequential supplier of raw rgb24 frames.
pub trait FrameSource {
    /// Fill `buffer` with the next frame. Returns `Ok(false)` once the stream has ended.
    fn read_frame_into(&mut self, buffer: &mut Vec<u8>) -> std::io::Result<bool>;
}

/// Frames cut from any byte stream, `frame_len` bytes at a time.
pub struct ReaderFrameSource<R> {
    reader: R,
    frame_len: usize,
}

impl<R: Read> ReaderFrameSource<R> {
    pub fn new(reader: R, resolution: Resolution) -> Self {
        Self {
            reader,
            frame_len: resolution.frame_len(),
        }
    }
}

impl<R: Read> FrameSource for ReaderFrameSource<R> {
    fn read_frame_into(&mut self, buffer: &mut Vec<u8>) -> std::io::Result<bool> {
        buffer.resize(self.frame_len, 0);
        match self.reader.read_exact(buffer) {
            Ok(()) => Ok(true),
            // closed pipe or a truncated last frame both mean end of stream
            Err(e) if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe) => {
                buffer.clear();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_resolution_rejects_zero() {
        assert!(Resolution::new(0, 10).is_none());
        assert!(Resolution::new(10, 0).is_none());
        let r = Resolution::new(6, 4).unwrap();
        assert_eq!(r.frame_len(), 72);
    }

    #[test]
    fn test_reader_source_splits_frames() {
        let resolution = Resolution::new(2, 2).unwrap();
        let mut data = vec![1u8; 12];
        data.extend(vec![2u8; 12]);
        let mut source = ReaderFrameSource::new(Cursor::new(data), resolution);

        let mut buffer = Vec::new();
        assert!(source.read_frame_into(&mut buffer).unwrap());
        assert_eq!(buffer, vec![1u8; 12]);
        assert!(source.read_frame_into(&mut buffer).unwrap());
        assert_eq!(buffer, vec![2u8; 12]);
        assert!(!source.read_frame_into(&mut buffer).unwrap());
    }

    #[test]
    fn test_truncated_frame_is_end_of_stream() {
        let resolution = Resolution::new(2, 2).unwrap();
        let mut source = ReaderFrameSource::new(Cursor::new(vec![0u8; 17]), resolution);
        let mut buffer = Vec::new();
        assert!(source.read_frame_into(&mut buffer).unwrap());
        assert!(!source.read_frame_into(&mut buffer).unwrap());
        assert!(buffer.is_empty());
    }

    struct ClosedPipe;

    impl Read for ClosedPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_closed_pipe_is_end_of_stream() {
        let resolution = Resolution::new(2, 2).unwrap();
        let mut source = ReaderFrameSource::new(ClosedPipe, resolution);
        let mut buffer = vec![9u8; 4];
        assert!(!source.read_frame_into(&mut buffer).unwrap());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_other_read_errors_propagate() {
        let resolution = Resolution::new(2, 2).unwrap();
        let mut source = ReaderFrameSource::new(Failing, resolution);
        let mut buffer = Vec::new();
        let err = source.read_frame_into(&mut buffer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_serializes_as_object() {
        let r = Resolution::new(1920, 1080).unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"width":1920,"height":1080}"#);
    }
}
