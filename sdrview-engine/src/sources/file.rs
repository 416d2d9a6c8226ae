use anyhow::Result;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sdrview_messages::{Event, FrameError, SpectrumFrame, WireFormat, wire};

use crate::sink::EventSink;

use super::FrameSource;

/// Replays a capture file of back-to-back wire frames.
#[derive(Debug)]
pub struct FrameFileSource {
    reader: BufReader<File>,
    path: PathBuf,
    format: WireFormat,
    loop_on_eof: bool,
    interval: Duration,
}

impl FrameFileSource {
    /// Open a capture. If `loop_on_eof` is true, the replay restarts from the beginning on EOF.
    pub fn open<P: AsRef<Path>>(
        path: P,
        format: WireFormat,
        loop_on_eof: bool,
        interval: Duration,
    ) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self {
            reader: BufReader::new(file),
            path: path.as_ref().to_path_buf(),
            format,
            loop_on_eof,
            interval,
        })
    }

    /// Read the next complete frame, or `None` at the end of the capture.
    ///
    /// A truncated trailing frame counts as the end of the capture, including one
    /// whose declared length runs past the end of the file. A negative bin count
    /// aborts the replay with `InvalidData` since the next frame boundary is lost.
    /// Frames with a negative sample rate or centre frequency are skipped.
    pub fn next_frame(&mut self) -> io::Result<Option<SpectrumFrame>> {
        let header_len = self.format.header_len();
        let mut rewound = false;

        loop {
            let mut buf = vec![0u8; header_len];
            let mut complete = read_full(&mut self.reader, &mut buf)? == header_len;

            if complete {
                let total = wire::frame_len(self.format, &buf).map_err(invalid_data)?;
                // grows with the bytes actually present, not with the declared count
                let payload = (total - header_len) as u64;
                (&mut self.reader).take(payload).read_to_end(&mut buf)?;
                complete = buf.len() == total;
            }

            if !complete {
                if self.loop_on_eof && !rewound {
                    debug!("Rewinding capture {}", self.path.display());
                    self.reader.seek(SeekFrom::Start(0))?;
                    rewound = true;
                    continue;
                }
                return Ok(None);
            }

            match wire::decode(self.format, &buf) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => debug!("Skipping frame in {}: {}", self.path.display(), e),
            }
        }
    }
}

impl FrameSource for FrameFileSource {
    fn run(&mut self, sink: &EventSink) -> Result<()> {
        info!("Replaying {} every {:?}", self.path.display(), self.interval);
        while let Some(frame) = self.next_frame()? {
            sink.send(Event::Frame(frame))?;
            if sink.cancel_token().sleep(self.interval) {
                return Ok(());
            }
        }
        info!("Capture {} finished", self.path.display());
        Ok(())
    }
}

fn invalid_data(e: FrameError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Fill `buf` as far as the reader allows. Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total_read = 0;
    while total_read < buf.len() {
        match reader.read(&mut buf[total_read..]) {
            Ok(0) => break,
            Ok(n) => total_read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total_read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdrview_messages::Hertz;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn frame(bins: &[f32]) -> SpectrumFrame {
        SpectrumFrame {
            sample_rate: Hertz(1_000_000),
            center_frequency: Hertz::mhz(100),
            capture: None,
            magnitudes: bins.to_vec(),
            peaks: bins.iter().map(|b| b + 1.0).collect(),
        }
    }

    /// Helper function to create a temp capture from frames
    fn create_capture(frames: &[SpectrumFrame], trailing: &[u8]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        for frame in frames {
            temp_file
                .write_all(&wire::encode(WireFormat::Legacy, frame))
                .unwrap();
        }
        temp_file.write_all(trailing).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    fn open(file: &NamedTempFile, loop_on_eof: bool) -> FrameFileSource {
        FrameFileSource::open(file.path(), WireFormat::Legacy, loop_on_eof, Duration::ZERO)
            .unwrap()
    }

    #[test]
    fn test_reads_frames_in_order() {
        let frames = [frame(&[-10.0, -20.0]), frame(&[-30.0, -40.0, -50.0])];
        let temp_file = create_capture(&frames, &[]);
        let mut source = open(&temp_file, false);

        assert_eq!(source.next_frame().unwrap(), Some(frames[0].clone()));
        assert_eq!(source.next_frame().unwrap(), Some(frames[1].clone()));
        assert_eq!(source.next_frame().unwrap(), None);
    }

    #[test]
    fn test_loops_on_eof() {
        let frames = [frame(&[1.0]), frame(&[2.0])];
        let temp_file = create_capture(&frames, &[]);
        let mut source = open(&temp_file, true);

        for expected in frames.iter().cycle().take(5) {
            assert_eq!(source.next_frame().unwrap().as_ref(), Some(expected));
        }
    }

    #[test]
    fn test_truncated_trailing_frame_ends_capture() {
        let full = wire::encode(WireFormat::Legacy, &frame(&[5.0, 6.0]));
        let temp_file = create_capture(&[frame(&[1.0])], &full[..full.len() - 3]);
        let mut source = open(&temp_file, false);

        assert_eq!(source.next_frame().unwrap(), Some(frame(&[1.0])));
        assert_eq!(source.next_frame().unwrap(), None);
    }

    #[test]
    fn test_empty_capture_with_loop_returns_none() {
        let temp_file = create_capture(&[], &[]);
        let mut source = open(&temp_file, true);
        assert_eq!(source.next_frame().unwrap(), None);
    }

    #[test]
    fn test_negative_count_is_invalid_data() {
        let mut header = Vec::new();
        for word in [1_000i32, 1_000, 0, 0, -4] {
            header.extend_from_slice(&word.to_be_bytes());
        }
        let temp_file = create_capture(&[], &header);
        let mut source = open(&temp_file, false);
        let err = source.next_frame().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_oversized_count_ends_capture() {
        let mut header = Vec::new();
        for word in [1_000i32, 1_000, 0, 0, i32::MAX] {
            header.extend_from_slice(&word.to_be_bytes());
        }
        let temp_file = create_capture(&[frame(&[3.0])], &header);

        let mut source = open(&temp_file, false);
        assert_eq!(source.next_frame().unwrap(), Some(frame(&[3.0])));
        assert_eq!(source.next_frame().unwrap(), None);

        let mut source = open(&temp_file, true);
        for _ in 0..3 {
            assert_eq!(source.next_frame().unwrap(), Some(frame(&[3.0])));
        }
    }

    #[test]
    fn test_file_not_found() {
        let result = FrameFileSource::open(
            "/nonexistent/path/to/capture.bin",
            WireFormat::Legacy,
            false,
            Duration::ZERO,
        );
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
