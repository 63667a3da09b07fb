//! YUV4MPEG2 source clip and sink.
//!
//! Only 8-bit planar streams are handled. Frame headers may carry parameters; they are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::format::PixelFormat;
use crate::frame::frame::{FieldBased, FrameProps, FrameRef, VideoFrame};
use crate::frame::plane::Plane;
use crate::host::node::{Activation, FrameContext, Node};
use crate::pipeline::sink::{FrameSink, SinkConfig};
use crate::stream::VideoInfo;

const MAGIC: &str = "YUV4MPEG2";
const FRAME_TAG: &[u8] = b"FRAME";

/// Stream parameters from a YUV4MPEG2 header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Y4mHeader {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Sample layout.
    pub format: PixelFormat,
    /// Interlacing declared by the `I` tag.
    pub field_based: FieldBased,
}

impl Y4mHeader {
    /// Bytes of picture data per frame. Fails when the size does not fit in `usize`.
    pub fn frame_size(&self) -> DeintResult<usize> {
        let mut total = 0usize;
        for i in 0..self.format.num_planes() {
            let (w, h) = self.format.plane_dimensions(i, self.width, self.height);
            total = (w as usize)
                .checked_mul(h as usize)
                .and_then(|len| total.checked_add(len))
                .ok_or_else(|| {
                    DeintError::validation(format!(
                        "y4m frame size overflows for {}x{}",
                        self.width, self.height
                    ))
                })?;
        }
        Ok(total)
    }
}

/// Parse the stream header line (without the trailing newline).
pub fn parse_header(line: &str) -> DeintResult<Y4mHeader> {
    let mut tokens = line.split(' ').filter(|t| !t.is_empty());
    if tokens.next() != Some(MAGIC) {
        return Err(DeintError::validation("not a YUV4MPEG2 stream"));
    }

    let mut width = None;
    let mut height = None;
    let mut fps = None;
    let mut format = PixelFormat::Yuv420p;
    let mut field_based = FieldBased::Progressive;

    for tok in tokens {
        let Some((tag, val)) = tok.split_at_checked(1) else {
            return Err(DeintError::validation(format!(
                "bad y4m header token '{tok}'"
            )));
        };
        match tag {
            "W" => width = Some(parse_dim("W", val)?),
            "H" => height = Some(parse_dim("H", val)?),
            "F" => fps = Some(parse_ratio(val)?),
            "I" => field_based = parse_interlacing(val)?,
            "C" => format = parse_colorspace(val)?,
            // Aspect ratio and extensions do not affect sample layout.
            "A" | "X" => {}
            _ => tracing::debug!(token = tok, "ignoring unknown y4m header token"),
        }
    }

    let width = width.ok_or_else(|| DeintError::validation("y4m header lacks W"))?;
    let height = height.ok_or_else(|| DeintError::validation("y4m header lacks H"))?;
    let fps = fps.ok_or_else(|| DeintError::validation("y4m header lacks F"))?;
    Ok(Y4mHeader {
        width,
        height,
        fps,
        format,
        field_based,
    })
}

fn parse_dim(tag: &str, val: &str) -> DeintResult<u32> {
    match val.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DeintError::validation(format!(
            "y4m {tag} must be a positive integer, got '{val}'"
        ))),
    }
}

fn parse_ratio(val: &str) -> DeintResult<Fps> {
    let (num, den) = val
        .split_once(':')
        .ok_or_else(|| DeintError::validation(format!("y4m F must be num:den, got '{val}'")))?;
    let num = num
        .parse::<u32>()
        .map_err(|_| DeintError::validation(format!("bad y4m frame rate '{val}'")))?;
    let den = den
        .parse::<u32>()
        .map_err(|_| DeintError::validation(format!("bad y4m frame rate '{val}'")))?;
    Fps::new(num, den)
}

fn parse_interlacing(val: &str) -> DeintResult<FieldBased> {
    match val {
        "t" => Ok(FieldBased::TopFirst),
        "b" => Ok(FieldBased::BottomFirst),
        "p" | "m" | "?" => Ok(FieldBased::Progressive),
        other => Err(DeintError::validation(format!(
            "unknown y4m interlacing '{other}'"
        ))),
    }
}

fn parse_colorspace(val: &str) -> DeintResult<PixelFormat> {
    match val {
        "420jpeg" | "420paldv" | "420mpeg2" | "420" => Ok(PixelFormat::Yuv420p),
        "422" => Ok(PixelFormat::Yuv422p),
        "444" => Ok(PixelFormat::Yuv444p),
        "411" => Ok(PixelFormat::Yuv411p),
        "mono" => Ok(PixelFormat::Gray8),
        other => Err(DeintError::validation(format!(
            "unsupported y4m colorspace '{other}'"
        ))),
    }
}

fn colorspace_tag(format: PixelFormat) -> &'static str {
    match format {
        PixelFormat::Gray8 => "mono",
        PixelFormat::Yuv420p => "420",
        PixelFormat::Yuv422p => "422",
        PixelFormat::Yuv444p => "444",
        PixelFormat::Yuv411p => "411",
    }
}

/// Source clip reading frames from a YUV4MPEG2 file on demand.
///
/// Frame offsets are indexed once at open; each request seeks and reads one frame.
pub struct Y4mClip {
    name: String,
    header: Y4mHeader,
    info: VideoInfo,
    frame_size: usize,
    offsets: Vec<u64>,
    file: Mutex<File>,
}

impl Y4mClip {
    /// Open `path`, parse its header and index its frames.
    pub fn open(path: impl AsRef<Path>) -> DeintResult<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        let header_line = std::str::from_utf8(trim_newline(&line))
            .map_err(|_| DeintError::validation("y4m header is not valid UTF-8"))?;
        let header = parse_header(header_line)?;
        let frame_size = header.frame_size()?;

        let file_len = reader.get_ref().metadata()?.len();
        let mut pos = line.len() as u64;
        let mut offsets = Vec::new();
        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            if !line.starts_with(FRAME_TAG) {
                return Err(DeintError::validation(format!(
                    "expected FRAME marker at byte {pos}"
                )));
            }
            let data = pos + n as u64;
            if frame_size as u64 > file_len.saturating_sub(data) {
                return Err(DeintError::validation(format!(
                    "y4m frame {} is truncated",
                    offsets.len()
                )));
            }
            offsets.push(data);
            pos = data + frame_size as u64;
            reader.seek(SeekFrom::Start(pos))?;
        }

        let info = VideoInfo {
            format: header.format,
            width: header.width,
            height: header.height,
            fps: header.fps,
            num_frames: offsets.len() as u64,
        };
        tracing::debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            frames = info.num_frames,
            format = ?info.format,
            "opened y4m"
        );

        Ok(Self {
            name: display_name(path),
            header,
            info,
            frame_size,
            offsets,
            file: Mutex::new(reader.into_inner()),
        })
    }

    /// Parsed stream header.
    pub fn header(&self) -> &Y4mHeader {
        &self.header
    }

    /// Interlacing declared by the stream header.
    pub fn field_based(&self) -> FieldBased {
        self.header.field_based
    }

    fn read_frame(&self, n: FrameIndex) -> DeintResult<VideoFrame> {
        let offset = *self.offsets.get(n.0 as usize).ok_or_else(|| {
            DeintError::validation(format!("frame {} out of range for '{}'", n.0, self.name))
        })?;

        let mut buf = vec![0u8; self.frame_size];
        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| DeintError::Other(anyhow::anyhow!("y4m reader lock poisoned")))?;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut buf)?;
        }

        let format = self.header.format;
        let mut planes = Vec::with_capacity(format.num_planes());
        let mut at = 0usize;
        for i in 0..format.num_planes() {
            let (w, h) = format.plane_dimensions(i, self.header.width, self.header.height);
            let len = w as usize * h as usize;
            let data = buf[at..at + len].to_vec();
            planes.push(Plane::from_raw(w, h, w as usize, data)?);
            at += len;
        }

        let fps = self.header.fps;
        let props = FrameProps {
            field_based: self.header.field_based,
            duration: Some((u64::from(fps.den), u64::from(fps.num))),
        };
        VideoFrame::from_planes(format, self.header.width, self.header.height, planes, props)
    }
}

impl Node for Y4mClip {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(
        &self,
        n: FrameIndex,
        _activation: Activation,
        _ctx: &mut FrameContext,
    ) -> DeintResult<Option<FrameRef>> {
        Ok(Some(self.read_frame(n)?.into_ref()))
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sink writing a progressive YUV4MPEG2 stream.
pub struct Y4mSink<W: Write + Send> {
    out: W,
    info: Option<VideoInfo>,
}

impl Y4mSink<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it.
    pub fn create(path: impl AsRef<Path>) -> DeintResult<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> Y4mSink<W> {
    /// Write to `out`.
    pub fn new(out: W) -> Self {
        Self { out, info: None }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> FrameSink for Y4mSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> DeintResult<()> {
        let info = cfg.info;
        writeln!(
            self.out,
            "{MAGIC} W{} H{} F{}:{} Ip A1:1 C{}",
            info.width,
            info.height,
            info.fps.num,
            info.fps.den,
            colorspace_tag(info.format)
        )?;
        self.info = Some(info);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRef) -> DeintResult<()> {
        let info = self
            .info
            .ok_or_else(|| DeintError::validation("y4m sink: push_frame before begin"))?;
        if frame.format() != info.format
            || frame.width() != info.width
            || frame.height() != info.height
        {
            return Err(DeintError::validation(format!(
                "y4m sink: frame {} does not match stream geometry",
                idx.0
            )));
        }

        self.out.write_all(FRAME_TAG)?;
        self.out.write_all(b"\n")?;
        for i in 0..frame.num_planes() {
            let view = frame.plane(i).view();
            for y in 0..view.height() {
                self.out.write_all(view.row(y))?;
            }
        }
        Ok(())
    }

    fn end(&mut self) -> DeintResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/y4m.rs"]
mod tests;
