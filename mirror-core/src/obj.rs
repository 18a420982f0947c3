/// Wavefront OBJ loader for triangle meshes
///
/// Supports `v`, `vn`, `vt` and triangular `f` lines. Comments and blank
/// lines are skipped; unknown line types are logged and skipped.
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::{Point3, Vector2, Vector3};
use tracing::{debug, info, warn};

use crate::error::{ObjError, ParseErrorKind};
use crate::face::{parse_face, FaceVertex};
use crate::geometry::{InterleavedMesh, RawMesh};
use crate::interleave::interleave;
use crate::normals::synthesize_normals;
use crate::source;
use crate::vector::{parse_point3, parse_vec2, parse_vec3};

/// Line type, resolved from the leading token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Position,
    Normal,
    TexCoord,
    Face,
    Comment,
    Unknown,
}

impl LineKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "v" => LineKind::Position,
            "vn" => LineKind::Normal,
            "vt" => LineKind::TexCoord,
            "f" => LineKind::Face,
            "" => LineKind::Comment,
            t if t.starts_with('#') => LineKind::Comment,
            _ => LineKind::Unknown,
        }
    }
}

/// A single parsed OBJ line
#[derive(Debug, Clone, PartialEq)]
pub enum ObjLine {
    Position(Point3<f32>),
    Normal(Vector3<f32>),
    TexCoord(Vector2<f32>),
    Face([FaceVertex; 3]),
    Blank,
    Unrecognized(String),
}

/// Parse one line of OBJ text
pub fn parse_line(line: &str) -> Result<ObjLine, ParseErrorKind> {
    let trimmed = line.trim();
    let (tag, rest) = trimmed
        .split_once(|c: char| c.is_ascii_whitespace())
        .unwrap_or((trimmed, ""));

    Ok(match LineKind::from_tag(tag) {
        LineKind::Position => ObjLine::Position(parse_point3(rest)?),
        LineKind::Normal => ObjLine::Normal(parse_vec3(rest)?),
        LineKind::TexCoord => ObjLine::TexCoord(parse_vec2(rest)?),
        LineKind::Face => ObjLine::Face(parse_face(rest)?),
        LineKind::Comment => ObjLine::Blank,
        LineKind::Unknown => ObjLine::Unrecognized(tag.to_string()),
    })
}

/// A line that was skipped because its type is not supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
}

/// Summary of a load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of lines read
    pub lines: usize,
    pub skipped: Vec<SkippedLine>,
    pub normals_synthesized: bool,
    pub triangle_count: usize,
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct ObjLoad {
    pub mesh: InterleavedMesh,
    pub report: LoadReport,
}

/// Configurable OBJ loader
#[derive(Debug, Clone, Default)]
pub struct ObjLoader {
    cancel: Option<Arc<AtomicBool>>,
}

impl ObjLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort loading with [`ObjError::Cancelled`] once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn load_path(&self, path: &Path) -> Result<ObjLoad, ObjError> {
        let reader = source::open(path)?;
        let origin = path.display().to_string();
        let load = self.load_from(reader, &origin)?;
        info!(
            "Loaded OBJ '{}': {} triangles, {} skipped lines",
            origin,
            load.report.triangle_count,
            load.report.skipped.len()
        );
        Ok(load)
    }

    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<ObjLoad, ObjError> {
        self.load_from(reader, "<reader>")
    }

    pub fn load_str(&self, text: &str) -> Result<ObjLoad, ObjError> {
        self.load_from(io::Cursor::new(text), "<string>")
    }

    /// Parse into attribute arrays and index streams without any
    /// validation, normal synthesis or interleaving
    pub fn read_raw<R: BufRead>(&self, reader: R) -> Result<(RawMesh, LoadReport), ObjError> {
        self.read_raw_from(reader, "<reader>")
    }

    fn load_from<R: BufRead>(&self, reader: R, origin: &str) -> Result<ObjLoad, ObjError> {
        let (mut raw, mut report) = self.read_raw_from(reader, origin)?;

        raw.validate()?;
        report.normals_synthesized = synthesize_normals(&mut raw)?;
        if report.normals_synthesized {
            debug!("Synthesized {} vertex normals for '{}'", raw.normals.len(), origin);
        }

        let mesh = interleave(&raw)?;
        report.triangle_count = mesh.triangle_count();
        Ok(ObjLoad { mesh, report })
    }

    fn read_raw_from<R: BufRead>(
        &self,
        mut reader: R,
        origin: &str,
    ) -> Result<(RawMesh, LoadReport), ObjError> {
        let mut raw = RawMesh::new();
        let mut report = LoadReport::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ObjError::SourceUnavailable {
                    origin: origin.to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_no += 1;
            if self.is_cancelled() {
                return Err(ObjError::Cancelled { line: line_no });
            }

            // Stray non-UTF-8 bytes (often in comments) decode as U+FFFD
            let line = decode_line(&buf);
            report.lines = line_no;

            let parsed = parse_line(&line).map_err(|kind| ObjError::Parse {
                line: line_no,
                text: line.trim().to_string(),
                kind,
            })?;

            match parsed {
                ObjLine::Position(p) => raw.positions.push(p),
                ObjLine::Normal(n) => raw.normals.push(n),
                ObjLine::TexCoord(uv) => raw.uvs.push(uv),
                ObjLine::Face(face) => raw.push_face(&face),
                ObjLine::Blank => {}
                ObjLine::Unrecognized(_) => {
                    warn!("Cannot parse OBJ line {}: {}", line_no, line);
                    report.skipped.push(SkippedLine {
                        line: line_no,
                        text: line,
                    });
                }
            }
        }

        Ok((raw, report))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Load an OBJ file with default options
pub fn load_obj(path: &Path) -> Result<ObjLoad, ObjError> {
    ObjLoader::new().load_path(path)
}
