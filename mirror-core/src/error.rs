/// Errors raised while loading an OBJ mesh
use std::fmt;
use std::io;

/// Which per-vertex attribute an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    Normal,
    TexCoord,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Position => "position",
            Attribute::Normal => "normal",
            Attribute::TexCoord => "uv",
        };
        f.write_str(name)
    }
}

/// Why a single OBJ line was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("malformed number")]
    MalformedNumber,

    #[error("expected {expected} components")]
    MissingComponent { expected: usize },

    #[error("unexpected trailing input")]
    TrailingInput,

    #[error("OBJ indices are 1-based; found 0")]
    ZeroIndex,

    #[error("face has {groups} vertices, only triangles are supported")]
    NotATriangle { groups: usize },

    #[error("face vertices use different index layouts")]
    MixedFaceLayout,

    #[error("malformed face vertex '{0}'")]
    MalformedFaceVertex(String),
}

/// Errors that abort the load of a mesh.
///
/// Unrecognized line tags are not errors: they are logged and recorded in
/// the [`LoadReport`](crate::obj::LoadReport).
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("cannot read OBJ source '{origin}': {source}")]
    SourceUnavailable {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {kind} in '{text}'")]
    Parse {
        line: usize,
        text: String,
        kind: ParseErrorKind,
    },

    #[error("{attribute} index {index} out of range ({len} available)")]
    InvalidIndex {
        attribute: Attribute,
        index: u32,
        len: usize,
    },

    #[error("{attribute} index stream has {found} entries, expected {expected}")]
    MismatchedIndexStreams {
        attribute: Attribute,
        expected: usize,
        found: usize,
    },

    #[error("vertex {index} has no usable adjacent face to derive a normal from")]
    DegenerateVertex { index: usize },

    #[error("load cancelled before line {line}")]
    Cancelled { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_carries_line_and_text() {
        let err = ObjError::Parse {
            line: 7,
            text: "v 1 x 3".to_string(),
            kind: ParseErrorKind::MalformedNumber,
        };
        assert_eq!(err.to_string(), "line 7: malformed number in 'v 1 x 3'");
    }

    #[test]
    fn test_invalid_index_message() {
        let err = ObjError::InvalidIndex {
            attribute: Attribute::TexCoord,
            index: 4,
            len: 2,
        };
        assert_eq!(err.to_string(), "uv index 4 out of range (2 available)");
    }
}
