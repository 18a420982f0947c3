/// Face vertex groups (`P`, `P/T`, `P//N`, `P/T/N`)
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, space0, space1, u32 as index},
    combinator::{all_consuming, map, opt, success},
    multi::separated_list1,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::ParseErrorKind;

/// One vertex of a face line.
///
/// Values are 0-based once returned from [`parse_face`]; OBJ files store
/// them 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceVertex {
    Position(u32),
    PositionUv(u32, u32),
    PositionNormal(u32, u32),
    PositionUvNormal(u32, u32, u32),
}

/// Index layout of a face vertex, independent of the index values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceLayout {
    Position,
    PositionUv,
    PositionNormal,
    PositionUvNormal,
}

impl FaceVertex {
    pub fn position(&self) -> u32 {
        match *self {
            FaceVertex::Position(p)
            | FaceVertex::PositionUv(p, _)
            | FaceVertex::PositionNormal(p, _)
            | FaceVertex::PositionUvNormal(p, _, _) => p,
        }
    }

    pub fn uv(&self) -> Option<u32> {
        match *self {
            FaceVertex::PositionUv(_, t) | FaceVertex::PositionUvNormal(_, t, _) => Some(t),
            _ => None,
        }
    }

    pub fn normal(&self) -> Option<u32> {
        match *self {
            FaceVertex::PositionNormal(_, n) | FaceVertex::PositionUvNormal(_, _, n) => Some(n),
            _ => None,
        }
    }

    pub fn layout(&self) -> FaceLayout {
        match self {
            FaceVertex::Position(..) => FaceLayout::Position,
            FaceVertex::PositionUv(..) => FaceLayout::PositionUv,
            FaceVertex::PositionNormal(..) => FaceLayout::PositionNormal,
            FaceVertex::PositionUvNormal(..) => FaceLayout::PositionUvNormal,
        }
    }

    /// Convert every 1-based file index to 0-based
    fn to_zero_based(self) -> Result<Self, ParseErrorKind> {
        let dec = |k: u32| k.checked_sub(1).ok_or(ParseErrorKind::ZeroIndex);
        Ok(match self {
            FaceVertex::Position(p) => FaceVertex::Position(dec(p)?),
            FaceVertex::PositionUv(p, t) => FaceVertex::PositionUv(dec(p)?, dec(t)?),
            FaceVertex::PositionNormal(p, n) => FaceVertex::PositionNormal(dec(p)?, dec(n)?),
            FaceVertex::PositionUvNormal(p, t, n) => {
                FaceVertex::PositionUvNormal(dec(p)?, dec(t)?, dec(n)?)
            }
        })
    }
}

/// Parse a single group such as `3`, `3/1`, `3//2` or `3/1/2` (1-based)
pub fn parse_face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, p) = index(input)?;
    alt((
        map(preceded(tag("//"), index), move |n| {
            FaceVertex::PositionNormal(p, n)
        }),
        map(
            preceded(char('/'), pair(index, opt(preceded(char('/'), index)))),
            move |(t, n)| match n {
                Some(n) => FaceVertex::PositionUvNormal(p, t, n),
                None => FaceVertex::PositionUv(p, t),
            },
        ),
        success(FaceVertex::Position(p)),
    ))(input)
}

fn face_groups(input: &str) -> IResult<&str, Vec<FaceVertex>> {
    let (input, _) = space0(input)?;
    let (input, groups) = separated_list1(space1, parse_face_vertex)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, groups))
}

/// Parse the remainder of an `f` line into exactly three 0-based vertices
pub fn parse_face(input: &str) -> Result<[FaceVertex; 3], ParseErrorKind> {
    let groups = match all_consuming(face_groups)(input) {
        Ok((_, groups)) => groups,
        Err(_) => {
            let bad = input
                .split_whitespace()
                .find(|group| all_consuming(parse_face_vertex)(group).is_err())
                .unwrap_or(input.trim());
            return Err(ParseErrorKind::MalformedFaceVertex(bad.to_string()));
        }
    };

    let [a, b, c]: [FaceVertex; 3] = groups
        .as_slice()
        .try_into()
        .map_err(|_| ParseErrorKind::NotATriangle {
            groups: groups.len(),
        })?;

    if a.layout() != b.layout() || a.layout() != c.layout() {
        return Err(ParseErrorKind::MixedFaceLayout);
    }

    Ok([a.to_zero_based()?, b.to_zero_based()?, c.to_zero_based()?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_layouts() {
        assert_eq!(parse_face_vertex("7"), Ok(("", FaceVertex::Position(7))));
        assert_eq!(parse_face_vertex("7/2"), Ok(("", FaceVertex::PositionUv(7, 2))));
        assert_eq!(
            parse_face_vertex("7//3"),
            Ok(("", FaceVertex::PositionNormal(7, 3)))
        );
        assert_eq!(
            parse_face_vertex("7/2/3"),
            Ok(("", FaceVertex::PositionUvNormal(7, 2, 3)))
        );
    }

    #[test]
    fn test_full_groups_are_zero_based() {
        let face = parse_face("1/1/1 2/2/2 3/3/3").unwrap();
        assert_eq!(
            face,
            [
                FaceVertex::PositionUvNormal(0, 0, 0),
                FaceVertex::PositionUvNormal(1, 1, 1),
                FaceVertex::PositionUvNormal(2, 2, 2),
            ]
        );
    }

    #[test]
    fn test_position_normal_groups_have_no_uv() {
        let face = parse_face("1//1 2//2 3//3").unwrap();
        assert!(face.iter().all(|v| v.uv().is_none()));
        assert_eq!(
            face.iter().map(|v| v.normal()).collect::<Vec<_>>(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_index_conversion() {
        for k in [1u32, 2, 10, 65_536] {
            let line = format!("{k} {k} {k}");
            let face = parse_face(&line).unwrap();
            assert!(face.iter().all(|v| v.position() == k - 1));
        }
    }

    #[test]
    fn test_extra_whitespace_is_accepted() {
        let face = parse_face("  1/2   3/4\t5/6  ").unwrap();
        assert_eq!(face[2], FaceVertex::PositionUv(4, 5));
    }

    #[test]
    fn test_zero_index_rejected() {
        assert_eq!(parse_face("0 1 2"), Err(ParseErrorKind::ZeroIndex));
    }

    #[test]
    fn test_quad_rejected() {
        assert_eq!(
            parse_face("1 2 3 4"),
            Err(ParseErrorKind::NotATriangle { groups: 4 })
        );
    }

    #[test]
    fn test_mixed_layout_rejected() {
        assert_eq!(
            parse_face("1/1 2//2 3"),
            Err(ParseErrorKind::MixedFaceLayout)
        );
    }

    #[test]
    fn test_negative_index_rejected() {
        assert_eq!(
            parse_face("-1 -2 -3"),
            Err(ParseErrorKind::MalformedFaceVertex("-1".to_string()))
        );
    }

    #[test]
    fn test_empty_face_rejected() {
        assert!(matches!(
            parse_face("   "),
            Err(ParseErrorKind::MalformedFaceVertex(_))
        ));
    }
}
