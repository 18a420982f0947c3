/// Whitespace-separated float tuples used by `v`, `vn` and `vt` lines
use nalgebra::{Point3, Vector2, Vector3};
use nom::{
    character::complete::{space0, space1},
    combinator::eof,
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::ParseErrorKind;

/// Parse exactly `N` floats, followed by optional extra numeric components
/// (the `w` of `v x y z w`, for instance) which are discarded.
pub fn parse_floats<const N: usize>(input: &str) -> Result<[f32; N], ParseErrorKind> {
    let mut rest = input;
    let mut values = [0.0f32; N];

    for value in values.iter_mut() {
        let after_space = skip_space(rest);
        if after_space.is_empty() {
            return Err(ParseErrorKind::MissingComponent { expected: N });
        }
        let (after_value, parsed) = number(after_space)?;
        *value = parsed;
        rest = after_value;
    }

    match trailing(rest) {
        Ok(_) => Ok(values),
        Err(_) => Err(ParseErrorKind::TrailingInput),
    }
}

pub fn parse_vec3(input: &str) -> Result<Vector3<f32>, ParseErrorKind> {
    let [x, y, z] = parse_floats::<3>(input)?;
    Ok(Vector3::new(x, y, z))
}

pub fn parse_point3(input: &str) -> Result<Point3<f32>, ParseErrorKind> {
    parse_vec3(input).map(Point3::from)
}

pub fn parse_vec2(input: &str) -> Result<Vector2<f32>, ParseErrorKind> {
    let [u, v] = parse_floats::<2>(input)?;
    Ok(Vector2::new(u, v))
}

fn skip_space(input: &str) -> &str {
    let skipped: IResult<&str, &str> = space0(input);
    skipped.map_or(input, |(rest, _)| rest)
}

/// A finite float that must end at whitespace or end of input.
/// Separation is enforced here, so a plain `space0` between values suffices.
fn number(input: &str) -> Result<(&str, f32), ParseErrorKind> {
    let parsed: IResult<&str, f32> = float(input);
    match parsed {
        Ok((rest, value))
            if value.is_finite() && (rest.is_empty() || rest.starts_with([' ', '\t'])) =>
        {
            Ok((rest, value))
        }
        _ => Err(ParseErrorKind::MalformedNumber),
    }
}

fn trailing(input: &str) -> IResult<&str, ()> {
    let (input, _) = many0(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, ()))
}
