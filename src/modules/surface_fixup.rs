use std::{
    fs::OpenOptions,
    io::Write,
    path::Path,
};

use eyre::eyre;
use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::{digit0, digit1, space0, space1},
    combinator::{opt, recognize},
    sequence::{delimited, pair, tuple},
    IResult as _IResult,
};

type IResult<'a, T> = _IResult<&'a str, T>;

/// Property line Nightfire uses to mark a brush as detail. Hammer chokes on
/// it, so any line starting with this is removed outright.
pub const DETAIL_BRUSH_FLAG: &str = "\"BRUSHFLAGS\" \"DETAIL\"";

/// What to do with one line of the .map file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction<'a> {
    /// Line is removed from the output.
    Drop,
    /// Line is written back verbatim, original terminator included.
    Keep(&'a str),
    /// Line is replaced by the matched surface descriptor prefix plus a
    /// single newline. Everything after the Y scale is Nightfire-only data.
    Truncate(&'a str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixupStats {
    /// Surface descriptor lines truncated.
    pub modified: usize,
    /// Detail flag lines dropped.
    pub skipped: usize,
}

// Nightfire writes numbers as `-?[0-9]+(\.[0-9]*)?`. A bare trailing dot is
// legal. No exponents and no leading dot, so this is stricter than nom's
// `double` on purpose.
fn number(i: &str) -> IResult<&str> {
    recognize(tuple((opt(tag("-")), digit1, opt(pair(tag("."), digit0)))))(i)
}

// ( x y z )
// Brackets may hug the numbers or pad them with spaces.
fn plane_point(i: &str) -> IResult<&str> {
    recognize(delimited(
        pair(tag("("), space0),
        tuple((number, space1, number, space1, number)),
        pair(space0, tag(")")),
    ))(i)
}

// Word characters plus '/'.
fn texture_path(i: &str) -> IResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '/')(i)
}

// [ x y z offset ] for either the U or the V texture axis.
fn texture_axis(i: &str) -> IResult<&str> {
    recognize(delimited(
        pair(tag("["), space0),
        tuple((number, space1, number, space1, number, space1, number)),
        pair(space0, tag("]")),
    ))(i)
}

// The Source-compatible section of a surface descriptor: three plane points,
// texture, U/V axes, then rotation and both scales. Anchored at the start of
// the line and open at the end.
fn surface_prefix(i: &str) -> IResult<&str> {
    recognize(tuple((
        plane_point,
        space1,
        plane_point,
        space1,
        plane_point,
        space1,
        texture_path,
        space1,
        texture_axis,
        space1,
        texture_axis,
        space1,
        number,
        space1,
        number,
        space1,
        number,
    )))(i)
}

/// Classifies one terminator-inclusive line.
///
/// The detail flag check wins over surface matching. A line that matches
/// neither is kept as-is, so entity blocks, braces and comments pass through
/// untouched.
pub fn classify(line: &str) -> LineAction {
    if line.starts_with(DETAIL_BRUSH_FLAG) {
        return LineAction::Drop;
    }

    match surface_prefix(line) {
        Ok((_, matched)) => LineAction::Truncate(matched),
        Err(_) => LineAction::Keep(line),
    }
}

/// Runs [`classify`] over every line of `text` in order and returns the
/// rewritten map together with the modified/skipped tally.
pub fn fixup_text(text: &str) -> (String, FixupStats) {
    let mut output = String::with_capacity(text.len());
    let mut stats = FixupStats::default();

    for line in text.split_inclusive('\n') {
        match classify(line) {
            LineAction::Drop => stats.skipped += 1,
            LineAction::Keep(line) => output.push_str(line),
            LineAction::Truncate(prefix) => {
                output.push_str(prefix);
                output.push('\n');
                stats.modified += 1;
            }
        }
    }

    (output, stats)
}

pub fn write_map(path: impl AsRef<Path>, text: &str) -> eyre::Result<()> {
    let mut out_file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path.as_ref())?;

    out_file.write_all(text.as_bytes())?;
    out_file.flush()?;

    Ok(())
}

/// Reads `path`, fixes up its surface descriptors and writes the result to
/// `output`. The write is not transactional.
pub fn surface_fixup(
    path: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> eyre::Result<FixupStats> {
    if !path.as_ref().exists() {
        return Err(eyre!("{} does not exist", path.as_ref().display()));
    }

    if !path.as_ref().is_file() {
        return Err(eyre!("{} is not a file", path.as_ref().display()));
    }

    let text = std::fs::read_to_string(path.as_ref())?;
    let (fixed, stats) = fixup_text(&text);

    write_map(output, &fixed)?;

    Ok(stats)
}
