//! Pose table text format.
//!
//! ```text
//! id,x,y,deg
//! 002_0,s0,s0,s0
//! 002_1,s1.5,s-0.25,s45
//! ```
//!
//! The id column is the zero-padded object count plus the row index. Numeric columns carry
//! an `s` marker prefix and use shortest round-trip formatting, so no precision is lost.

use log::warn;

use crate::types::Pose;

pub const HEADER: &str = "id,x,y,deg";

const MARKER: char = 's';

/// Rows recovered from a table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedTable {
    pub poses: Vec<Pose>,
    /// Rows dropped for having too few fields or unparseable numbers.
    pub skipped: usize,
}

/// Encode poses in row order.
pub fn write_table<'a, I>(poses: I) -> String
where
    I: IntoIterator<Item = &'a Pose>,
    I::IntoIter: ExactSizeIterator,
{
    let poses = poses.into_iter();
    let group = format!("{:03}", poses.len());
    let mut out = String::from(HEADER);
    out.push('\n');
    for (row, pose) in poses.enumerate() {
        out.push_str(&format!(
            "{group}_{row},{MARKER}{},{MARKER}{},{MARKER}{}\n",
            pose.center_x, pose.center_y, pose.angle_degrees
        ));
    }
    out
}

fn parse_field(field: &str) -> Option<f64> {
    let field = field.trim();
    let digits = field.strip_prefix(MARKER).unwrap_or(field);
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decode a table. The first line is treated as the header and ignored; blank lines are
/// ignored; malformed rows are skipped and counted without aborting the import.
pub fn parse_table(text: &str) -> ParsedTable {
    let mut table = ParsedTable::default();
    for (line_no, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 4 {
            warn!("line {}: expected 4 fields, got {}", line_no + 1, parts.len());
            table.skipped += 1;
            continue;
        }
        match (parse_field(parts[1]), parse_field(parts[2]), parse_field(parts[3])) {
            (Some(x), Some(y), Some(deg)) => table.poses.push(Pose::new(x, y, deg)),
            _ => {
                warn!("line {}: unparseable numbers in {:?}", line_no + 1, line);
                table.skipped += 1;
            }
        }
    }
    table
}
