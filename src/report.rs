//! Plain-text stock report.

use crate::item::{ItemId, Quantity};
use std::io::{self, Write};

/// First line of every report.
pub const REPORT_HEADER: &str = "Items Report";

/// Write the header and one `item -> quantity` line per entry, in the order
/// given.
pub fn write_report<W, I>(out: &mut W, entries: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = (ItemId, Quantity)>,
{
    writeln!(out, "{REPORT_HEADER}")?;
    for (item, quantity) in entries {
        writeln!(out, "{item} -> {quantity}")?;
    }
    Ok(())
}
