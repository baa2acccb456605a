use crate::domain::balance::Balances;
use crate::error::Result;
use std::io::Write;

/// Writes `{ "<participant>": { "paid": n, "owed": n, "balance": n } }`
/// followed by a newline.
pub fn write_balance_report<W: Write>(mut writer: W, balances: &Balances) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, balances)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
