use crate::domain::balance::{Balances, Standing};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    participant: &'a str,
    paid: String,
    owed: String,
    balance: String,
    status: Standing,
}

/// Writes balances as CSV, one row per participant in id order.
///
/// Header: `participant,paid,owed,balance,status`.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances(&mut self, balances: &Balances) -> Result<()> {
        if balances.is_empty() {
            self.writer
                .write_record(["participant", "paid", "owed", "balance", "status"])?;
        }
        for (participant, entry) in balances {
            self.writer.serialize(BalanceRow {
                participant: participant.as_str(),
                paid: entry.paid.to_string(),
                owed: entry.owed.to_string(),
                balance: entry.balance.to_string(),
                status: entry.standing(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
