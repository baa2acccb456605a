use crate::domain::expense::Expense;
use crate::domain::money::Money;
use crate::domain::participant::ParticipantId;
use crate::error::{Result, TripError};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

/// Separator between participant ids inside the `participants` column.
pub const PARTICIPANT_SEPARATOR: char = ';';

/// One row of an expense CSV file, before it becomes an [`Expense`].
#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    id: u32,
    #[serde(default)]
    description: String,
    payer: String,
    #[serde(deserialize_with = "decimal_from_text")]
    amount: Decimal,
    #[serde(default)]
    participants: String,
    #[serde(default)]
    currency: Option<String>,
}

/// Parses the raw field text so amounts never pass through `f64`.
fn decimal_from_text<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    Decimal::from_str(&text).map_err(serde::de::Error::custom)
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        let participants = record
            .participants
            .split(PARTICIPANT_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ParticipantId::from)
            .collect();

        let expense = Expense::new(
            record.id,
            record.description,
            Money::new(record.amount),
            ParticipantId::from(record.payer.trim()),
            participants,
        );

        match record.currency.filter(|c| !c.is_empty()) {
            Some(currency) => expense.with_currency(currency),
            None => expense,
        }
    }
}

/// Reads expenses from a CSV source.
///
/// Expected header: `id,description,payer,amount,participants[,currency]`,
/// where `participants` is a `;`-separated list. An empty list means the
/// payer alone shares the cost, and a missing currency means
/// [`DEFAULT_CURRENCY`](crate::domain::expense::DEFAULT_CURRENCY).
pub struct ExpenseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ExpenseReader<R> {
    /// Creates a new `ExpenseReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and converts expenses.
    ///
    /// A malformed row yields an error item; later rows are still read.
    pub fn expenses(self) -> impl Iterator<Item = Result<Expense>> {
        self.reader
            .into_deserialize::<ExpenseRecord>()
            .map(|result| result.map(Expense::from).map_err(TripError::from))
    }
}
