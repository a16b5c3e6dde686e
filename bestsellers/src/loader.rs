use std::io::Cursor;

use encoding_rs::Encoding;

use crate::error::ReportError;

/// One sales transaction row: product code, display description, and quantity
/// sold. Negative quantities are returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_code: String,
    pub description: String,
    pub quantity: i64,
}

const COL_STOCK_CODE: &str = "StockCode";
const COL_DESCRIPTION: &str = "Description";
const COL_QUANTITY: &str = "Quantity";

/// Resolved positions of the required columns within the header row. Columns
/// are matched by name, so their order in the source does not matter.
#[derive(Debug, Clone, Copy)]
struct Columns {
    stock_code: usize,
    description: usize,
    quantity: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ReportError> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(ReportError::MissingColumn(name))
        };

        Ok(Self {
            stock_code: position(COL_STOCK_CODE)?,
            description: position(COL_DESCRIPTION)?,
            quantity: position(COL_QUANTITY)?,
        })
    }
}

/// Lazy, single-use sequence of [`OrderLine`]s parsed from delimited text.
///
/// Construction decodes the source bytes and validates the header; iteration
/// parses one row at a time and ends at the first malformed row.
pub struct OrderLines {
    records: csv::StringRecordsIntoIter<Cursor<String>>,
    columns: Columns,
}

impl OrderLines {
    /// Decode `bytes` under `encoding` and prepare row iteration.
    ///
    /// Fails with [`ReportError::Encoding`] if the bytes are malformed under
    /// the encoding and with [`ReportError::MissingColumn`] if the header
    /// lacks a required column. No data row is read here.
    pub fn from_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<Self, ReportError> {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            return Err(ReportError::Encoding {
                encoding: encoding.name(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(Cursor::new(text.into_owned()));

        let columns = Columns::resolve(reader.headers()?)?;

        Ok(Self {
            records: reader.into_records(),
            columns,
        })
    }
}

impl Iterator for OrderLines {
    type Item = Result<OrderLine, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };
        Some(parse_line(&record, self.columns))
    }
}

fn parse_line(record: &csv::StringRecord, columns: Columns) -> Result<OrderLine, ReportError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let raw_quantity = field(columns.quantity).trim();
    let quantity = raw_quantity
        .parse::<i64>()
        .map_err(|_| ReportError::InvalidQuantity {
            line: record.position().map(csv::Position::line).unwrap_or(0),
            value: raw_quantity.to_string(),
        })?;

    Ok(OrderLine {
        product_code: field(columns.stock_code).to_string(),
        description: field(columns.description).to_string(),
        quantity,
    })
}
