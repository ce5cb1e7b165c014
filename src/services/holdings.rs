use crate::error::HoldingsError;
use crate::models::{AssetClass, Holding};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;

/// Raw row, column names as exported from the portfolio spreadsheet.
#[derive(Debug, Deserialize)]
struct HoldingRecord {
    #[serde(rename = "Instrument")]
    instrument: String,
    #[serde(rename = "Qty.")]
    quantity: String,
    #[serde(rename = "Avg. cost")]
    avg_cost: String,
    #[serde(rename = "Invested")]
    invested: String,
    #[serde(rename = "Cur. val")]
    current_value: String,
    #[serde(rename = "Asset Class")]
    asset_class: String,
    #[serde(rename = "Sector")]
    sector: String,
}

pub fn load_holdings(path: &str) -> Result<Vec<Holding>, HoldingsError> {
    let file = File::open(path).map_err(|source| HoldingsError::Io {
        path: path.to_string(),
        source,
    })?;
    let holdings = read_holdings(file)?;
    tracing::info!("📂 Loaded {} holdings from {}", holdings.len(), path);
    Ok(holdings)
}

pub fn read_holdings<R: Read>(reader: R) -> Result<Vec<Holding>, HoldingsError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut holdings = Vec::new();
    for (index, record) in csv_reader.deserialize::<HoldingRecord>().enumerate() {
        // Header is row 1
        let row = index + 2;
        let record = record?;

        let quantity = parse_amount(row, "Qty.", &record.quantity)?;
        let invested = parse_amount(row, "Invested", &record.invested)?;
        if quantity < Decimal::ZERO {
            return Err(invalid(row, "Qty.", &record.quantity));
        }
        if invested < Decimal::ZERO {
            return Err(invalid(row, "Invested", &record.invested));
        }
        if record.instrument.is_empty() {
            return Err(invalid(row, "Instrument", &record.instrument));
        }

        holdings.push(Holding {
            instrument: record.instrument,
            quantity,
            avg_cost: parse_amount(row, "Avg. cost", &record.avg_cost)?,
            invested,
            current_value: parse_amount(row, "Cur. val", &record.current_value)?,
            asset_class: AssetClass::parse(&record.asset_class),
            sector: record.sector,
        });
    }

    Ok(holdings)
}

fn parse_amount(row: usize, field: &'static str, raw: &str) -> Result<Decimal, HoldingsError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    Decimal::from_str(&cleaned).map_err(|_| invalid(row, field, raw))
}

fn invalid(row: usize, field: &'static str, value: &str) -> HoldingsError {
    HoldingsError::InvalidField {
        row,
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Instrument,Qty.,Avg. cost,Invested,Cur. val,Asset Class,Sector\n";

    #[test]
    fn reads_spreadsheet_columns() {
        let data = format!(
            "{}GOLD1,700,68.66,\"48,062.14\",60842.70,Commodity,Precious Metals\n\
             Motilal Oswal Large and Midcap Fund, 3500 ,31.54,110394.61,128410.31,Mutual Fund,Large and Mid Cap Fund\n",
            HEADER
        );

        let holdings = read_holdings(data.as_bytes()).unwrap();

        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].instrument, "GOLD1");
        assert_eq!(holdings[0].invested, dec!(48062.14));
        assert_eq!(holdings[0].asset_class, AssetClass::Commodity);
        assert_eq!(holdings[1].quantity, dec!(3500));
        assert_eq!(holdings[1].asset_class, AssetClass::MutualFund);
        assert!(holdings[1].is_fund());
        assert!(!holdings[0].is_fund());
    }

    #[test]
    fn empty_file_has_no_holdings() {
        assert!(read_holdings(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_numeric_amount_with_row() {
        let data = format!("{}OIL,80,249.86,abc,20800.80,Equity,Oil\n", HEADER);

        match read_holdings(data.as_bytes()) {
            Err(HoldingsError::InvalidField { row, field, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "Invested");
            }
            other => panic!("expected invalid field, got {:?}", other),
        }
    }

    #[test]
    fn rejects_negative_quantity() {
        let data = format!("{}OIL,-5,249.86,100,100,Equity,Oil\n", HEADER);
        assert!(matches!(
            read_holdings(data.as_bytes()),
            Err(HoldingsError::InvalidField { field: "Qty.", .. })
        ));
    }

    #[test]
    fn unknown_asset_class_is_kept() {
        let data = format!("{}REIT1,1,1,1,1,Real Estate,REIT\n", HEADER);
        let holdings = read_holdings(data.as_bytes()).unwrap();
        assert_eq!(
            holdings[0].asset_class,
            AssetClass::Other("Real Estate".to_string())
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_holdings("does/not/exist.csv"),
            Err(HoldingsError::Io { .. })
        ));
    }
}
