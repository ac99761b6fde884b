//! Normalization of raw exchange payloads into the canonical [`Asset`].
//!
//! Pure functions - no state, no IO. Exchange numeric fields arrive
//! text-encoded; every parse failure is a [`SchemaError`].

use chrono::{DateTime, TimeZone, Utc};

use pulse_core::{
    Asset, SchemaError, TICKER_EVENT_TYPE, Ticker24hrEvent, TickerStreamEvent, asset_name,
};

/// Parse a text-encoded decimal field.
pub(crate) fn parse_decimal(field: &'static str, value: &str) -> Result<f64, SchemaError> {
    let parsed: f64 = value.trim().parse().map_err(|_| SchemaError::Number {
        field,
        value: value.to_string(),
    })?;
    if !parsed.is_finite() {
        return Err(SchemaError::Number {
            field,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

fn parse_timestamp(field: &'static str, millis: i64) -> Result<DateTime<Utc>, SchemaError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(SchemaError::Timestamp {
            field,
            value: millis,
        })
}

/// Prices are never negative; a negative value means a corrupt payload.
fn check_price(field: &'static str, raw: &str, price: f64) -> Result<f64, SchemaError> {
    if price < 0.0 {
        return Err(SchemaError::Number {
            field,
            value: raw.to_string(),
        });
    }
    Ok(price)
}

/// Map a REST 24-hour ticker into the canonical asset record.
pub fn normalize_rest_ticker(raw: &Ticker24hrEvent) -> Result<Asset, SchemaError> {
    let price = check_price(
        "lastPrice",
        &raw.last_price,
        parse_decimal("lastPrice", &raw.last_price)?,
    )?;

    Ok(Asset {
        id: raw.symbol.to_lowercase(),
        symbol: raw.symbol.clone(),
        name: asset_name(&raw.symbol),
        price,
        change24h: parse_decimal("priceChange", &raw.price_change)?,
        change_percent24h: parse_decimal("priceChangePercent", &raw.price_change_percent)?,
        volume24h: parse_decimal("volume", &raw.volume)?,
        high24h: parse_decimal("highPrice", &raw.high_price)?,
        low24h: parse_decimal("lowPrice", &raw.low_price)?,
        last_updated: parse_timestamp("closeTime", raw.close_time)?,
        market_cap: None,
        sparkline: None,
    })
}

/// Map a streaming ticker event into the canonical asset record.
///
/// The absolute 24h change is derived from close minus open; the stream
/// frame does not carry it directly.
pub fn normalize_stream_ticker(raw: &TickerStreamEvent) -> Result<Asset, SchemaError> {
    if raw.event_type != TICKER_EVENT_TYPE {
        return Err(SchemaError::Shape(format!(
            "Expected event type {:?}, got {:?}",
            TICKER_EVENT_TYPE, raw.event_type
        )));
    }

    let last = check_price("c", &raw.last_price, parse_decimal("c", &raw.last_price)?)?;
    let open = parse_decimal("o", &raw.open_price)?;

    Ok(Asset {
        id: raw.symbol.to_lowercase(),
        symbol: raw.symbol.clone(),
        name: asset_name(&raw.symbol),
        price: last,
        change24h: last - open,
        change_percent24h: parse_decimal("P", &raw.price_change_percent)?,
        volume24h: parse_decimal("v", &raw.volume)?,
        high24h: parse_decimal("h", &raw.high_price)?,
        low24h: parse_decimal("l", &raw.low_price)?,
        last_updated: parse_timestamp("E", raw.event_time)?,
        market_cap: None,
        sparkline: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest_ticker() -> Ticker24hrEvent {
        Ticker24hrEvent {
            symbol: "BTCUSDT".to_string(),
            price_change: "100".to_string(),
            price_change_percent: "0.23".to_string(),
            last_price: "43250.50".to_string(),
            volume: "1000".to_string(),
            high_price: "44000".to_string(),
            low_price: "42000".to_string(),
            close_time: 1_700_000_000_000,
        }
    }

    fn stream_ticker() -> TickerStreamEvent {
        TickerStreamEvent {
            event_type: "24hrTicker".to_string(),
            event_time: 1_700_000_001_000,
            symbol: "ETHUSDT".to_string(),
            last_price: "2680.25".to_string(),
            open_price: "2750".to_string(),
            high_price: "2800".to_string(),
            low_price: "2650".to_string(),
            volume: "500".to_string(),
            quote_volume: "1000".to_string(),
            price_change_percent: "-2.15".to_string(),
        }
    }

    #[test]
    fn test_rest_ticker_maps_every_field() {
        let asset = normalize_rest_ticker(&rest_ticker()).unwrap();
        assert_eq!(asset.id, "btcusdt");
        assert_eq!(asset.symbol, "BTCUSDT");
        assert_eq!(asset.name, "Bitcoin");
        assert_eq!(asset.price, 43250.50);
        assert_eq!(asset.change24h, 100.0);
        assert_eq!(asset.change_percent24h, 0.23);
        assert_eq!(asset.volume24h, 1000.0);
        assert_eq!(asset.high24h, 44000.0);
        assert_eq!(asset.low24h, 42000.0);
        assert_eq!(
            asset.last_updated,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        );
    }

    #[test]
    fn test_non_numeric_last_price_is_schema_error() {
        let mut raw = rest_ticker();
        raw.last_price = "not-a-number".to_string();
        let err = normalize_rest_ticker(&raw).unwrap_err();
        assert_eq!(
            err,
            SchemaError::Number {
                field: "lastPrice",
                value: "not-a-number".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut raw = rest_ticker();
        raw.last_price = "-1".to_string();
        assert!(normalize_rest_ticker(&raw).is_err());
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let mut raw = rest_ticker();
        raw.volume = "inf".to_string();
        assert!(normalize_rest_ticker(&raw).is_err());
    }

    #[test]
    fn test_stream_ticker_derives_change_from_open() {
        let asset = normalize_stream_ticker(&stream_ticker()).unwrap();
        assert_eq!(asset.id, "ethusdt");
        assert_eq!(asset.name, "Ethereum");
        assert_eq!(asset.price, 2680.25);
        assert_eq!(asset.change24h, 2680.25 - 2750.0);
        assert_eq!(asset.change_percent24h, -2.15);
        assert_eq!(
            asset.last_updated,
            Utc.timestamp_millis_opt(1_700_000_001_000).unwrap()
        );
    }

    #[test]
    fn test_wrong_event_type_is_shape_error() {
        let mut raw = stream_ticker();
        raw.event_type = "depthUpdate".to_string();
        assert!(matches!(
            normalize_stream_ticker(&raw),
            Err(SchemaError::Shape(_))
        ));
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_stripped_name() {
        let mut raw = rest_ticker();
        raw.symbol = "XRPUSDT".to_string();
        let asset = normalize_rest_ticker(&raw).unwrap();
        assert_eq!(asset.name, "XRP");
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        let mut raw = rest_ticker();
        raw.close_time = i64::MAX;
        assert!(matches!(
            normalize_rest_ticker(&raw),
            Err(SchemaError::Timestamp { .. })
        ));
    }
}
