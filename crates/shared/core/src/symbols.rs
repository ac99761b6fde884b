/// Symbols watched by default.
pub const DEFAULT_SYMBOLS: [&str; 8] = [
    "BTCUSDT", "ETHUSDT", "ADAUSDT", "SOLUSDT", "DOTUSDT", "LINKUSDT", "MATICUSDT", "AVAXUSDT",
];

/// Symbols pinned to the watchlist on a fresh store.
pub const DEFAULT_WATCHLIST: [&str; 3] = ["BTCUSDT", "ETHUSDT", "ADAUSDT"];

const DISPLAY_NAMES: [(&str, &str); 8] = [
    ("BTCUSDT", "Bitcoin"),
    ("ETHUSDT", "Ethereum"),
    ("ADAUSDT", "Cardano"),
    ("SOLUSDT", "Solana"),
    ("DOTUSDT", "Polkadot"),
    ("LINKUSDT", "Chainlink"),
    ("MATICUSDT", "Polygon"),
    ("AVAXUSDT", "Avalanche"),
];

/// Resolve the display name for an exchange symbol.
///
/// Unknown symbols fall back to the symbol with its quote suffix stripped.
pub fn asset_name(symbol: &str) -> String {
    for (sym, name) in DISPLAY_NAMES {
        if sym == symbol {
            return name.to_string();
        }
    }
    symbol.strip_suffix("USDT").unwrap_or(symbol).to_string()
}
