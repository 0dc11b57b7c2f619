// Asset-class conventions: display precision and FX pip size
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetClass {
    Crypto,
    Forex,
    Commodity,
    Index,
    Equity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    /// Upper-case symbol with separators and feed suffixes removed.
    pub code: String,
    pub asset_class: AssetClass,
    pub decimals: usize,
    /// Only set for currency pairs.
    pub pip_size: Option<f64>,
}

const FIAT: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CHF", "AUD", "CAD", "NZD", "SEK", "NOK", "DKK", "SGD", "HKD",
    "MXN", "ZAR", "TRY", "PLN", "BRL", "CNH",
];

const CRYPTO_QUOTES: &[&str] = &["", "USD", "USDT", "USDC", "BUSD", "EUR", "BRL"];

const CRYPTO: &[(&str, usize)] = &[
    ("BTC", 1),
    ("ETH", 2),
    ("BNB", 2),
    ("SOL", 2),
    ("XRP", 4),
    ("ADA", 4),
    ("DOGE", 4),
];

const COMMODITIES: &[(&str, usize)] = &[
    ("XAU", 2),
    ("GOLD", 2),
    ("GC", 2),
    ("XAG", 3),
    ("SILVER", 3),
    ("SI", 3),
    ("WTI", 2),
    ("CL", 2),
    ("BRENT", 2),
    ("BZ", 2),
    ("NG", 3),
];

const INDICES: &[(&str, usize)] = &[
    ("SPX", 2),
    ("SPX500", 2),
    ("GSPC", 2),
    ("NDX", 2),
    ("NAS100", 2),
    ("IXIC", 2),
    ("DJI", 2),
    ("US30", 2),
    ("DAX", 2),
    ("GDAXI", 2),
];

const DEFAULT_DECIMALS: usize = 2;

fn normalize(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    let stripped = upper
        .strip_suffix("=X")
        .or_else(|| upper.strip_suffix("=F"))
        .unwrap_or(&upper);
    stripped.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn lookup(table: &[(&str, usize)], code: &str, quotes: &[&str]) -> Option<usize> {
    table.iter().find_map(|(base, decimals)| {
        code.strip_prefix(base)
            .filter(|rest| quotes.contains(rest))
            .map(|_| *decimals)
    })
}

impl Instrument {
    pub fn resolve(symbol: &str) -> Self {
        let code = normalize(symbol);

        if Self::is_currency_pair(&code) {
            let (decimals, pip) = if code.contains("JPY") { (3, 0.01) } else { (5, 0.0001) };
            return Instrument { code, asset_class: AssetClass::Forex, decimals, pip_size: Some(pip) };
        }

        let (asset_class, decimals) = if let Some(d) = lookup(CRYPTO, &code, CRYPTO_QUOTES) {
            (AssetClass::Crypto, d)
        } else if let Some(d) = lookup(COMMODITIES, &code, &["", "USD"]) {
            (AssetClass::Commodity, d)
        } else if let Some(d) = lookup(INDICES, &code, &[""]) {
            (AssetClass::Index, d)
        } else {
            (AssetClass::Equity, DEFAULT_DECIMALS)
        };
        Instrument { code, asset_class, decimals, pip_size: None }
    }

    fn is_currency_pair(code: &str) -> bool {
        code.len() == 6
            && code.is_char_boundary(3)
            && FIAT.contains(&&code[..3])
            && FIAT.contains(&&code[3..])
            && code[..3] != code[3..]
    }

    pub fn is_forex(&self) -> bool {
        self.asset_class == AssetClass::Forex
    }
}
