use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported display currencies. Stored in `config` as the upper-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Currency {
    Usd,
    #[default]
    Eur,
    Mxn,
    Cop,
    Ars,
    Clp,
    Pen,
}

impl Currency {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Mxn => "MXN",
            Self::Cop => "COP",
            Self::Ars => "ARS",
            Self::Clp => "CLP",
            Self::Pen => "PEN",
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Self::Usd | Self::Mxn | Self::Cop | Self::Ars | Self::Clp => "$",
            Self::Eur => "€",
            Self::Pen => "S/",
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Usd => "Dólar estadounidense",
            Self::Eur => "Euro",
            Self::Mxn => "Peso mexicano",
            Self::Cop => "Peso colombiano",
            Self::Ars => "Peso argentino",
            Self::Clp => "Peso chileno",
            Self::Pen => "Sol peruano",
        }
    }

    /// (thousands, decimal) separators for the currency's locale.
    pub(crate) fn separators(&self) -> (char, char) {
        match self {
            Self::Usd | Self::Mxn | Self::Pen => (',', '.'),
            Self::Eur | Self::Cop | Self::Ars | Self::Clp => ('.', ','),
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::all().iter().copied().find(|c| c.code() == upper)
    }

    pub(crate) fn all() -> &'static [Currency] {
        &[
            Self::Usd,
            Self::Eur,
            Self::Mxn,
            Self::Cop,
            Self::Ars,
            Self::Clp,
            Self::Pen,
        ]
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Formats amounts in the selected currency.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CurrencyFormatter {
    currency: Currency,
}

impl CurrencyFormatter {
    pub(crate) fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub(crate) fn current(&self) -> Currency {
        self.currency
    }

    pub(crate) fn symbol(&self) -> &'static str {
        self.currency.symbol()
    }

    /// Switch to the currency named by `code`. Unknown codes are ignored.
    pub(crate) fn set_currency(&mut self, code: &str) -> bool {
        match Currency::parse(code) {
            Some(c) => {
                self.currency = c;
                true
            }
            None => false,
        }
    }

    /// Symbol, grouped integer part and two decimals.
    /// e.g. EUR `1234.5` → `"€1.234,50"`, USD `-20` → `"-$20.00"`
    pub(crate) fn format(&self, val: Decimal) -> String {
        let (thousands, decimal) = self.currency.separators();
        let abs = val.abs().round_dp(2);
        let formatted = format!("{abs:.2}");
        let mut parts = formatted.split('.');
        let int_part = parts.next().unwrap_or("0");
        let dec_part = parts.next().unwrap_or("00");

        let grouped: String = int_part
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(&thousands.to_string());

        let sign = if val < Decimal::ZERO && !abs.is_zero() { "-" } else { "" };
        format!("{sign}{}{grouped}{decimal}{dec_part}", self.symbol())
    }
}

#[cfg(test)]
mod tests;
