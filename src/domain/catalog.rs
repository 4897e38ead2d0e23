//! Built-in catalogue of MSCI world/emerging-market ETFs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EtfListing {
    pub ticker: &'static str,
    pub name: &'static str,
}

const LISTINGS: &[EtfListing] = &[
    EtfListing {
        ticker: "IWDA.L",
        name: "iShares Core MSCI World UCITS ETF",
    },
    EtfListing {
        ticker: "EMIM.L",
        name: "iShares Core MSCI Emerging Markets IMI UCITS ETF",
    },
    EtfListing {
        ticker: "EIMI.L",
        name: "iShares Core MSCI EM IMI UCITS ETF USD",
    },
    EtfListing {
        ticker: "SWDA.L",
        name: "iShares Core MSCI World UCITS ETF USD",
    },
    EtfListing {
        ticker: "LCWD.L",
        name: "SPDR MSCI World UCITS ETF",
    },
    EtfListing {
        ticker: "MXWO.L",
        name: "iShares MSCI World ETF",
    },
];

pub fn all() -> &'static [EtfListing] {
    LISTINGS
}

/// Case-insensitive lookup by ticker.
pub fn lookup(ticker: &str) -> Option<&'static EtfListing> {
    let ticker = ticker.trim();
    LISTINGS
        .iter()
        .find(|l| l.ticker.eq_ignore_ascii_case(ticker))
}
