//! Candidate asset universe
//!
//! Top bases by market cap from CoinMarketCap when an API key is present,
//! otherwise the static fallback list. Either way stablecoins are
//! filtered out; a stable base against a stable quote is noise.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::{DEFAULT_TOP_BASES, STABLES};
use crate::error::ConnectorError;

const CMC_LISTINGS_URL: &str = "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
const CMC_API_KEY_VAR: &str = "CMC_API_KEY";

#[derive(Debug, Deserialize)]
struct Listings {
    #[serde(default)]
    data: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    symbol: String,
}

pub fn is_stable(base: &str) -> bool {
    STABLES.contains(&base)
}

/// Static fallback of large-cap bases
pub fn fallback_top_bases(limit: usize) -> Vec<String> {
    DEFAULT_TOP_BASES
        .iter()
        .take(limit)
        .map(|b| b.to_string())
        .collect()
}

/// Top `limit` base assets by market cap. Falls back to the static list
/// when the API key is missing, the request fails, or the payload is
/// empty.
pub async fn top_bases_by_market_cap(limit: usize) -> Vec<String> {
    let Ok(key) = std::env::var(CMC_API_KEY_VAR) else {
        return fallback_top_bases(limit);
    };

    match fetch_cmc_bases(&key, limit).await {
        Ok(bases) if !bases.is_empty() => bases,
        Ok(_) => fallback_top_bases(limit),
        Err(e) => {
            debug!("market-cap lookup failed, using fallback list: {e}");
            fallback_top_bases(limit)
        }
    }
}

async fn fetch_cmc_bases(api_key: &str, limit: usize) -> Result<Vec<String>, ConnectorError> {
    let response = Client::new()
        .get(CMC_LISTINGS_URL)
        .query(&[("limit", limit.to_string()), ("convert", "USD".to_string())])
        .header("X-CMC_PRO_API_KEY", api_key)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConnectorError::Venue(format!("cmc listings returned {status}")));
    }

    let listings: Listings = response
        .json()
        .await
        .map_err(|e| ConnectorError::Payload(format!("cmc listings: {e}")))?;

    Ok(listings
        .data
        .into_iter()
        .take(limit)
        .map(|l| l.symbol.to_uppercase())
        .filter(|b| !is_stable(b))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_respects_limit_and_order() {
        let bases = fallback_top_bases(3);
        assert_eq!(bases, vec!["BTC", "ETH", "BNB"]);
    }

    #[test]
    fn fallback_list_carries_no_stables() {
        for base in fallback_top_bases(usize::MAX) {
            assert!(!is_stable(&base), "{base} is a stable");
        }
    }

    #[test]
    fn listings_payload_parses() {
        let body = r#"{"data":[{"symbol":"btc","name":"Bitcoin"},{"symbol":"USDT"}]}"#;
        let listings: Listings = serde_json::from_str(body).unwrap();
        assert_eq!(listings.data.len(), 2);
        assert_eq!(listings.data[0].symbol, "btc");
    }
}
