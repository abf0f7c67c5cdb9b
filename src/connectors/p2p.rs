//! Binance P2P quote client
//!
//! Minimal public adv/search endpoint the Binance web UI uses. The
//! endpoint is undocumented and subject to change; responses are parsed
//! defensively and adverts with unparsable numbers are skipped.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;
use crate::models::{P2PQuote, TradeType};

const P2P_SEARCH_URL: &str = "https://p2p.binance.com/bapi/c2c/v2/friendly/c2c/adv/search";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    page: u32,
    rows: u32,
    pay_types: Vec<String>,
    asset: &'a str,
    fiat: &'a str,
    trade_type: TradeType,
    publisher_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    adv: Advert,
    advertiser: Option<Advertiser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Advert {
    price: String,
    tradable_quantity: String,
    #[serde(default)]
    min_single_trans_amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Advertiser {
    nick_name: Option<String>,
}

pub struct BinanceP2PClient {
    client: Client,
    base_url: String,
}

impl Default for BinanceP2PClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceP2PClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: P2P_SEARCH_URL.to_string(),
        }
    }

    /// Top adverts for one asset/fiat/direction, best-priced first as the
    /// venue returns them
    pub async fn fetch_quotes(
        &self,
        asset: &str,
        fiat: &str,
        trade_type: TradeType,
        rows: u32,
    ) -> Result<Vec<P2PQuote>, ConnectorError> {
        let payload = SearchRequest {
            page: 1,
            rows,
            pay_types: Vec::new(),
            asset,
            fiat,
            trade_type,
            publisher_type: None,
        };

        let response = self.client.post(&self.base_url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Venue(format!("p2p search returned {status}")));
        }

        let body = response.text().await?;
        tracing::debug!("p2p search {asset}/{fiat} {trade_type}: {} bytes", body.len());

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ConnectorError::Payload(format!("p2p search response: {e}")))?;

        let mut quotes = Vec::with_capacity(parsed.data.len());
        for item in parsed.data {
            let Ok(price) = item.adv.price.parse::<f64>() else {
                continue;
            };
            let Ok(available_amount) = item.adv.tradable_quantity.parse::<f64>() else {
                continue;
            };
            let min_amount = item
                .adv
                .min_single_trans_amount
                .as_deref()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0);
            quotes.push(P2PQuote {
                asset: asset.to_string(),
                fiat: fiat.to_string(),
                trade_type,
                price,
                available_amount,
                min_amount,
                advertiser: item.advertiser.and_then(|a| a.nick_name),
            });
        }
        Ok(quotes)
    }
}
