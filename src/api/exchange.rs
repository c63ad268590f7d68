// ============================================================================
// API Client : backend /api/stocks
// ============================================================================
// Récupère la liste des instruments tradables et l'historique de prix
// depuis le backend de l'exchange.
//
// Deux endpoints :
// - GET {base}/api/stocks/exchange          → { "stocks": [ { "symbol": .. } ] }
// - GET {base}/api/stocks/history/{symbol}  → { "prices": [ { "date": .., "close": .. } ] }
//
// Toute réponse non-2xx ou malformée est une erreur : pas de retry, c'est
// l'appelant qui décide quoi en faire (logger et passer en état Failed).
// ============================================================================

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::models::{PricePoint, TickerSummary};

// ============================================================================
// Structures de désérialisation des réponses JSON
// ============================================================================

/// Réponse de l'endpoint liste des actions
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    stocks: Vec<TickerSummary>,
}

/// Réponse de l'endpoint historique de prix
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    prices: Vec<HistoryEntry>,
}

/// Un point OHLC du backend : seuls date et close nous intéressent
#[derive(Debug, Deserialize)]
struct HistoryEntry {
    /// Timestamp Unix en secondes
    date: i64,
    close: f64,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère la liste complète des actions de l'exchange
///
/// Appelée une seule fois au démarrage. La pagination est purement côté
/// client : la liste entière est fetchée ici, la vue n'en révèle qu'une
/// tranche à la fois.
///
/// CONCEPT RUST : #[instrument]
/// - Macro tracing qui ajoute un span avec les paramètres de la fonction
#[instrument(skip(base_url))]
pub async fn fetch_stock_list(base_url: &str) -> Result<Vec<TickerSummary>> {
    let url = format!("{}/api/stocks/exchange", base_url);
    debug!(url = %url, "Fetching stock list from exchange");

    let response = build_client()?
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP vers l'exchange")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, "Exchange returned error status");
        anyhow::bail!("L'exchange a retourné une erreur : HTTP {}", status);
    }

    let body: ExchangeResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de la liste des actions")?;

    info!(stocks = body.stocks.len(), "Successfully fetched stock list");
    Ok(body.stocks)
}

/// Récupère l'historique de prix d'un ticker
///
/// Le backend renvoie les points triés par date croissante ; on conserve
/// l'ordre tel quel, le graphique en dépend pour ses bornes d'axe.
/// Une réponse à zéro point est un succès (série légitimement vide).
#[instrument(skip(base_url))]
pub async fn fetch_price_history(base_url: &str, symbol: &str) -> Result<Vec<PricePoint>> {
    let url = format!("{}/api/stocks/history/{}", base_url, symbol);
    debug!(url = %url, "Fetching price history");

    let response = build_client()?
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP d'historique de prix")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, "History endpoint returned error status");
        anyhow::bail!(
            "L'historique de {} a retourné une erreur : HTTP {}",
            symbol,
            status
        );
    }

    let body: HistoryResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de l'historique de prix")?;

    let points = parse_history(body, symbol);
    info!(points = points.len(), "Successfully fetched price history");
    Ok(points)
}

/// Crée le client HTTP avec un User-Agent navigateur
fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .context("Échec de la création du client HTTP")
}

/// Convertit la réponse du backend en points de prix
///
/// Les entrées au timestamp invalide sont sautées (et comptées) plutôt que
/// de faire échouer toute la série.
fn parse_history(body: HistoryResponse, symbol: &str) -> Vec<PricePoint> {
    let total = body.prices.len();
    let mut skipped = 0;

    let points: Vec<PricePoint> = body
        .prices
        .into_iter()
        .filter_map(|entry| match DateTime::from_timestamp(entry.date, 0) {
            Some(date) => Some(PricePoint::new(date, entry.close)),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!(
            ticker = %symbol,
            skipped,
            total,
            "Skipped price points with invalid timestamps"
        );
    }

    points
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exchange_response() {
        let json = r#"{ "stocks": [ { "symbol": "AAPL" }, { "symbol": "TSLA" } ] }"#;
        let body: ExchangeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.stocks.len(), 2);
        assert_eq!(body.stocks[0].symbol, "AAPL");
    }

    #[test]
    fn test_parse_history_keeps_order() {
        let json = r#"{ "prices": [
            { "date": 1700000000, "close": 101.5, "open": 100.0 },
            { "date": 1700086400, "close": 102.25 }
        ] }"#;
        let body: HistoryResponse = serde_json::from_str(json).unwrap();
        let points = parse_history(body, "AAPL");

        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[0].close, 101.5);
        // Les champs OHLC supplémentaires sont ignorés au parsing
    }

    #[test]
    fn test_parse_history_empty_is_ok() {
        let body: HistoryResponse = serde_json::from_str(r#"{ "prices": [] }"#).unwrap();
        let points = parse_history(body, "AAPL");
        assert!(points.is_empty());
    }

    #[test]
    fn test_malformed_response_is_error() {
        // Pas de champ "stocks" : le parsing échoue, traité comme un échec
        // de fetch par l'appelant
        let result: Result<ExchangeResponse, _> = serde_json::from_str(r#"{ "data": [] }"#);
        assert!(result.is_err());
    }
}
