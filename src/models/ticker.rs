// ============================================================================
// Structure : TickerSummary
// ============================================================================
// Représente une ligne de la liste des actions telle que renvoyée par le
// backend. La clé d'identité est le symbol : il doit être unique dans une
// liste fetchée (il sert de clé de rendu). Immuable une fois fetché, la
// liste entière est remplacée au fetch suivant.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Résumé d'un instrument tradable dans la liste des actions
///
/// CONCEPT RUST : String vs &str
/// - String : owned (le TickerSummary possède ses données)
/// - Le backend peut renvoyer d'autres champs d'affichage, on ne garde
///   que ceux qu'on utilise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    /// Symbole du ticker (ex: "AAPL", "TSLA") — clé d'identité
    pub symbol: String,

    /// Nom complet optionnel (ex: "Apple Inc.")
    #[serde(default)]
    pub name: Option<String>,
}

impl TickerSummary {
    /// Crée un résumé avec seulement le symbole
    pub fn new(symbol: String) -> Self {
        Self { symbol, name: None }
    }

    /// Label d'affichage : le nom s'il existe, sinon le symbole
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_summary_creation() {
        let ticker = TickerSummary::new("AAPL".to_string());
        assert_eq!(ticker.symbol, "AAPL");
        assert_eq!(ticker.name, None);
        assert_eq!(ticker.display_name(), "AAPL");
    }

    #[test]
    fn test_ticker_summary_display_name_from_backend() {
        // Le cas nommé n'arrive que par désérialisation du backend
        let json = r#"{ "symbol": "AAPL", "name": "Apple Inc." }"#;
        let ticker: TickerSummary = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.display_name(), "Apple Inc.");
    }

    #[test]
    fn test_ticker_summary_deserialize_extra_fields() {
        // Le backend peut renvoyer des champs supplémentaires : ignorés
        let json = r#"{ "symbol": "TSLA", "exchange": "NASDAQ" }"#;
        let ticker: TickerSummary = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.symbol, "TSLA");
        assert_eq!(ticker.name, None);
    }
}
