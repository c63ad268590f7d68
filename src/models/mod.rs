// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : liste des tickers et série
// de prix pour le graphique.
// ============================================================================

pub mod price;  // Points de prix et état de la série du graphique
pub mod ticker; // Résumés de tickers renvoyés par le backend

// Re-export des structures principales pour simplifier les imports
pub use price::{is_chronological, PricePoint, SeriesState};
pub use ticker::TickerSummary;
