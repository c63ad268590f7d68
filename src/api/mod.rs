// ============================================================================
// Module : api
// ============================================================================
// Client HTTP du backend /api/stocks (liste des actions et historique).
// ============================================================================

pub mod exchange; // Client de l'exchange

// Re-export des fonctions principales
pub use exchange::{fetch_price_history, fetch_stock_list};
