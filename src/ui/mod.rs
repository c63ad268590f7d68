// ============================================================================
// Module : ui
// ============================================================================
// Interface utilisateur terminal (ratatui).
// ============================================================================

pub mod chart;      // Rendu du graphique de prix
pub mod events;     // Gestion des événements clavier
pub mod stock_list; // Rendu de la liste paginée des actions
pub mod theme;      // Thème et palette du graphique

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use stock_list::render;
