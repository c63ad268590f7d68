// ============================================================================
// Stockdeck - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Client HTTP du backend /api/stocks
pub mod app;    // État de l'application
pub mod config; // Configuration explicite (endpoint, thème, pagination)
pub mod models; // Structures de données
pub mod ui;     // Interface utilisateur
