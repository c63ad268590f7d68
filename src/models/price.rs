// ============================================================================
// Structures : PricePoint et SeriesState
// ============================================================================
// Un point de l'historique de prix d'un ticker, et l'état de la série
// affichée par le graphique.
//
// INVARIANT : une série est triée par date croissante. Le graphique prend
// ses bornes horizontales directement sur le premier et le dernier point,
// c'est à l'appelant de garantir le tri (comme le faisait le backend).
// La série est un snapshot immuable : jamais modifiée après construction.
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un point (date, close) de l'historique de prix
///
/// Le backend renvoie des champs OHLC complets ; seul le close est utilisé
/// pour le graphique, les autres sont ignorés au parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Timestamp du point
    pub date: DateTime<Utc>,

    /// Prix de clôture (Close)
    pub close: f64,
}

impl PricePoint {
    /// Constructeur : crée un nouveau point de prix
    pub fn new(date: DateTime<Utc>, close: f64) -> Self {
        Self { date, close }
    }
}

/// État de la série de prix affichée par le graphique
///
/// CONCEPT : Union à trois états
/// - NotFetched : rien n'a encore été chargé → indicateur de chargement
/// - Empty : le backend a répondu avec zéro point → vue "aucune donnée"
/// - Loaded : série non vide prête à tracer
///
/// Les deux premiers cas étaient confondus dans la version d'origine
/// (série vide = chargement) ; on les sépare et la vue décide du rendu.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeriesState {
    /// Pas encore de réponse du backend
    #[default]
    NotFetched,

    /// Réponse reçue, mais sans aucun point
    Empty,

    /// Série chargée, au moins un point, triée par date croissante
    Loaded(Vec<PricePoint>),
}

impl SeriesState {
    /// Classe une réponse du backend : vide → Empty, sinon → Loaded
    pub fn from_points(points: Vec<PricePoint>) -> Self {
        if points.is_empty() {
            SeriesState::Empty
        } else {
            SeriesState::Loaded(points)
        }
    }

    /// Retourne la série si elle est chargée
    pub fn points(&self) -> Option<&[PricePoint]> {
        match self {
            SeriesState::Loaded(points) => Some(points),
            _ => None,
        }
    }

    /// Nombre de points (0 si pas chargée)
    pub fn len(&self) -> usize {
        self.points().map_or(0, <[PricePoint]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vérifie qu'une série est triée par date croissante (non-décroissante)
///
/// Utilisé par les tests : le code de rendu ne vérifie pas, il fait
/// confiance à l'appelant, comme le moteur de rendu d'origine.
pub fn is_chronological(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].date <= w[1].date)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn series(n: usize) -> Vec<PricePoint> {
        let base = Utc::now();
        (0..n)
            .map(|i| PricePoint::new(base + Duration::days(i as i64), 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_series_state_from_points_empty() {
        // Série vide fetchée : état Empty, pas NotFetched
        let state = SeriesState::from_points(Vec::new());
        assert_eq!(state, SeriesState::Empty);
        assert_ne!(state, SeriesState::NotFetched);
    }

    #[test]
    fn test_series_state_from_points_loaded() {
        let state = SeriesState::from_points(series(3));
        assert_eq!(state.len(), 3);
        assert!(state.points().is_some());
    }

    #[test]
    fn test_series_state_default_is_not_fetched() {
        assert_eq!(SeriesState::default(), SeriesState::NotFetched);
    }

    #[test]
    fn test_is_chronological() {
        let points = series(5);
        assert!(is_chronological(&points));

        let mut reversed = points.clone();
        reversed.reverse();
        assert!(!is_chronological(&reversed));

        // Série vide ou à un seul point : trivialement triée
        assert!(is_chronological(&[]));
        assert!(is_chronological(&points[..1]));
    }

    #[test]
    fn test_is_chronological_allows_equal_dates() {
        let now = Utc::now();
        let points = vec![PricePoint::new(now, 1.0), PricePoint::new(now, 2.0)];
        assert!(is_chronological(&points));
    }
}
