// ============================================================================
// Configuration de l'application
// ============================================================================
// Toute la configuration ambiante (endpoint du backend, thème, taille de
// page, délai du "load more") est portée explicitement par cette structure
// au lieu d'être des globals implicites. Chargée une fois au démarrage
// depuis les variables d'environnement, puis passée aux composants.
//
// Variables reconnues :
// - STOCKDECK_API_URL   : base du backend (défaut http://localhost:3000)
// - STOCKDECK_THEME     : "light" ou autre chose = dark (défaut "dark")
// - STOCKDECK_PAGE_SIZE : lignes révélées par page (défaut 10)
// ============================================================================

use std::time::Duration;

use tracing::warn;

use crate::ui::theme::Theme;

/// Nombre de lignes révélées par activation du "load more"
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Délai entre l'activation du "load more" et l'avancement de page
pub const LOAD_MORE_DELAY: Duration = Duration::from_millis(2000);

/// Base par défaut du backend
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Configuration de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// Base de l'endpoint HTTP (sans slash final)
    pub api_base_url: String,

    /// Thème de rendu du graphique
    pub theme: Theme,

    /// Nombre de lignes par page de la liste
    pub page_size: usize,

    /// Délai artificiel avant l'avancement de page
    pub load_more_delay: Duration,
}

impl Config {
    /// Charge la configuration depuis l'environnement, avec défauts
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("STOCKDECK_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // Tout sauf "light" est traité comme dark, valeurs inconnues incluses
        let theme = std::env::var("STOCKDECK_THEME")
            .map(|name| Theme::from_name(&name))
            .unwrap_or(Theme::Dark);

        let page_size = std::env::var("STOCKDECK_PAGE_SIZE")
            .ok()
            .map(|raw| parse_page_size(&raw))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            api_base_url,
            theme,
            page_size,
            load_more_delay: LOAD_MORE_DELAY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            theme: Theme::Dark,
            page_size: DEFAULT_PAGE_SIZE,
            load_more_delay: LOAD_MORE_DELAY,
        }
    }
}

/// Parse une taille de page, retombe sur le défaut si invalide ou nulle
fn parse_page_size(raw: &str) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n,
        _ => {
            warn!(raw = %raw, "Invalid STOCKDECK_PAGE_SIZE, using default");
            DEFAULT_PAGE_SIZE
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.load_more_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("25"), 25);
        assert_eq!(parse_page_size(" 5 "), 5);

        // Invalide ou nulle : retombe sur le défaut
        assert_eq!(parse_page_size("0"), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size("dix"), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_page_size(""), DEFAULT_PAGE_SIZE);
    }
}
