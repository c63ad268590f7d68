// ============================================================================
// Thème et palette du graphique
// ============================================================================
// Deux thèmes distingués : "light" et tout le reste, traité comme dark.
// Une valeur de thème inconnue tombe donc sur la palette dark.
//
// Les trois couleurs dérivées (axes, ligne de prix, remplissage) reprennent
// la palette verte de la page d'origine, adaptée au terminal : pas de canal
// alpha en TUI, le remplissage dark est simplement un vert plus sombre.
// ============================================================================

use ratatui::style::Color;

/// Thème de rendu de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Parse un nom de thème : "light" (insensible à la casse) → Light,
    /// tout le reste → Dark
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Les trois couleurs d'affichage du graphique de prix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    /// Couleur des axes, ticks et crosshair
    pub axis: Color,

    /// Couleur de la ligne de prix
    pub line: Color,

    /// Couleur du remplissage sous la ligne
    pub fill: Color,
}

impl ChartPalette {
    /// Dérive la palette du thème courant
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                axis: Color::Black,
                line: Color::Rgb(30, 255, 100),
                fill: Color::Rgb(144, 238, 144),
            },
            Theme::Dark => Self {
                axis: Color::White,
                line: Color::Rgb(100, 255, 100),
                fill: Color::Rgb(46, 92, 46),
            },
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
    fn test_theme_from_name() {
        assert_eq!(Theme::from_name("light"), Theme::Light);
        assert_eq!(Theme::from_name("Light"), Theme::Light);
        assert_eq!(Theme::from_name(" LIGHT "), Theme::Light);
        assert_eq!(Theme::from_name("dark"), Theme::Dark);
    }

    #[test]
    fn test_unknown_theme_maps_to_dark() {
        // N'importe quelle troisième valeur = palette dark
        assert_eq!(Theme::from_name("solarized"), Theme::Dark);
        assert_eq!(Theme::from_name(""), Theme::Dark);
        assert_eq!(
            ChartPalette::for_theme(Theme::from_name("solarized")),
            ChartPalette::for_theme(Theme::Dark)
        );
    }

    #[test]
    fn test_palettes_are_distinct() {
        let light = ChartPalette::for_theme(Theme::Light);
        let dark = ChartPalette::for_theme(Theme::Dark);
        assert_ne!(light, dark);
        assert_ne!(light.axis, dark.axis);
        assert_ne!(light.line, dark.line);
        assert_ne!(light.fill, dark.fill);
    }
}
