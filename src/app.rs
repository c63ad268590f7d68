// ============================================================================
// Structure : App
// ============================================================================
// État global de l'application TUI : liste des actions, pagination côté
// client, et graphique du ticker sélectionné.
//
// PATTERN : Application State
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état
// ============================================================================

use tracing::debug;

use crate::config::Config;
use crate::models::{PricePoint, SeriesState, TickerSummary};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
///
/// State machine : un seul écran actif à la fois.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste paginée des actions
    StockList,

    /// Vue graphique : historique de prix du ticker sélectionné
    ChartView,
}

// ============================================================================
// Enum : StockListState
// ============================================================================

/// État du fetch de la liste des actions
///
/// CONCEPT : Tri-état explicite
/// - La version d'origine représentait Loading et Failed par la même valeur
///   nulle, donc la vue ne pouvait pas les distinguer. Ici les trois états
///   sont séparés et c'est la vue qui décide du rendu de chacun.
/// - Failed est terminal pour la session : pas de retry.
#[derive(Debug, Clone, PartialEq)]
pub enum StockListState {
    /// Fetch en cours (état initial)
    Loading,

    /// Fetch échoué (réseau ou non-2xx), avec la raison pour l'affichage
    Failed(String),

    /// Liste chargée, jamais mutée ensuite
    Loaded(Vec<TickerSummary>),
}

// ============================================================================
// Structure : PageState
// ============================================================================

/// Pagination côté client de la liste des actions
///
/// Le compteur de page est monotone croissant, ≥ 1, remis à 1 uniquement
/// quand une nouvelle liste est chargée. L'avancement passe par un cycle
/// request → (délai dans le worker) → apply : le flag pending interdit
/// deux avancements en vol en même temps (single-flight), là où la version
/// d'origine empilait des timers indépendants qui incrémentaient chacun.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Nombre de pages révélées (≥ 1)
    current_page: u32,

    /// Un avancement est en vol dans le worker
    pending_advance: bool,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            pending_advance: false,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance
    }

    /// Nombre de lignes visibles pour un total donné
    pub fn visible_count(&self, total: usize, page_size: usize) -> usize {
        (self.current_page as usize).saturating_mul(page_size).min(total)
    }

    /// Demande un avancement : retourne false si un est déjà en vol
    pub fn request_advance(&mut self) -> bool {
        if self.pending_advance {
            return false;
        }
        self.pending_advance = true;
        true
    }

    /// Applique l'avancement quand le délai du worker a expiré
    ///
    /// No-op s'il n'y a pas d'avancement en vol : un résultat qui arrive
    /// après un reset de la liste ne doit pas incrémenter.
    pub fn apply_advance(&mut self) {
        if self.pending_advance {
            self.pending_advance = false;
            self.current_page += 1;
        }
    }

    /// Retour à la première page (nouvelle liste chargée)
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.pending_advance = false;
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Structure : App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Configuration chargée au démarrage (endpoint, thème, pagination)
    pub config: Config,

    /// État du fetch de la liste des actions
    pub stocks: StockListState,

    /// Pagination côté client
    pub page: PageState,

    /// Index de la ligne sélectionnée parmi les lignes visibles
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Ticker affiché par la vue graphique
    pub chart_symbol: Option<String>,

    /// Série de prix de la vue graphique
    pub chart_series: SeriesState,

    /// Index du point sous le crosshair
    pub chart_cursor: usize,

    /// Première pression de 'q' reçue, en attente de confirmation
    pub confirm_quit: bool,
}

impl App {
    /// Crée l'application en état initial : liste en cours de chargement
    pub fn new(config: Config) -> Self {
        Self {
            running: true,
            config,
            stocks: StockListState::Loading,
            page: PageState::new(),
            selected_index: 0,
            current_screen: Screen::StockList,
            chart_symbol: None,
            chart_series: SeriesState::NotFetched,
            chart_cursor: 0,
            confirm_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Liste des actions
    // ========================================================================

    /// Applique une liste fraîchement fetchée
    ///
    /// Remplace la liste précédente en bloc et remet la pagination et la
    /// sélection à zéro.
    pub fn stocks_loaded(&mut self, stocks: Vec<TickerSummary>) {
        debug!(stocks = stocks.len(), "Stock list loaded into app state");
        self.stocks = StockListState::Loaded(stocks);
        self.page.reset();
        self.selected_index = 0;
    }

    /// Marque le fetch comme échoué : pas de retry, l'état est terminal
    pub fn stocks_failed(&mut self, error: String) {
        self.stocks = StockListState::Failed(error);
        self.page.reset();
        self.selected_index = 0;
    }

    pub fn is_list_loading(&self) -> bool {
        matches!(self.stocks, StockListState::Loading)
    }

    pub fn is_list_failed(&self) -> bool {
        matches!(self.stocks, StockListState::Failed(_))
    }

    /// La liste filtrée, si chargée
    ///
    /// Point d'extension du filtrage : dans la version d'origine le filtre
    /// était un pass-through identité, on garde la couture sans la logique.
    pub fn filtered_stocks(&self) -> Option<&[TickerSummary]> {
        match &self.stocks {
            StockListState::Loaded(stocks) => Some(stocks),
            _ => None,
        }
    }

    /// Nombre total d'actions chargées
    pub fn total_stocks(&self) -> usize {
        self.filtered_stocks().map_or(0, <[TickerSummary]>::len)
    }

    /// Nombre de lignes actuellement révélées
    pub fn visible_count(&self) -> usize {
        self.page
            .visible_count(self.total_stocks(), self.config.page_size)
    }

    /// Tranche des lignes actuellement révélées
    pub fn visible_stocks(&self) -> &[TickerSummary] {
        match self.filtered_stocks() {
            Some(stocks) => &stocks[..self.visible_count()],
            None => &[],
        }
    }

    // ========================================================================
    // Pagination ("load more")
    // ========================================================================

    /// Demande un avancement de page
    ///
    /// Retourne true si la demande doit être envoyée au worker. Refusée si
    /// un avancement est déjà en vol ou si la liste n'est pas chargée.
    /// Demander alors que toute la liste est déjà visible est accepté : le
    /// compteur avance mais l'affichage reste borné par la taille de liste.
    pub fn request_page_advance(&mut self) -> bool {
        if !matches!(self.stocks, StockListState::Loaded(_)) {
            return false;
        }
        self.page.request_advance()
    }

    /// Applique l'avancement (le délai du worker a expiré)
    pub fn apply_page_advance(&mut self) {
        self.page.apply_advance();
        debug!(
            page = self.page.current_page(),
            visible = self.visible_count(),
            "Page advance applied"
        );
    }

    pub fn is_advance_pending(&self) -> bool {
        self.page.is_advance_pending()
    }

    // ========================================================================
    // Navigation dans la liste
    // ========================================================================

    /// Navigue vers le haut (saturating : reste à 0)
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas, borné aux lignes révélées (pas à la liste
    /// complète : les lignes non encore "chargées" ne sont pas atteignables)
    pub fn navigate_down(&mut self) {
        let max_index = self.visible_count().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// La ligne sélectionnée, si visible
    pub fn selected_stock(&self) -> Option<&TickerSummary> {
        self.visible_stocks().get(self.selected_index)
    }

    // ========================================================================
    // Vue graphique
    // ========================================================================

    /// Ouvre la vue graphique sur la ligne sélectionnée
    ///
    /// Retourne le symbole dont il faut fetcher l'historique, ou None si
    /// rien n'est sélectionné. La série repart de NotFetched : la vue
    /// affiche l'indicateur de chargement en attendant le worker.
    pub fn open_chart(&mut self) -> Option<String> {
        let symbol = self.selected_stock()?.symbol.clone();
        self.chart_symbol = Some(symbol.clone());
        self.chart_series = SeriesState::NotFetched;
        self.chart_cursor = 0;
        self.current_screen = Screen::ChartView;
        Some(symbol)
    }

    /// Retour à la liste ; la série est jetée (snapshot non conservé)
    pub fn close_chart(&mut self) {
        self.current_screen = Screen::StockList;
        self.chart_symbol = None;
        self.chart_series = SeriesState::NotFetched;
        self.chart_cursor = 0;
    }

    /// Applique une série fetchée par le worker
    ///
    /// Ignorée si le symbole ne correspond plus au graphique affiché : un
    /// résultat qui arrive après un retour à la liste (ou l'ouverture d'un
    /// autre ticker) est un résultat périmé.
    pub fn series_loaded(&mut self, symbol: &str, points: Vec<PricePoint>) {
        if self.chart_symbol.as_deref() != Some(symbol) {
            debug!(ticker = %symbol, "Dropping stale price history result");
            return;
        }
        self.chart_series = SeriesState::from_points(points);
        // Crosshair initialisé sur le point le plus récent
        self.chart_cursor = self.chart_series.len().saturating_sub(1);
    }

    pub fn is_on_list(&self) -> bool {
        self.current_screen == Screen::StockList
    }

    pub fn is_on_chart(&self) -> bool {
        self.current_screen == Screen::ChartView
    }

    /// Déplace le crosshair vers la gauche (point plus ancien)
    pub fn cursor_left(&mut self) {
        self.chart_cursor = self.chart_cursor.saturating_sub(1);
    }

    /// Déplace le crosshair vers la droite (point plus récent)
    pub fn cursor_right(&mut self) {
        let max_index = self.chart_series.len().saturating_sub(1);
        self.chart_cursor = (self.chart_cursor + 1).min(max_index);
    }

    /// Le point sous le crosshair, si la série est chargée
    pub fn hovered_point(&self) -> Option<&PricePoint> {
        self.chart_series.points()?.get(self.chart_cursor)
    }

    // ========================================================================
    // Confirmation de quit (two-step)
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn summaries(n: usize) -> Vec<TickerSummary> {
        (0..n).map(|i| TickerSummary::new(format!("SYM{}", i))).collect()
    }

    fn points(n: usize) -> Vec<PricePoint> {
        let base = Utc::now();
        (0..n)
            .map(|i| PricePoint::new(base + Duration::days(i as i64), 100.0 + i as f64))
            .collect()
    }

    fn loaded_app(n: usize) -> App {
        let mut app = App::new(Config::default());
        app.stocks_loaded(summaries(n));
        app
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = App::new(Config::default());
        assert!(app.is_running());
        assert!(app.is_list_loading());
        assert!(!app.is_list_failed());
        assert!(app.visible_stocks().is_empty());
        assert_eq!(app.current_screen, Screen::StockList);
    }

    #[test]
    fn test_loading_and_failed_are_distinct_states() {
        // La version d'origine confondait les deux ; ici chacun a son état
        // et la vue peut les rendre différemment
        let mut app = App::new(Config::default());
        let loading = app.stocks.clone();

        app.stocks_failed("HTTP 500".to_string());
        assert!(app.is_list_failed());
        assert!(!app.is_list_loading());
        assert_ne!(app.stocks, loading);
    }

    #[test]
    fn test_initial_visible_is_min_of_total_and_page_size() {
        // N > PAGE_SIZE : une seule page visible
        let app = loaded_app(25);
        assert_eq!(app.visible_count(), 10);
        assert_eq!(app.visible_stocks().len(), 10);

        // N < PAGE_SIZE : tout est visible
        let app = loaded_app(3);
        assert_eq!(app.visible_count(), 3);
    }

    #[test]
    fn test_page_advance_reveals_next_slice() {
        let mut app = loaded_app(25);

        assert!(app.request_page_advance());
        app.apply_page_advance();
        assert_eq!(app.visible_count(), 20);

        assert!(app.request_page_advance());
        app.apply_page_advance();
        assert_eq!(app.visible_count(), 25); // min(25, 30)
    }

    #[test]
    fn test_advance_past_end_never_exceeds_total() {
        let mut app = loaded_app(5);

        // Toute la liste est déjà visible : la demande est acceptée mais
        // l'affichage reste borné
        for _ in 0..3 {
            assert!(app.request_page_advance());
            app.apply_page_advance();
        }
        assert_eq!(app.visible_count(), 5);
        assert_eq!(app.visible_stocks().len(), 5);
    }

    #[test]
    fn test_advance_is_single_flight() {
        let mut app = loaded_app(25);

        assert!(app.request_page_advance());
        // Deuxième demande pendant que la première est en vol : refusée
        assert!(!app.request_page_advance());
        assert_eq!(app.visible_count(), 10); // rien d'appliqué encore

        app.apply_page_advance();
        assert_eq!(app.visible_count(), 20); // un seul incrément

        // Après application, une nouvelle demande repart
        assert!(app.request_page_advance());
    }

    #[test]
    fn test_advance_refused_while_loading_or_failed() {
        let mut app = App::new(Config::default());
        assert!(!app.request_page_advance());

        app.stocks_failed("boom".to_string());
        assert!(!app.request_page_advance());
    }

    #[test]
    fn test_stale_advance_after_reset_is_dropped() {
        let mut app = loaded_app(25);
        assert!(app.request_page_advance());

        // Une nouvelle liste arrive avant l'expiration du délai : le
        // résultat en vol ne doit pas incrémenter la page repartie à 1
        app.stocks_loaded(summaries(25));
        app.apply_page_advance();
        assert_eq!(app.visible_count(), 10);
    }

    #[test]
    fn test_navigation_bounded_by_visible_rows() {
        let mut app = loaded_app(25);

        for _ in 0..50 {
            app.navigate_down();
        }
        // Bornée à la dernière ligne révélée, pas à la liste complète
        assert_eq!(app.selected_index, 9);

        app.navigate_up();
        assert_eq!(app.selected_index, 8);

        for _ in 0..50 {
            app.navigate_up();
        }
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_open_and_close_chart() {
        let mut app = loaded_app(5);
        app.navigate_down();

        let symbol = app.open_chart().unwrap();
        assert_eq!(symbol, "SYM1");
        assert!(app.is_on_chart());
        assert_eq!(app.chart_series, SeriesState::NotFetched);

        app.close_chart();
        assert!(app.is_on_list());
        assert_eq!(app.chart_symbol, None);
    }

    #[test]
    fn test_open_chart_without_selection() {
        let mut app = App::new(Config::default());
        assert_eq!(app.open_chart(), None);
        assert!(app.is_on_list());
    }

    #[test]
    fn test_series_loaded_sets_cursor_on_latest_point() {
        let mut app = loaded_app(5);
        app.open_chart();

        app.series_loaded("SYM0", points(7));
        assert_eq!(app.chart_series.len(), 7);
        assert_eq!(app.chart_cursor, 6);
        assert_eq!(app.hovered_point().unwrap().close, 106.0);
    }

    #[test]
    fn test_series_loaded_empty_is_empty_state() {
        let mut app = loaded_app(5);
        app.open_chart();

        app.series_loaded("SYM0", Vec::new());
        // Empty, pas NotFetched : la vue les rend différemment
        assert_eq!(app.chart_series, SeriesState::Empty);
    }

    #[test]
    fn test_stale_series_result_is_dropped() {
        let mut app = loaded_app(5);
        app.open_chart(); // SYM0

        // Résultat pour un autre symbole (vue fermée puis rouverte ailleurs)
        app.series_loaded("SYM3", points(7));
        assert_eq!(app.chart_series, SeriesState::NotFetched);
    }

    #[test]
    fn test_cursor_clamped_to_series() {
        let mut app = loaded_app(5);
        app.open_chart();
        app.series_loaded("SYM0", points(3));

        app.cursor_right();
        assert_eq!(app.chart_cursor, 2); // déjà au bout

        app.cursor_left();
        app.cursor_left();
        app.cursor_left();
        assert_eq!(app.chart_cursor, 0);
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new(Config::default());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }
}
