// ============================================================================
// Stockdeck - Liste des actions et graphique de prix
// ============================================================================
// TUI qui fetch la liste des actions d'un exchange au démarrage, la révèle
// page par page ("load more" différé de 2s), et trace l'historique de prix
// du ticker sélectionné avec crosshair et tooltip.
//
// ARCHITECTURE :
// - Event loop UI sur le thread principal (render → input → résultats)
// - Worker thread en arrière-plan avec son runtime tokio pour les appels
//   API et le délai du load-more ; communication par channels mpsc
// - Les résultats en vol meurent avec les channels : rien ne peut muter
//   l'état après l'arrêt
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use stockdeck::api::{fetch_price_history, fetch_stock_list};
use stockdeck::app::App;
use stockdeck::config::Config;
use stockdeck::models::{PricePoint, TickerSummary};
use stockdeck::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : protocole du worker thread
// ============================================================================
// L'event loop envoie des commandes au worker, qui exécute les tâches async
// et renvoie les résultats. Les résultats sont appliqués uniquement sur le
// thread UI.
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Fetch unique de la liste des actions (au démarrage)
    FetchStocks,

    /// Avancement de page différé : le worker attend le délai configuré
    /// puis confirme. Un seul avancement en vol à la fois (garanti par
    /// l'état de pagination côté UI).
    AdvancePage,

    /// Fetch de l'historique de prix d'un ticker
    FetchPriceHistory { symbol: String },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Liste des actions chargée
    StocksLoaded(Vec<TickerSummary>),

    /// Fetch de la liste échoué (pas de retry)
    StocksFailed(String),

    /// Le délai du load-more a expiré, la page peut avancer
    PageAdvanced,

    /// Historique de prix chargé (peut être vide)
    PriceHistoryLoaded {
        symbol: String,
        points: Vec<PricePoint>,
    },

    /// Fetch de l'historique échoué
    PriceHistoryFailed { symbol: String, error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================

/// Initialise le logging vers fichier avec rotation quotidienne
///
/// Les println! ne fonctionnent pas une fois le TUI lancé, on log vers :
/// - Linux : ~/.local/share/stockdeck/logs/stockdeck.log
/// - macOS : ~/Library/Application Support/stockdeck/logs/stockdeck.log
///
/// Niveau contrôlé par RUST_LOG (défaut : stockdeck=debug,info).
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("stockdeck")
        .join("logs");

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "stockdeck.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockdeck=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée
// ============================================================================

fn main() -> Result<()> {
    // Logging d'abord : si l'init échoue on continue sans, le TUI reste
    // utilisable
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    let config = Config::from_env();
    info!(
        api = %config.api_base_url,
        theme = %config.theme.label(),
        page_size = config.page_size,
        "Stockdeck starting up"
    );

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(config.clone())));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, config);

    // Le "mount" du composant liste : un seul fetch, jamais refait
    let _ = command_tx.send(AppCommand::FetchStocks);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================

/// Worker qui exécute les tâches async en arrière-plan
///
/// Thread OS séparé avec son propre runtime tokio : block_on() bloque le
/// worker, jamais l'UI. Quand le channel de commandes est fermé (arrêt de
/// l'application), la boucle se termine et les tâches en vol sont jetées.
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    config: Config,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker exiting");
                return;
            }
        };

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::FetchStocks => {
                            let result = runtime
                                .block_on(async { fetch_stock_list(&config.api_base_url).await });

                            match result {
                                Ok(stocks) => {
                                    info!(stocks = stocks.len(), "Stock list fetched");
                                    let _ = result_tx.send(AppResult::StocksLoaded(stocks));
                                }
                                Err(e) => {
                                    error!(error = ?e, "Failed to fetch stock list");
                                    let _ =
                                        result_tx.send(AppResult::StocksFailed(e.to_string()));
                                }
                            }
                        }

                        AppCommand::AdvancePage => {
                            schedule_page_advance(
                                &runtime,
                                result_tx.clone(),
                                config.load_more_delay,
                            );
                        }

                        AppCommand::FetchPriceHistory { symbol } => {
                            let result = runtime.block_on(async {
                                fetch_price_history(&config.api_base_url, &symbol).await
                            });

                            match result {
                                Ok(points) => {
                                    info!(ticker = %symbol, points = points.len(), "Price history fetched");
                                    let _ = result_tx
                                        .send(AppResult::PriceHistoryLoaded { symbol, points });
                                }
                                Err(e) => {
                                    error!(ticker = %symbol, error = ?e, "Failed to fetch price history");
                                    let _ = result_tx.send(AppResult::PriceHistoryFailed {
                                        symbol,
                                        error: e.to_string(),
                                    });
                                }
                            }
                        }
                    }
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

/// Programme l'avancement de page différé sans bloquer la boucle du worker
///
/// Le délai part en tâche sur le runtime : la boucle de commandes reste
/// libre pour les fetchs pendant que le sleep court (ouvrir un graphique
/// pendant un "load more" en vol ne doit pas attendre le délai). Annulable
/// par teardown : le send échoue silencieusement si les channels sont
/// fermés, et le runtime jette les tâches en vol quand le worker s'arrête.
/// Jamais dupliqué grâce au single-flight côté UI.
fn schedule_page_advance(
    runtime: &tokio::runtime::Runtime,
    result_tx: mpsc::Sender<AppResult>,
    delay: Duration,
) {
    runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        debug!("Load-more delay elapsed");
        let _ = result_tx.send(AppResult::PageAdvanced);
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================

/// Exécute la boucle principale : résultats → render → input
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        // Lock minimal juste pour lire is_running
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 1. RÉSULTATS : applique les résultats du worker
        // ========================================
        match result_rx.try_recv() {
            Ok(result) => {
                let mut app_lock = app.lock().unwrap();
                apply_result(&mut app_lock, result);
            }
            Err(mpsc::TryRecvError::Empty) => {
                // Pas de résultat, c'est normal
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // ========================================
        // 2. RENDER : dessine l'interface
        // ========================================
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 3. INPUT : traite les événements
        // ========================================
        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }
    }

    Ok(())
}

/// Applique un résultat du worker à l'état de l'application
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::StocksLoaded(stocks) => {
            app.stocks_loaded(stocks);
        }
        AppResult::StocksFailed(error) => {
            // Pas de retry : l'état Failed est terminal pour la session
            error!(error = %error, "Stock list fetch failed");
            app.stocks_failed(error);
        }
        AppResult::PageAdvanced => {
            app.apply_page_advance();
        }
        AppResult::PriceHistoryLoaded { symbol, points } => {
            app.series_loaded(&symbol, points);
        }
        AppResult::PriceHistoryFailed { symbol, error } => {
            // Le graphique ne définit pas d'état d'erreur : on log et la
            // vue reste sur l'indicateur de chargement
            error!(ticker = %symbol, error = %error, "Price history fetch failed");
        }
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement clavier et met à jour l'état
fn handle_event(app: &mut App, event: stockdeck::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use stockdeck::ui::events::{
        is_down_event, is_enter_event, is_escape_event, is_left_event, is_load_more_event,
        is_quit_event, is_right_event, is_space_event, is_up_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step quit : première pression arme la confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // Navigation dans la liste
        Event::Key(_) if is_up_event(&event) && app.is_on_list() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_list() => {
            app.cancel_quit();
            app.navigate_down();
        }

        // 'n' : révéler la page suivante, après le délai configuré.
        // Refusé si un avancement est déjà en vol (single-flight) : marteler
        // la touche n'empile pas d'incréments.
        Event::Key(_) if is_load_more_event(&event) && app.is_on_list() => {
            app.cancel_quit();
            if app.request_page_advance() {
                info!("Load more requested, scheduling delayed page advance");
                let _ = command_tx.send(AppCommand::AdvancePage);
            } else {
                debug!("Load more ignored (advance already pending or list not loaded)");
            }
        }

        // Enter : ouvrir le graphique du ticker sélectionné
        Event::Key(_) if is_enter_event(&event) && app.is_on_list() => {
            app.cancel_quit();
            if let Some(symbol) = app.open_chart() {
                info!(ticker = %symbol, "User opened chart view");
                let _ = command_tx.send(AppCommand::FetchPriceHistory { symbol });
            }
        }

        // ESC ou SPACE : retour à la liste depuis le graphique
        Event::Key(_) if (is_escape_event(&event) || is_space_event(&event)) && app.is_on_chart() => {
            app.cancel_quit();
            debug!("User returned to stock list");
            app.close_chart();
        }

        // Crosshair : survol d'un point plus ancien / plus récent
        Event::Key(_) if is_left_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.cursor_left();
        }
        Event::Key(_) if is_right_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.cursor_right();
        }

        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal, appelé même en cas d'erreur
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delayed_advance_does_not_block_other_work() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (result_tx, result_rx) = mpsc::channel::<AppResult>();

        // Un avancement différé long est programmé en premier
        schedule_page_advance(&runtime, result_tx.clone(), Duration::from_millis(300));

        // Du travail soumis juste après ne doit pas attendre le délai
        let tx = result_tx.clone();
        runtime.spawn(async move {
            let _ = tx.send(AppResult::StocksLoaded(Vec::new()));
        });

        let first = result_rx
            .recv_timeout(Duration::from_millis(150))
            .expect("other work queued behind the load-more delay");
        assert!(matches!(first, AppResult::StocksLoaded(_)));

        // L'avancement arrive bien, après son délai
        let second = result_rx
            .recv_timeout(Duration::from_millis(600))
            .expect("delayed advance never delivered");
        assert!(matches!(second, AppResult::PageAdvanced));
    }

    #[test]
    fn test_delayed_advance_cancelled_by_teardown() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (result_tx, result_rx) = mpsc::channel::<AppResult>();

        schedule_page_advance(&runtime, result_tx, Duration::from_millis(50));

        // Receiver jeté avant l'expiration : le send échoue en silence,
        // rien ne panique
        drop(result_rx);
        std::thread::sleep(Duration::from_millis(150));
    }
}
