// ============================================================================
// Stock List - Rendu de la liste paginée des actions
// ============================================================================
// Dessine la vue principale : une carte par action révélée, plus le
// contrôle "load more". Trois rendus selon l'état du fetch :
// - Loading : indicateur de chargement
// - Failed : vue d'erreur distincte (la version d'origine rendait l'échec
//   identique au chargement ; les deux états sont maintenant séparés)
// - Loaded : les currentPage × pageSize premières lignes de la liste
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Screen, StockListState};
use crate::ui::chart;

/// Dessine l'interface complète
///
/// Routing sur l'écran courant : liste ou graphique.
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::StockList => render_stock_list(frame, app),
        Screen::ChartView => chart::render_chart(frame, app, frame.size()),
    }
}

/// Dessine la vue liste (header, contenu, footer)
fn render_stock_list(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);

    match &app.stocks {
        StockListState::Loading => render_loading(frame, chunks[1]),
        StockListState::Failed(reason) => render_failed(frame, reason, chunks[1]),
        StockListState::Loaded(_) => render_list(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Stocks ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(Span::styled(
        "View the latest prices",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : liste, chargement, erreur
// ============================================================================

/// Dessine les cartes des actions révélées
fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.total_stocks();
    let visible = app.visible_count();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📊 Actions ({}/{}) ", visible, total));

    if total == 0 {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Liste vide",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    // Une carte par ligne révélée, la sélection en surbrillance
    let items: Vec<ListItem> = app
        .visible_stocks()
        .iter()
        .enumerate()
        .map(|(index, stock)| {
            let line = format!(" {:<10} {}", stock.symbol, stock.display_name());
            let mut item = ListItem::new(line);

            if index == app.selected_index {
                item = item.style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }

            item
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// Indicateur de chargement (fetch en cours)
fn render_loading(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Actions ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Chargement...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Vue d'erreur : le fetch a échoué, pas de retry
fn render_failed(frame: &mut Frame, reason: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Impossible de charger la liste des actions",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            reason.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : raccourcis et contrôle "load more"
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_advance_pending() {
        // Avancement en vol : le contrôle est désactivé tant que le délai
        // n'a pas expiré (single-flight)
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Naviguer  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Graphique  "),
            Span::styled(
                "[n] Chargement de la page...",
                Style::default().fg(Color::Gray),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Naviguer  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Graphique  "),
            Span::styled("[n]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Charger plus"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
