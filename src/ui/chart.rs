// ============================================================================
// Chart - Rendu du graphique de prix
// ============================================================================
// Affiche l'historique de prix du ticker sélectionné : aire remplie sous la
// ligne des closes, axe du temps en bas (6 ticks, dates YYYY-MM-DD), axe des
// prix à gauche (2 décimales), crosshair déplaçable au clavier et tooltip
// sur le point survolé. Pas de zoom ni de pan : vue statique, seule
// l'interaction de survol existe.
//
// Composant purement présentationnel : il lit le ticker, l'état de la série
// et la palette, et ne modifie rien. Les bornes horizontales sont prises
// telles quelles sur le premier et le dernier point, l'appelant garantit le
// tri chronologique. Une série mal triée ou des closes non finis donnent un
// rendu indéfini, comme dans le moteur d'origine.
// ============================================================================

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{PricePoint, SeriesState};
use crate::ui::theme::ChartPalette;

/// Nombre de ticks sur l'axe du temps
const X_AXIS_TICKS: usize = 6;

/// Format des dates sur l'axe et dans le tooltip
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marge verticale pour que la courbe respire (5% de l'amplitude)
const Y_MARGIN_RATIO: f64 = 0.05;

/// Nombre de points échantillonnés pour tracer la ligne verticale du crosshair
const CROSSHAIR_SAMPLES: usize = 48;

// ============================================================================
// Classification de l'état de la série
// ============================================================================

/// Ce que la vue doit rendre pour un état de série donné
///
/// NotFetched et Empty étaient confondus dans la version d'origine (série
/// vide = indicateur de chargement) ; chacun a maintenant son rendu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesView {
    /// Indicateur de chargement (rien n'est encore arrivé)
    Loading,

    /// Vue "aucune donnée" (réponse reçue, série légitimement vide)
    NoData,

    /// Le graphique lui-même
    Plot,
}

fn series_view(state: &SeriesState) -> SeriesView {
    match state {
        SeriesState::NotFetched => SeriesView::Loading,
        SeriesState::Empty => SeriesView::NoData,
        SeriesState::Loaded(_) => SeriesView::Plot,
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine la vue graphique pour le ticker affiché
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let palette = ChartPalette::for_theme(app.config.theme);
    let ticker = app.chart_symbol.as_deref().unwrap_or("?");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : ticker + tooltip
            Constraint::Min(0),    // Graphique
        ])
        .split(area)
        .to_vec();

    render_header(frame, app, ticker, palette, chunks[0]);

    match series_view(&app.chart_series) {
        SeriesView::Loading => render_placeholder(frame, chunks[1], "Chargement..."),
        SeriesView::NoData => {
            let msg = format!("Aucune donnée de prix pour {}", ticker);
            render_placeholder(frame, chunks[1], &msg);
        }
        SeriesView::Plot => {
            // Plot garantit une série non vide
            if let Some(points) = app.chart_series.points() {
                render_plot(frame, app, ticker, points, palette, chunks[1]);
            }
        }
    }
}

// ============================================================================
// Header : ticker et tooltip du point survolé
// ============================================================================

/// Dessine le header : symbole, et date/close du point sous le crosshair
fn render_header(frame: &mut Frame, app: &App, ticker: &str, palette: ChartPalette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.axis))
        .title(format!(" 📈 {} ", ticker));

    // Le tooltip est ancré sur le close du point survolé
    let text = if let Some(point) = app.hovered_point() {
        vec![Line::from(vec![
            Span::styled(
                point.date.format(DATE_FORMAT).to_string(),
                Style::default().fg(palette.axis).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  close "),
            Span::styled(
                format!("{:.2}", point.close),
                Style::default().fg(palette.line).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("[←→]", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Crosshair  "),
            Span::styled("[ESC]", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Retour"),
        ])]
    } else {
        vec![Line::from("Chargement...")]
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique principal
// ============================================================================

/// Dessine l'aire de prix, les axes et le crosshair
fn render_plot(
    frame: &mut Frame,
    app: &App,
    ticker: &str,
    points: &[PricePoint],
    palette: ChartPalette,
    area: Rect,
) {
    // Points (x, y) : x = timestamp Unix, y = close
    let line_points: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.date.timestamp() as f64, p.close))
        .collect();

    let x_bounds = x_bounds(points);
    let y_bounds = y_bounds(points);

    // Ligne verticale du crosshair à l'abscisse du point survolé
    let crosshair_points: Vec<(f64, f64)> = match app.hovered_point() {
        Some(point) => crosshair_column(point, y_bounds),
        None => Vec::new(),
    };

    // L'aire remplie est émulée par des barres sous la ligne : le terminal
    // n'a pas de canal alpha ni de vrai remplissage de polygone
    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(palette.fill))
            .data(&line_points),
        Dataset::default()
            .name(ticker)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette.line))
            .data(&line_points),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(palette.axis))
            .data(&crosshair_points),
    ];

    let x_labels: Vec<Span> = time_axis_labels(points[0].date, points[points.len() - 1].date)
        .into_iter()
        .map(Span::raw)
        .collect();

    let y_labels: Vec<Span> = price_axis_labels(y_bounds)
        .into_iter()
        .map(Span::raw)
        .collect();

    let x_axis = Axis::default()
        .style(Style::default().fg(palette.axis))
        .bounds(x_bounds)
        .labels(x_labels);

    let y_axis = Axis::default()
        .style(Style::default().fg(palette.axis))
        .bounds(y_bounds)
        .labels(y_labels);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.axis)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

// ============================================================================
// Calculs des bornes et labels
// ============================================================================

/// Bornes horizontales : exactement [date du premier point, date du dernier]
///
/// INVARIANT : série non vide et triée, sinon les bornes n'ont pas de sens.
fn x_bounds(points: &[PricePoint]) -> [f64; 2] {
    [
        points[0].date.timestamp() as f64,
        points[points.len() - 1].date.timestamp() as f64,
    ]
}

/// Bornes verticales : min/max des closes avec une marge de 5%
fn y_bounds(points: &[PricePoint]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.close), max.max(p.close))
        });

    if min == max {
        // Série plate : ouvre une fenêtre symétrique pour rester visible
        return [min - 1.0, max + 1.0];
    }

    let margin = (max - min) * Y_MARGIN_RATIO;
    [min - margin, max + margin]
}

/// Labels de l'axe du temps : 6 dates également réparties entre le premier
/// et le dernier point, au format YYYY-MM-DD
fn time_axis_labels(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<String> {
    let span = (end - start).num_seconds();
    (0..X_AXIS_TICKS)
        .map(|i| {
            let offset = span * i as i64 / (X_AXIS_TICKS - 1) as i64;
            (start + chrono::Duration::seconds(offset))
                .format(DATE_FORMAT)
                .to_string()
        })
        .collect()
}

/// Labels de l'axe des prix : min, milieu, max à 2 décimales
fn price_axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let [min, max] = bounds;
    vec![
        format!("{:.2}", min),
        format!("{:.2}", (min + max) / 2.0),
        format!("{:.2}", max),
    ]
}

/// Échantillonne la colonne verticale du crosshair à l'abscisse d'un point
fn crosshair_column(point: &PricePoint, y_bounds: [f64; 2]) -> Vec<(f64, f64)> {
    let x = point.date.timestamp() as f64;
    let [y_min, y_max] = y_bounds;
    let step = (y_max - y_min) / CROSSHAIR_SAMPLES as f64;
    (0..=CROSSHAIR_SAMPLES)
        .map(|i| (x, y_min + step * i as f64))
        .collect()
}

// ============================================================================
// Placeholder : chargement ou absence de données
// ============================================================================

/// Affiche un message centré à la place du graphique
fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default().borders(Borders::ALL);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("[ESC] Retour"),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sorted_series(n: usize) -> Vec<PricePoint> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| PricePoint::new(base + Duration::days(i as i64), 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_x_bounds_are_exactly_first_and_last_dates() {
        let points = sorted_series(30);
        let bounds = x_bounds(&points);

        assert_eq!(bounds[0], points[0].date.timestamp() as f64);
        assert_eq!(bounds[1], points[29].date.timestamp() as f64);
    }

    #[test]
    fn test_x_bounds_single_point() {
        let points = sorted_series(1);
        let bounds = x_bounds(&points);
        assert_eq!(bounds[0], bounds[1]);
    }

    #[test]
    fn test_y_bounds_cover_closes_with_margin() {
        let points = sorted_series(10); // closes de 100 à 109
        let [min, max] = y_bounds(&points);

        assert!(min < 100.0);
        assert!(max > 109.0);
        // Marge de 5% de l'amplitude (9.0)
        assert!((100.0 - min - 0.45).abs() < 1e-9);
        assert!((max - 109.0 - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_y_bounds_flat_series() {
        let base = Utc::now();
        let points = vec![
            PricePoint::new(base, 50.0),
            PricePoint::new(base + Duration::days(1), 50.0),
        ];
        let [min, max] = y_bounds(&points);
        assert!(min < 50.0 && max > 50.0);
    }

    #[test]
    fn test_time_axis_has_six_labels_with_exact_endpoints() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 28, 0, 0, 0).unwrap();

        let labels = time_axis_labels(start, end);
        assert_eq!(labels.len(), X_AXIS_TICKS);
        assert_eq!(labels[0], "2024-01-01");
        assert_eq!(labels[5], "2024-06-28");

        // Format YYYY-MM-DD sur tous les ticks
        for label in &labels {
            assert_eq!(label.len(), 10);
            assert_eq!(&label[4..5], "-");
        }
    }

    #[test]
    fn test_price_axis_labels_two_decimals() {
        let labels = price_axis_labels([99.5, 110.5]);
        assert_eq!(labels, vec!["99.50", "105.00", "110.50"]);
    }

    #[test]
    fn test_series_view_distinguishes_loading_and_empty() {
        // Série pas encore fetchée : indicateur de chargement
        assert_eq!(series_view(&SeriesState::NotFetched), SeriesView::Loading);
        // Série fetchée mais vide : vue dédiée, pas un graphique vide
        assert_eq!(series_view(&SeriesState::Empty), SeriesView::NoData);
        assert_eq!(
            series_view(&SeriesState::Loaded(sorted_series(2))),
            SeriesView::Plot
        );
    }

    #[test]
    fn test_crosshair_column_is_vertical() {
        let points = sorted_series(5);
        let column = crosshair_column(&points[2], y_bounds(&points));

        assert_eq!(column.len(), CROSSHAIR_SAMPLES + 1);
        let x = points[2].date.timestamp() as f64;
        assert!(column.iter().all(|&(cx, _)| cx == x));
        assert!(column.first().unwrap().1 < column.last().unwrap().1);
    }
}
