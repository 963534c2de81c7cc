//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use foulee_core::{Field, PLAN_WEEKS, Phase, TrainingPlan};

use super::app::{App, Focus};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the whole screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Field::ALL.len() as u16 * 2 + 2), // form
            Constraint::Min(6),                                  // calendar
            Constraint::Length(1),                               // status bar
        ])
        .split(f.area());

    render_form(f, app, chunks[0]);
    render_calendar(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::with_capacity(Field::ALL.len() * 2);
    for field in Field::ALL {
        let focused = app.focus == Focus::Form(field);
        let value = app.form.input.value(field);
        let shown = if field == Field::Sex && value.is_empty() {
            "(choisir)".to_owned()
        } else if focused && field != Field::Sex {
            format!("{value}_")
        } else {
            value.to_owned()
        };

        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<30}", field.label()), label_style),
            Span::raw(shown),
        ]));

        match app.form.error_for(field) {
            Some(message) => lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from("")),
        }
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Votre profil "),
    );
    f.render_widget(form, area);
}

fn render_calendar(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Plan marathon sur 16 semaines ");

    if app.is_loading() {
        let frame = SPINNER[(app.tick % SPINNER.len() as u64) as usize];
        let text = Paragraph::new(format!("{frame} Génération du plan en cours...")).block(block);
        f.render_widget(text, area);
        return;
    }

    let Some(plan) = app.form.plan() else {
        let text = Paragraph::new(
            "Entrez vos informations ci-dessus pour générer votre plan d'entraînement.",
        )
        .block(block);
        f.render_widget(text, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    render_week_strip(f, app, plan, chunks[0]);
    render_week_detail(f, app, plan, chunks[1]);
}

fn render_week_strip(f: &mut Frame, app: &App, plan: &TrainingPlan, area: Rect) {
    let selection = app.form.selection();
    let calendar_focused = app.focus == Focus::Calendar;

    let numbers = plan.iter().map(|week| {
        let mut style = Style::default().fg(phase_color(week.phase()));
        if selection.get() == Some(week.week()) {
            style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
        }
        if calendar_focused && selection.cursor() == week.week() {
            style = style.add_modifier(Modifier::REVERSED);
        }
        Cell::from(format!("S{}", week.week())).style(style)
    });
    let phases = plan
        .iter()
        .map(|week| Cell::from(abbreviation(week.phase())).style(Style::default().fg(Color::Gray)));

    let widths = [Constraint::Length(4); PLAN_WEEKS as usize];
    let table = Table::new([Row::new(numbers), Row::new(phases)], widths).column_spacing(1);
    f.render_widget(table, area);
}

fn render_week_detail(f: &mut Frame, app: &App, plan: &TrainingPlan, area: Rect) {
    let Some(week) = app.form.selection().get().and_then(|n| plan.week(n)) else {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Sélectionnez une semaine pour voir ses séances.",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hint, area);
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("{} ({})", week.title(), week.phase().label()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for session in week.sessions() {
        let style = if session.is_rest() {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("  - {session}"), style)));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let pane = match app.focus {
        Focus::Form(_) => "Formulaire",
        Focus::Calendar => "Calendrier",
    };
    let keys = match app.focus {
        Focus::Form(Field::Sex) => "←/→ choisir  Tab champ suivant  Entrée générer  Échap quitter",
        Focus::Form(_) => "Tab champ suivant  Entrée générer  Échap quitter",
        Focus::Calendar => "←/→ semaine  Espace sélectionner  Tab formulaire  q quitter",
    };

    let mut spans = vec![
        Span::styled(
            format!(" {pane} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::DarkGray)),
    ];
    if let Some(msg) = app.status_message.as_deref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(msg.to_owned(), Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Foundation => Color::Cyan,
        Phase::Build => Color::Blue,
        Phase::Peak => Color::Magenta,
        Phase::Taper => Color::Yellow,
        Phase::Race => Color::Red,
    }
}

fn abbreviation(phase: Phase) -> &'static str {
    match phase {
        Phase::Foundation => "Fond",
        Phase::Build => "Dév",
        Phase::Peak => "Pic",
        Phase::Taper => "Aff",
        Phase::Race => "Crse",
    }
}
