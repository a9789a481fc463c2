mod app;
mod config;
mod event;
mod logging;
mod lookup;
mod session;
mod speech;
mod ui;
mod words;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing::{info, warn};

use app::{App, AppScreen, SETTINGS_FIELDS};
use config::Config;
use event::{AppEvent, EventHandler};
use speech::engine::SpeechEngine;
use ui::components::dashboard::Dashboard;
use ui::components::definition_panel::DefinitionPanel;
use ui::components::menu::MenuAction;
use ui::components::progress_bar::ProgressBar;
use ui::components::word_card::WordCard;
use ui::layout::{AppLayout, LayoutTier, pack_hint_lines};
use words::bank::{WordBank, clamp_word_count};

#[derive(Parser)]
#[command(name = "spellbee", version, about = "Terminal spelling practice with spoken words")]
struct Cli {
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "Number of words per session (clamped to the word list)"
    )]
    words: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Voice handle reported by --list-voices")]
    voice: Option<String>,

    #[arg(long, value_name = "PATH", help = "Word list (JSON array or one word per line)")]
    words_file: Option<String>,

    #[arg(short, long, help = "Speech engine (auto, espeak-ng, espeak, say, spd-say, none)")]
    engine: Option<String>,

    #[arg(long, help = "Skip dictionary lookups")]
    offline: bool,

    #[arg(long, help = "Disable the log file")]
    no_log: bool,

    #[arg(long, help = "Print the voices for the configured locale and exit")]
    list_voices: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("config ignored: {err:#}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(voice) = cli.voice {
        config.voice = Some(voice);
    }
    if let Some(path) = cli.words_file {
        config.words_file = Some(path);
    }
    if let Some(engine) = cli.engine {
        config.speech_engine = engine;
    }
    if cli.offline {
        config.lookups_enabled = false;
    }
    config.validate();

    let _log_guard = if cli.no_log {
        None
    } else {
        logging::init_tracing(&config.log_level)
    };
    info!(version = env!("CARGO_PKG_VERSION"), "spellbee starting");

    if cli.list_voices {
        return list_voices(&config);
    }

    let bank = load_bank(&config);
    if let Some(raw) = cli.words.as_deref() {
        config.word_count = clamp_word_count(raw, bank.len());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut app = App::new(config, bank, events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    info!("spellbee exiting");
    Ok(())
}

fn load_bank(config: &Config) -> WordBank {
    let Some(path) = config.words_file.as_deref() else {
        return WordBank::load();
    };
    match WordBank::from_file(Path::new(path)) {
        Ok(bank) if !bank.is_empty() => {
            info!(path, words = bank.len(), "word list loaded");
            bank
        }
        Ok(_) => {
            warn!(path, "word list is empty, using bundled words");
            WordBank::load()
        }
        Err(err) => {
            warn!(%err, "using bundled words");
            WordBank::load()
        }
    }
}

fn list_voices(config: &Config) -> Result<()> {
    let Some(engine) = SpeechEngine::resolve(&config.speech_engine) else {
        println!("No speech engine available.");
        return Ok(());
    };
    let list = speech::voices::enumerate(engine, &config.locale)?;
    if list.voices.is_empty() {
        println!("{} offers no voices for {}.", engine.binary(), config.locale);
        return Ok(());
    }
    for voice in &list.voices {
        println!("{:<32} {}", voice.handle, voice.display_name());
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Definition(reply) => app.on_definition(reply),
            AppEvent::VoicesReady(list) => app.on_voices(list),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Char(ch) if ch.is_ascii_digit() => app.count_push_digit(ch),
        KeyCode::Backspace => app.count_backspace(),
        KeyCode::Left | KeyCode::Char('h') => app.count_adjust(-1),
        KeyCode::Right | KeyCode::Char('l') => app.count_adjust(1),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected_action() {
            MenuAction::Start => app.start_session(),
            MenuAction::Settings => app.go_to_settings(),
            MenuAction::Quit => app.should_quit = true,
        },
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.judge(true),
        KeyCode::Left | KeyCode::Char('h') => app.judge(false),
        KeyCode::Up | KeyCode::Char('k') => app.repeat(),
        KeyCode::Down | KeyCode::Char('j') => app.reveal(),
        KeyCode::Esc => app.abandon_session(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_session(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(),
        KeyCode::Char('r') => app.refresh_voices(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let voice = app
        .selected_voice()
        .map_or_else(|| "default voice".to_string(), |v| v.display_name());
    let header_info = format!(
        " {} words | speech: {} | {}",
        app.bank.len(),
        app.engine_name(),
        voice,
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " spellbee ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let count_field = Paragraph::new(Line::from(vec![
        Span::styled("  Words this session: ", Style::default().fg(colors.fg())),
        Span::styled(
            format!("< {} >", app.count_input),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  (0-{})", app.bank.len()),
            Style::default().fg(colors.text_pending()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(count_field, layout[2]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " [Enter] Start  [0-9/←→] Word count  [c] Settings  [q] Quit ",
        Style::default().fg(colors.text_pending()),
    )]));
    frame.render_widget(footer, layout[3]);
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    if !app.view.panel_visible {
        return;
    }

    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;

    let header_text = format!(
        " spellbee | word {} of {} | {} correct so far",
        app.session.presented(),
        app.session.total(),
        app.session.correct_so_far(),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        &*header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let show_progress = tier.show_progress_bar(area.height);
    let mut constraints: Vec<Constraint> = vec![Constraint::Min(5)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    let card = WordCard::new(&app.view, app.theme).inline_definition(tier == LayoutTier::Narrow);
    frame.render_widget(card, main_layout[0]);

    if show_progress {
        let progress = ProgressBar::new(
            "Progress",
            app.session.presented(),
            app.session.total(),
            app.theme,
        );
        frame.render_widget(progress, main_layout[1]);
    }

    if let Some(definition_area) = app_layout.definition {
        let panel = DefinitionPanel::new(app.view.definition.as_ref(), app.theme);
        frame.render_widget(panel, definition_area);
    }

    let hints: &[&str] = if app.view.controls_enabled {
        &[
            "[→/l] Correct",
            "[←/h] Incorrect",
            "[↑/k] Repeat",
            "[↓/j] Reveal",
            "[Esc] Quit session",
        ]
    } else {
        &["[Esc] Quit session"]
    };
    let lines: Vec<Line> = pack_hint_lines(hints, app_layout.footer.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), app_layout.footer);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let (Some(result), Some(table)) = (app.session.result(), app.view.results.as_ref()) {
        let centered = ui::layout::centered_rect(60, 70, area);
        let dashboard = Dashboard::new(result, table, app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let voice = if !app.voices_loaded {
        "loading voices…".to_string()
    } else {
        app.selected_voice()
            .map_or_else(|| "engine default".to_string(), |v| v.display_name())
    };
    let lookups = if app.config.lookups_enabled { "on" } else { "off" };

    let fields: Vec<(String, String)> = vec![
        ("Voice".to_string(), voice),
        ("Theme".to_string(), app.config.theme.clone()),
        ("Speech Engine".to_string(), app.config.speech_engine.clone()),
        ("Dictionary Lookups".to_string(), lookups.to_string()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_pending()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });

        let value_style = Style::default().fg(if is_selected {
            colors.word()
        } else {
            colors.text_pending()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value  [r] Reload voices",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
