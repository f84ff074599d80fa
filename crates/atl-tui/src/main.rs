//! Terminal host for the ATL annotator
//!
//! Opens files in a read-only terminal view, activates the annotator against them and draws
//! validation errors as underlined spans. The message of the error under the caret is shown
//! above the status line, and the status line carries the annotator's indicator.
//!
//! # Usage
//!
//! ```bash
//! ATL_VALIDATOR_CMD=atl-validate cargo run -p atl-tui -- suite.yaml other.yaml
//! ```
//!
//! `--check` skips the terminal UI: every file is validated once, errors are printed as
//! `file:line:column: message` (or `file: message` when the validator gives no location) and
//! the exit status is 1 when any file has errors.
//!
//! ```bash
//! ATL_VALIDATOR_CMD=atl-validate cargo run -p atl-tui -- --check suite.yaml
//! ```
//!
//! # Configuration
//!
//! - `--config <path>`: JSON settings file (see `AnnotatorConfig`)
//! - `ATL_VALIDATOR_CMD` / `ATL_VALIDATOR_ARGS` / `ATL_LANGUAGE_ID` / `ATL_OFFSET_ENCODING`:
//!   override the file
//! - `RUST_LOG`: log filter
//! - `ATL_LOG_FILE`: where the interactive UI writes its log (no log without it)
//!
//! # Keys
//!
//! - Arrows, Home/End, PageUp/PageDown: move the caret
//! - Tab / Shift+Tab: next / previous file
//! - Ctrl+R: reload the file from disk
//! - Ctrl+T: toggle light/dark theme
//! - Ctrl+X / Esc: quit

use atl_annotator::{
    Annotator, AnnotatorConfig, AtlExtension, error_range, validator_from_config,
};
use atl_host::{
    ColorThemeKind, DecorationOptions, EditorId, Position, Selection, StatusBarAlignment,
    TextDecorationLine, TextDocument, ThemableDecorationRenderOptions, Window,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    fs::OpenOptions,
    io::{self, Write, stdout},
    path::{Path, PathBuf},
    process,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use unicode_width::UnicodeWidthChar;

const DEFAULT_LOG_FILTER: &str = "atl_annotator=info,atl_tui=info";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    check: bool,
    help: bool,
    config: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--check" => options.check = true,
            "-h" | "--help" => options.help = true,
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config needs a path".to_string())?;
                options.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            file => options.files.push(PathBuf::from(file)),
        }
    }

    if options.files.is_empty() && !options.help {
        return Err("no input files".to_string());
    }
    Ok(options)
}

fn print_usage(program: &str) {
    eprintln!("usage: {program} [--check] [--config <settings.json>] <file>...");
    eprintln!("\nexamples:");
    eprintln!("  {program} suite.yaml");
    eprintln!("  ATL_VALIDATOR_CMD=atl-validate {program} --check suite.yaml");
}

fn guess_language_id(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "yaml" | "yml" => "yaml",
        "json" => "json",
        "raml" => "raml",
        "md" | "markdown" => "markdown",
        _ => "plaintext",
    }
}

fn load_config(path: Option<&Path>) -> io::Result<AnnotatorConfig> {
    let config = match path {
        Some(path) => AnnotatorConfig::load(path).map_err(io::Error::other)?,
        None => AnnotatorConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Open every file in `window`, in order. Missing files open as empty documents.
fn open_documents(window: &mut Window, files: &[PathBuf]) -> io::Result<Vec<EditorId>> {
    let mut ids = Vec::with_capacity(files.len());
    for path in files {
        let content = if path.exists() {
            fs::read_to_string(path)?
        } else {
            String::new()
        };
        let document = TextDocument::new(path.clone(), guess_language_id(path), &content);
        ids.push(window.open_text_editor(document));
    }
    Ok(ids)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// The terminal is owned by the UI, so logs only go to `ATL_LOG_FILE` when it is set.
fn init_file_logging() -> io::Result<()> {
    let Some(path) = env::var_os("ATL_LOG_FILE") else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Validate every file once and print the result. Returns the process exit code.
///
/// Every reported error counts, including those without a source location.
fn run_check(options: &Options, out: &mut impl Write) -> io::Result<i32> {
    let config = load_config(options.config.as_deref())?;
    let encoding = config.offset_encoding;
    let mut window = Window::new();
    let ids = open_documents(&mut window, &options.files)?;

    let validator = validator_from_config(&config);
    let annotator = Annotator::new(&mut window, config, validator);
    let mut failed = false;

    for id in ids {
        let Some(editor) = window.text_editor(id) else {
            continue;
        };
        let document = editor.document();
        let file = document.file_name().display();

        if document.language_id() != annotator.config().language_id {
            writeln!(out, "{file}: skipped, not an ATL document")?;
            continue;
        }

        match annotator.validate(document) {
            Ok(None) => writeln!(out, "{file}: skipped, not an ATL document")?,
            Ok(Some(errors)) if errors.is_empty() => writeln!(out, "{file}: ok")?,
            Ok(Some(errors)) => {
                failed = true;
                for error in &errors {
                    match error_range(document, error, encoding) {
                        Some(range) => writeln!(
                            out,
                            "{file}:{}:{}: {error}",
                            range.start.line + 1,
                            range.start.column + 1
                        )?,
                        None => writeln!(out, "{file}: {error}")?,
                    }
                }
            }
            Err(err) => {
                failed = true;
                tracing::warn!(file = %file, error = %err, "ATL validation failed");
                writeln!(out, "{file}: validator failed: {err}")?;
            }
        }
    }

    annotator.dispose();
    Ok(i32::from(failed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaretMove {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Where `motion` takes a caret at `from`.
fn caret_target(document: &TextDocument, from: Position, motion: CaretMove, page: usize) -> Position {
    let last_line = document.line_count().saturating_sub(1);
    let on_line = |line: usize, column: usize| Position::new(line, column.min(document.line_len(line)));

    match motion {
        CaretMove::Left if from.column > 0 => Position::new(from.line, from.column - 1),
        CaretMove::Left if from.line > 0 => {
            Position::new(from.line - 1, document.line_len(from.line - 1))
        }
        CaretMove::Left => from,
        CaretMove::Right if from.column < document.line_len(from.line) => {
            Position::new(from.line, from.column + 1)
        }
        CaretMove::Right if from.line < last_line => Position::new(from.line + 1, 0),
        CaretMove::Right => from,
        CaretMove::Up => on_line(from.line.saturating_sub(1), from.column),
        CaretMove::Down => on_line((from.line + 1).min(last_line), from.column),
        CaretMove::Home => Position::new(from.line, 0),
        CaretMove::End => Position::new(from.line, document.line_len(from.line)),
        CaretMove::PageUp => on_line(from.line.saturating_sub(page.max(1)), from.column),
        CaretMove::PageDown => on_line((from.line + page.max(1)).min(last_line), from.column),
    }
}

fn decoration_style(options: &ThemableDecorationRenderOptions) -> Style {
    let mut style = Style::default();
    if let Some(color) = options.color.as_deref().and_then(|c| c.parse::<Color>().ok()) {
        style = style.fg(color);
    }
    match options.text_decoration {
        Some(TextDecorationLine::Underline) => style.add_modifier(Modifier::UNDERLINED),
        Some(TextDecorationLine::LineThrough) => style.add_modifier(Modifier::CROSSED_OUT),
        None => style,
    }
}

/// Split one document line into spans, styling the characters any decoration covers.
fn styled_line(text: &str, line: usize, decorations: &[DecorationOptions], style: Style) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_marked = false;

    for (column, ch) in text.chars().enumerate() {
        let pos = Position::new(line, column);
        let marked = decorations.iter().any(|d| d.range.contains(pos));
        if marked != run_marked && !run.is_empty() {
            spans.push(styled_span(std::mem::take(&mut run), run_marked, style));
        }
        run_marked = marked;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(styled_span(run, run_marked, style));
    }

    Line::from(spans)
}

fn styled_span(text: String, marked: bool, style: Style) -> Span<'static> {
    if marked {
        Span::styled(text, style)
    } else {
        Span::raw(text)
    }
}

/// Application state
struct App {
    extension: AtlExtension,
    window: Window,
    should_quit: bool,
    status_message: String,
    scroll_top: usize,
    viewport_height: usize,
}

impl App {
    fn new(options: &Options) -> io::Result<Self> {
        let config = load_config(options.config.as_deref())?;
        let mut window = Window::new();
        let ids = open_documents(&mut window, &options.files)?;
        window
            .set_active_text_editor(ids.first().copied())
            .map_err(io::Error::other)?;

        let extension = AtlExtension::activate_with_config(&mut window, config);

        Ok(Self {
            extension,
            window,
            should_quit: false,
            status_message: String::new(),
            scroll_top: 0,
            viewport_height: 0,
        })
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status_message.clear();

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('x')) | (_, KeyCode::Esc) => {
                self.should_quit = true;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => self.reload(),
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Tab) => self.switch_file(true),
            (_, KeyCode::BackTab) => self.switch_file(false),
            (_, KeyCode::Left) => self.move_caret(CaretMove::Left),
            (_, KeyCode::Right) => self.move_caret(CaretMove::Right),
            (_, KeyCode::Up) => self.move_caret(CaretMove::Up),
            (_, KeyCode::Down) => self.move_caret(CaretMove::Down),
            (_, KeyCode::Home) => self.move_caret(CaretMove::Home),
            (_, KeyCode::End) => self.move_caret(CaretMove::End),
            (_, KeyCode::PageUp) => self.move_caret(CaretMove::PageUp),
            (_, KeyCode::PageDown) => self.move_caret(CaretMove::PageDown),
            _ => {}
        }

        self.adjust_scroll();
    }

    fn move_caret(&mut self, motion: CaretMove) {
        let Some(editor) = self.window.active_text_editor() else {
            return;
        };
        let id = editor.id();
        let target = caret_target(
            editor.document(),
            editor.selection().active(),
            motion,
            self.viewport_height,
        );

        if let Err(err) = self.window.set_selection(id, Selection::caret(target)) {
            self.status_message = err.to_string();
        }
    }

    fn switch_file(&mut self, forward: bool) {
        self.window.cycle_active_text_editor(forward);
        self.scroll_top = 0;
    }

    /// Re-read the active file and validate the new content.
    fn reload(&mut self) {
        let Some(editor) = self.window.active_text_editor_mut() else {
            return;
        };
        let path = editor.document().file_name().to_path_buf();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                self.status_message = format!("reload failed: {err}");
                return;
            }
        };
        editor.document_mut().set_text(&content);
        let id = editor.id();
        let selection = editor.selection();

        self.extension
            .annotator()
            .refresh(self.window.active_text_editor_mut());
        // The old caret may now be past the end of the document.
        if let Err(err) = self.window.set_selection(id, selection) {
            self.status_message = err.to_string();
            return;
        }
        tracing::info!(file = %path.display(), "reloaded");
        self.status_message = format!("reloaded {}", path.display());
    }

    fn toggle_theme(&mut self) {
        let theme = match self.window.color_theme() {
            ColorThemeKind::Dark => ColorThemeKind::Light,
            ColorThemeKind::Light => ColorThemeKind::Dark,
        };
        self.window.set_color_theme(theme);
        self.status_message = format!("{theme:?} theme");
    }

    /// Keep the caret line inside the viewport.
    fn adjust_scroll(&mut self) {
        let Some(editor) = self.window.active_text_editor() else {
            return;
        };
        if self.viewport_height == 0 {
            return;
        }

        let caret_line = editor.selection().active().line;
        if caret_line < self.scroll_top {
            self.scroll_top = caret_line;
        }
        if caret_line >= self.scroll_top + self.viewport_height {
            self.scroll_top = caret_line + 1 - self.viewport_height;
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // editor
                Constraint::Length(1), // error under the caret
                Constraint::Length(1), // status line
                Constraint::Length(1), // shortcuts
            ])
            .split(frame.area());

        self.viewport_height = chunks[0].height.saturating_sub(2) as usize;
        self.adjust_scroll();

        self.render_editor(frame, chunks[0]);
        self.render_hover_line(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
        self.render_shortcuts(frame, chunks[3]);
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let Some(editor) = self.window.active_text_editor() else {
            frame.render_widget(Paragraph::new("no file open").block(block), area);
            return;
        };
        let document = editor.document();

        let decoration_type = self.extension.annotator().decoration_type();
        let style = decoration_style(&decoration_type.options().resolve(self.window.color_theme()));
        let decorations = editor.decorations(decoration_type.id());

        let inner_height = area.height.saturating_sub(2) as usize;
        let last = (self.scroll_top + inner_height).min(document.line_count());
        let lines: Vec<Line> = (self.scroll_top..last)
            .map(|line| {
                let text = document.line_text(line).unwrap_or_default();
                styled_line(&text, line, decorations, style)
            })
            .collect();

        let title = format!(
            " {} [{}] ",
            document.file_name().display(),
            document.language_id()
        );
        frame.render_widget(Paragraph::new(lines).block(block.title(title)), area);

        let caret = editor.selection().active();
        if caret.line < self.scroll_top || caret.line >= last {
            return;
        }

        let inner_left = area.x + 1;
        let inner_top = area.y + 1;
        let inner_right = area.x + area.width.saturating_sub(2);
        if inner_left > inner_right {
            return;
        }

        let text = document.line_text(caret.line).unwrap_or_default();
        let caret_x: usize = text
            .chars()
            .take(caret.column)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();
        let x = (inner_left as usize + caret_x).min(inner_right as usize) as u16;
        let y = inner_top + (caret.line - self.scroll_top) as u16;
        frame.set_cursor_position((x, y));
    }

    fn render_hover_line(&self, frame: &mut Frame, area: Rect) {
        let messages: Vec<&str> = self
            .window
            .active_text_editor()
            .map(|editor| {
                editor
                    .decorations_at(editor.selection().active())
                    .into_iter()
                    .filter_map(|(_, decoration)| decoration.hover_message.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        let hover = Paragraph::new(messages.join("; ")).style(Style::default().fg(Color::LightRed));
        frame.render_widget(hover, area);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let item_style = Style::default()
            .bg(Color::Green)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        let (left, right): (Vec<_>, Vec<_>) = self
            .window
            .status_bar()
            .visible_items()
            .into_iter()
            .partition(|entry| entry.alignment == StatusBarAlignment::Left);

        let mut spans: Vec<Span> = left
            .into_iter()
            .map(|entry| Span::styled(format!(" {} ", entry.text), item_style))
            .collect();

        let info = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if let Some(editor) = self.window.active_text_editor() {
            let caret = editor.selection().active();
            let errors = editor.decoration_count();
            format!(
                "Ln {}, Col {} | {} error(s) | file {} of {}",
                caret.line + 1,
                caret.column + 1,
                errors,
                self.active_file_number(),
                self.window.visible_text_editors().count()
            )
        } else {
            String::new()
        };
        spans.push(Span::raw(format!(" {info} ")));
        spans.extend(
            right
                .into_iter()
                .map(|entry| Span::styled(format!(" {} ", entry.text), item_style)),
        );

        let status_line = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(status_line, area);
    }

    fn active_file_number(&self) -> usize {
        let active = self.window.active_text_editor_id();
        self.window
            .visible_text_editors()
            .position(|editor| Some(editor.id()) == active)
            .map_or(0, |index| index + 1)
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = "Arrows:move  Tab/Shift-Tab:switch file  Ctrl-R:reload  Ctrl-T:theme  Ctrl-X/Esc:quit";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(shortcuts_line, area);
    }
}

fn main() -> io::Result<()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "atl-tui".to_string());

    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage(&program);
            process::exit(2);
        }
    };
    if options.help {
        print_usage(&program);
        return Ok(());
    }

    if options.check {
        init_stderr_logging();
        let code = run_check(&options, &mut stdout().lock())?;
        process::exit(code);
    }

    init_file_logging()?;
    let mut app = App::new(&options)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    restore_then(result, || {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()
    })
}

/// Run `restore`, then hand back `result`. A failed restore wins over the UI's own result.
fn restore_then<T>(
    result: io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    restore()?;
    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key_event(key);
        }
    }

    Ok(())
}
