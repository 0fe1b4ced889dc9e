mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use star_catcher::config::{load_config, Config, LogConfig};
use star_catcher::host::Host;
use star_catcher::input::KeyTracker;

#[derive(Parser, Debug)]
#[command(name = "star_catcher", about = "Catch the falling stars, dodge the bombs", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the sprite images
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
    /// Log file (overrides the config)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("star_catcher.log")
}

/// Logs go to a file: stderr would tear through the alternate screen.
fn init_logging(settings: &LogConfig, override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(|| settings.file.clone())
        .unwrap_or_else(default_log_path);
    let file = File::create(&path).with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(settings.level.as_str()))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(path)
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode, alternate screen and mouse capture for as long as it lives.
/// Dropping it puts the terminal back, whichever way `main` exits.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = TerminalGuard { keyboard_enhanced: false };
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        // Request key-release (and key-repeat) events from the terminal.
        // Kitty-protocol terminals support this; others fall back gracefully.
        guard.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
            .is_ok();
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal(self.keyboard_enhanced);
    }
}

fn restore_terminal(keyboard_enhanced: bool) {
    let mut out = stdout();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Restore the terminal before the panic message prints, so it lands on the
/// normal screen.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal(true);
        log::error!("Panic: {info}");
        default_hook(info);
    }));
}

// ── Main loop ─────────────────────────────────────────────────────────────────

/// What an input event asks the loop to do.
enum Action {
    Continue,
    Quit,
}

fn handle_event(
    ev: Event,
    host: &mut Host,
    keys: &mut KeyTracker,
    config: &Config,
) -> Action {
    match ev {
        Event::Key(key) => {
            keys.record(&key);
            if key.kind != KeyEventKind::Press {
                return Action::Continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
                KeyCode::Enter | KeyCode::Char(' ') if host.start_button_visible() => host.click_start(),
                _ => {}
            }
        }
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
            let layout = display::layout(host, &config.display);
            if host.start_button_visible() && display::button_rect(&layout, &config.button).contains(column, row) {
                host.click_start();
            }
        }
        Event::Resize(cols, rows) => {
            host.resize(display::viewport_for(cols, rows, &config.display));
        }
        _ => {}
    }
    Action::Continue
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, host: &mut Host, config: &Config) -> anyhow::Result<()> {
    let frame = Duration::from_secs_f32(config.game.frame_dt());
    let mut keys = KeyTracker::new();

    loop {
        let frame_start = Instant::now();
        keys.begin_frame();

        // Drain all pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            if let Action::Quit = handle_event(ev, host, &mut keys, config) {
                return Ok(());
            }
        }

        host.frame(&keys.cursor_keys());
        display::render(out, host, &config.button, &config.display)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let log_path = init_logging(&config.log, cli.log_file.as_deref())?;
    log::info!("Logging to {}", log_path.display());

    let (cols, rows) = terminal::size()?;
    let mut host = Host::new(
        config.game.clone(),
        cli.assets.clone(),
        cli.seed,
        display::viewport_for(cols, rows, &config.display),
    );

    let mut out = BufWriter::new(stdout());
    install_panic_hook();
    let guard = TerminalGuard::enter(&mut out)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                log::error!("Terminal event read failed: {err}");
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &mut host, &config);
    host.shutdown();
    drop(guard);

    if let Err(err) = &result {
        log::error!("Exiting on error: {err:#}");
    }
    result
}
