use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use dictr::app::App;
use dictr::audio::{AudioOutput, ExternalPlayer, PlaybackRate, SilentOutput};
use dictr::capture::{CaptureHost, CommandCaptureHost, NoCaptureHost};
use dictr::catalog::{Catalog, LessonFile, import, lesson::DEFAULT_LESSON};
use dictr::config::Config;
use dictr::event::{AppEvent, EventHandler};
use dictr::session::{DictationMode, PracticeMode};
use dictr::{logging, ui};

#[derive(Parser)]
#[command(
    name = "dictr",
    version,
    about = "Dictation and shadowing practice for timestamped listening lessons"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, help = "Lesson TOML file (default: bundled lesson)")]
    lesson: Option<PathBuf>,

    #[arg(short, long, help = "Audio file, overriding the lesson's")]
    audio: Option<PathBuf>,

    #[arg(short, long, help = "Playback speed (0.25 to 2.0)")]
    speed: Option<f32>,

    #[arg(long, help = "UI language (en, zh-CN)")]
    locale: Option<String>,

    #[arg(short, long, help = "Dictation type: missing-word, sequential, whole")]
    dictation: Option<DictationMode>,

    #[arg(long, help = "Start in shadowing mode")]
    shadowing: bool,

    #[arg(long, help = "Run without audio output")]
    silent: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a transcription segment dump (JSON) into a lesson file.
    Import {
        segments: PathBuf,
        #[arg(long, help = "Lesson title (default: file stem)")]
        title: Option<String>,
        #[arg(long, help = "Audio path to store in the lesson")]
        audio: Option<String>,
        #[arg(short, long, help = "Output file (default: stdout)")]
        output: Option<PathBuf>,
    },
    /// Draft a lesson by cutting the recording into fixed-length windows.
    Draft {
        #[arg(help = "Length of the recording in seconds")]
        duration: f64,
        #[arg(long, default_value_t = 4.0, help = "Window length in seconds")]
        segment: f64,
        #[arg(long, default_value_t = 2.0, help = "Shortest window kept, in seconds")]
        min_segment: f64,
        #[arg(long, default_value = "Untitled", help = "Lesson title")]
        title: String,
        #[arg(long, help = "Audio path to store in the lesson")]
        audio: Option<String>,
        #[arg(short, long, help = "Output file (default: stdout)")]
        output: Option<PathBuf>,
    },
    /// Check a lesson file and print a short summary.
    Validate { lesson: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load().unwrap_or_default();

    if let Some(speed) = cli.speed {
        config.playback_rate = PlaybackRate::nearest(speed).value();
    }
    if let Some(locale) = cli.locale.clone() {
        config.locale = locale;
    }
    if let Some(dictation) = cli.dictation {
        config.default_dictation_mode = dictation;
    }
    if let Some(theme) = cli.theme.clone() {
        config.theme = theme;
    }
    dictr::set_locale(&config.locale);

    match cli.command {
        Some(Command::Import {
            segments,
            title,
            audio,
            output,
        }) => {
            logging::init_stderr(&config.log_level);
            run_import(segments, title, audio, output)
        }
        Some(Command::Draft {
            duration,
            segment,
            min_segment,
            title,
            audio,
            output,
        }) => {
            logging::init_stderr(&config.log_level);
            let lesson = import::fixed_interval_lesson(
                duration,
                segment,
                min_segment,
                &title,
                audio.as_deref(),
            )?;
            write_lesson(&lesson, output)
        }
        Some(Command::Validate { lesson }) => {
            logging::init_stderr(&config.log_level);
            run_validate(lesson)
        }
        None => run_tui(cli, config),
    }
}

fn run_import(
    segments: PathBuf,
    title: Option<String>,
    audio: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let json = fs::read_to_string(&segments)
        .with_context(|| format!("reading {}", segments.display()))?;
    let title = title.unwrap_or_else(|| {
        segments
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    });
    let lesson = import::lesson_from_segments(&json, &title, audio.as_deref())?;
    write_lesson(&lesson, output)
}

fn write_lesson(lesson: &LessonFile, output: Option<PathBuf>) -> Result<()> {
    let count = lesson.sentences.len();
    // Refuse to write something the trainer would reject.
    Catalog::new(lesson.clone(), None)?;
    let toml = import::to_toml(lesson)?;
    match output {
        Some(path) => {
            fs::write(&path, toml).with_context(|| format!("writing {}", path.display()))?;
            info!(sentences = count, path = %path.display(), "lesson written");
        }
        None => print!("{toml}"),
    }
    Ok(())
}

fn run_validate(path: PathBuf) -> Result<()> {
    let catalog = Catalog::load(&path)?;
    let seconds: f64 = catalog.sentences().iter().map(|s| s.duration()).sum();
    println!(
        "{}: {} sentences, {:.1}s of speech, audio {}",
        catalog.title(),
        catalog.len(),
        seconds,
        catalog
            .audio()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(())
}

fn run_tui(cli: Cli, config: Config) -> Result<()> {
    let log_path = logging::init(&config.log_level)?;

    let mut catalog = match &cli.lesson {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading lesson {}", path.display()))?,
        None => Catalog::embedded(DEFAULT_LESSON)?,
    };
    if let Some(audio) = cli.audio.clone() {
        catalog.set_audio(audio);
    }
    info!(log = %log_path.display(), lesson = catalog.title(), "dictr starting");

    let events = EventHandler::new(Duration::from_millis(50));

    let audio_file = catalog.audio().filter(|p| p.exists()).map(|p| p.to_path_buf());
    let output: Box<dyn AudioOutput> = match audio_file {
        Some(path) if !cli.silent => Box::new(ExternalPlayer::new(&config.player_command, Some(path))),
        _ => {
            if !cli.silent {
                error!(audio = ?catalog.audio(), "audio file missing, playing silently");
            }
            Box::new(SilentOutput)
        }
    };
    let host: Box<dyn CaptureHost> = if config.recorder_command.is_empty() {
        Box::new(NoCaptureHost)
    } else {
        Box::new(CommandCaptureHost::new(
            &config.recognizer_command,
            &config.recorder_command,
            events.sender(),
        ))
    };
    let mode = if cli.shadowing {
        PracticeMode::Shadowing
    } else {
        PracticeMode::Dictation
    };

    let mut app = App::new(config, catalog, mode, output, host);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Try to enable keyboard enhancement for Release event support
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "session ended with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::screen::render(frame, app))?;

        let event = events.next()?;
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => app.handle_key(key, now),
            AppEvent::Capture(event) => app.handle_capture(event, now),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }
        // Continuations and stop deadlines run on every event, not only idle ticks.
        app.tick(now);

        if app.should_quit {
            info!("quit");
            return Ok(());
        }
    }
}
