//! Terminal fog-of-war demo: one observer circles the centre of a random
//! arena. Red tiles are visible now, grey ones were seen before, black ones
//! were never seen.
//!
//! Run: cargo run --bin orbit [seed]
//! Logs: RUST_LOG=debug cargo run --bin orbit 2> fog.log

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use murk_demos::{Arena, GRID_SIZE, Orbit, SIGHT_RADIUS, Shade};
use murk_fov::{FogConfig, FogOfWar, Observer, Point, TickStats, VisibilityGrid};

const FRAME: Duration = Duration::from_millis(33);

/// Raw mode and the alternate screen for as long as it lives.
struct Screen;

impl Screen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Screen)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn tile_color(grid: &VisibilityGrid, p: Point) -> Color {
    let Some(t) = grid.tile(p) else {
        return Color::Black;
    };
    let (r, g, b) = Shade::of(t).rgb(t.height());
    Color::Rgb { r, g, b }
}

/// Two tile rows per terminal line, using the upper half block.
fn draw(out: &mut impl Write, grid: &VisibilityGrid, stats: &TickStats) -> io::Result<()> {
    for row in 0..(grid.size() + 1) / 2 {
        queue!(out, cursor::MoveTo(0, row as u16))?;
        for x in 0..grid.size() {
            let top = tile_color(grid, Point::new(x, row * 2));
            let bottom = tile_color(grid, Point::new(x, row * 2 + 1));
            queue!(
                out,
                SetForegroundColor(top),
                SetBackgroundColor(bottom),
                Print('▀')
            )?;
        }
    }
    queue!(
        out,
        ResetColor,
        cursor::MoveTo(0, ((grid.size() + 1) / 2) as u16),
        terminal::Clear(ClearType::CurrentLine),
        Print(format!(
            "visible {:4}  seen {:4}/{}  cleanup +{}  (q to quit)",
            stats.visible,
            stats.seen,
            grid.size() * grid.size(),
            stats.cleanup_revealed
        ))
    )?;
    out.flush()
}

fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true);
                }
                _ => {}
            }
        }
    }
    Ok(false)
}

fn run(seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    let arena = Arena::generate(seed, GRID_SIZE);
    let cfg = FogConfig {
        grid_size: GRID_SIZE,
        ..FogConfig::default()
    };
    let mut fog = FogOfWar::new(cfg, &arena)?;
    let mut orbit = Orbit::default();
    log::info!("arena seed {seed}, {GRID_SIZE}x{GRID_SIZE} tiles");

    let _screen = Screen::enter()?;
    let mut stdout = io::stdout();
    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let (x, z) = orbit.advance(now.duration_since(last).as_secs_f32());
        last = now;

        let observers: Vec<Observer> = fog
            .mapping()
            .to_tile(x, z)
            .map(|p| Observer::new(p, SIGHT_RADIUS))
            .into_iter()
            .collect();
        let stats = fog.update(&observers)?;
        draw(&mut stdout, fog.grid(), &stats)?;

        if quit_requested()? {
            return Ok(());
        }
        std::thread::sleep(FRAME.saturating_sub(now.elapsed()));
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    if let Err(e) = run(seed) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
