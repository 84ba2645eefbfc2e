//! Terminal price ticker.

use std::io::{self, Write};
use std::time::Duration;
use crossterm::{cursor, queue, style::Print, terminal};
use tf_core::{Marquee, Result};
use tf_feeds::FeedManager;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TickerOptions {
    pub speed: usize,
    /// Columns to draw; the terminal width when unset.
    pub width: Option<usize>,
    pub interval: Duration,
}

fn terminal_width() -> usize {
    match terminal::size() {
        Ok((cols, _)) => usize::from(cols),
        Err(e) => {
            warn!("Could not detect terminal size, using 80 columns: {}", e);
            80
        }
    }
}

/// Redraws the current line with the visible window of the strip.
pub fn draw_frame<W: Write>(out: &mut W, marquee: &Marquee, width: usize) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        Print(marquee.frame(width))
    )?;
    out.flush()
}

pub async fn run(feeds: &FeedManager, options: TickerOptions, token: &CancellationToken) -> Result<()> {
    let ticks = feeds.prices().await?;
    let mut marquee = Marquee::from_ticks(&ticks, options.speed);
    if marquee.is_empty() {
        println!("No prices to show");
        return Ok(());
    }

    let width = options.width.unwrap_or_else(terminal_width);
    info!("📈 Ticker running with {} coins, Ctrl-C to stop", ticks.len());

    let mut stdout = io::stdout();
    queue!(stdout, cursor::Hide)?;
    let mut interval = tokio::time::interval(options.interval);

    let outcome = loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break Ok(()),
            _ = interval.tick() => {
                if let Err(e) = draw_frame(&mut stdout, &marquee, width) {
                    break Err(e);
                }
                marquee.tick();
            }
        }
    };

    queue!(stdout, cursor::Show, Print("\n"))?;
    stdout.flush()?;
    outcome.map_err(Into::into)
}
