//! Rendering adapters writing the status to a status host.
//!
//! - [`PlainRenderer`]: one text line per state, optionally followed by the
//!   indented detail rows (tmux, i3blocks, shell prompts)
//! - [`JsonRenderer`]: one JSON object per line in the waybar custom-module
//!   format

use std::io::{self, Write};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::refresh::PresentationState;
use crate::view::{self, StatusView};

/// Output format selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Plain,
    /// waybar-compatible JSON lines.
    Json,
}

/// Writes a presentation state somewhere.
pub trait Renderer {
    /// Render one state.
    fn render(&mut self, state: &PresentationState) -> io::Result<()>;
}

/// Build the renderer for `format` writing to `out`.
pub fn renderer_for<W: Write + 'static>(
    format: OutputFormat,
    out: W,
    details: bool,
) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Plain => Box::new(PlainRenderer::new(out, details)),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
    }
}

/// Render every state change until the sender side is dropped.
///
/// If the receiver falls behind, the skipped states are dropped and the
/// current state from `cell` is rendered instead.
pub async fn render_updates(
    mut rx: broadcast::Receiver<PresentationState>,
    cell: Arc<RwLock<PresentationState>>,
    renderer: &mut dyn Renderer,
) -> io::Result<()> {
    loop {
        match rx.recv().await {
            Ok(state) => renderer.render(&state)?,
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "renderer lagged behind state updates");
                let current = cell.read().await.clone();
                renderer.render(&current)?;
            }
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

/// Plain text renderer.
pub struct PlainRenderer<W> {
    out: W,
    details: bool,
}

impl<W: Write> PlainRenderer<W> {
    /// Renderer writing to `out`; `details` adds the tree rows.
    pub fn new(out: W, details: bool) -> Self {
        Self { out, details }
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn render(&mut self, state: &PresentationState) -> io::Result<()> {
        let status = StatusView::from_state(state);
        writeln!(self.out, "{}", status.text)?;
        if self.details {
            for row in view::rows(state) {
                if row.is_empty() {
                    writeln!(self.out)?;
                } else {
                    writeln!(self.out, "  {row}")?;
                }
            }
        }
        self.out.flush()
    }
}

/// waybar custom-module line.
#[derive(Debug, Serialize)]
struct WaybarLine<'a> {
    text: &'a str,
    tooltip: &'a str,
    class: &'a str,
    percentage: i64,
}

/// JSON lines renderer.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, state: &PresentationState) -> io::Result<()> {
        let status = StatusView::from_state(state);
        let class = status.tier.map_or_else(|| state.name(), |tier| tier.as_str());
        let percentage = state
            .record()
            .map_or(0, |record| record.percent_rounded().clamp(0, 100));
        let line = WaybarLine {
            text: &status.text,
            tooltip: &status.tooltip,
            class,
            percentage,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
