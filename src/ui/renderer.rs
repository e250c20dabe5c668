//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute a [`UIViewModel`] from the state, then
//! hand it to the components. [`render_to_string`] returns the finished frame
//! so callers decide where it goes; [`render`] writes it to stdout.
//!
//! # Example
//!
//! ```rust
//! use listagain::app::AppState;
//! use listagain::ui::render_to_string;
//!
//! let state = AppState::default();
//! let frame = render_to_string(&state, 24, 80);
//! assert!(frame.contains("Browse"));
//! ```

use std::io::Write;

use crate::app::AppState;
use crate::domain::Result;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[H";

/// Renders the state to a string holding ANSI escapes.
#[must_use]
pub fn render_to_string(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols)
}

/// Renders the state to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn render(state: &AppState, rows: usize, cols: usize) -> Result<()> {
    let frame = render_to_string(state, rows, cols);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(frame.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::with_capacity(rows * cols * 4);
    out.push_str(CLEAR_SCREEN);
    components::render_frame(&mut out, vm, theme, cols, rows);
    out.push_str(Theme::reset());
    out
}
