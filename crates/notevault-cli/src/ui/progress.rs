//! Spinner shown while a passkey is being stretched.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;
use super::theme::spinner_frames;

/// A spinner for indeterminate progress.
///
/// Only animates on an interactive pretty terminal; otherwise it is silent.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn new(ctx: &UiContext, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let pb = ProgressBar::new_spinner();
            let template = if ctx.color {
                "{spinner:.cyan} {msg}..."
            } else {
                "{spinner} {msg}..."
            };
            if let Ok(style) = ProgressStyle::default_spinner().template(template) {
                pb.set_style(style.tick_strings(spinner_frames(ctx.unicode)));
            }
            pb.set_message(message.to_string());
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    pub fn start(&self) {
        if let Some(bar) = &self.bar {
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    /// Clear the spinner line.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Run `work` with a spinner showing `message`.
pub fn with_spinner<T>(ctx: &UiContext, message: &str, work: impl FnOnce() -> T) -> T {
    let spinner = Spinner::new(ctx, message);
    spinner.start();
    let result = work();
    spinner.finish();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::mode::OutputMode;

    #[test]
    fn test_spinner_silent_without_tty() {
        let ctx = UiContext {
            is_tty: false,
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        };
        let value = with_spinner(&ctx, "Deriving key", || 42);
        assert_eq!(value, 42);
        assert!(Spinner::new(&ctx, "x").bar.is_none());
    }
}
