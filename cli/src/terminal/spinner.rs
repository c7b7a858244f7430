use std::future::Future;

use indicatif::ProgressStyle;
use tracing::{Instrument, Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} [{bar:32.green/white}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("█▓░")
}

/// Runs `future` with a spinner showing `message` until it completes.
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let span = info_span!("request", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(message);
    span.pb_start();
    future.instrument(span).await
}

/// Span carrying a progress bar of `total` steps.
pub fn progress_bar(total: usize) -> Span {
    let span = info_span!("progress", indicatif.pb_show = true);
    span.pb_set_style(&bar_style());
    span.pb_set_length(total as u64);
    span.pb_start();
    span
}

pub fn advance(span: &Span, position: usize, message: &str) {
    span.pb_set_position(position as u64);
    span.pb_set_message(message);
}
