// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Terminal UI & Logging
//!
//! Installs the global `tracing` subscriber and drives the spinner shown while a
//! sweep runs. Log lines are routed through the indicatif writer so they print
//! above the spinner instead of over it.
//!
//! Every five seconds the spinner shows the live status for two seconds, then a
//! random tip for the rest of the cycle.

use std::time::Duration;

use colored::*;
use indicatif::ProgressStyle;
use roster_common::insights;
use tokio::task::JoinHandle;
use tracing::Span;
use tracing_indicatif::{IndicatifLayer, span_ext::IndicatifSpanExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::terminal::{colors, logging::RosterFormatter};

const CYCLE: Duration = Duration::from_millis(5000);
const STATUS_WINDOW: Duration = Duration::from_millis(2000);
const TICK: Duration = Duration::from_millis(100);

const TICK_STRINGS: [&str; 8] = [
    "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
];

const DEFAULT_FILTER: &str =
    "info,roster_core=debug,roster_common=debug,roster_cli=debug,hickory_proto=warn,mio=error";

pub fn init_logging(verbosity: u8) {
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&TICK_STRINGS);
    let indicatif_layer = IndicatifLayer::new().with_progress_style(style);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(RosterFormatter {
            max_verbosity: verbosity,
        })
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer)
        .init();
}

/// What the spinner shows after `elapsed`.
#[derive(Debug, PartialEq, Eq)]
enum Phase {
    Status,
    Tip(usize),
}

fn phase_at(elapsed: Duration, tips: usize) -> Phase {
    let cycle_ms = CYCLE.as_millis();
    let elapsed_ms = elapsed.as_millis();

    if elapsed_ms % cycle_ms < STATUS_WINDOW.as_millis() {
        Phase::Status
    } else {
        Phase::Tip((elapsed_ms / cycle_ms) as usize % tips.max(1))
    }
}

/// Animates `span` until dropped.
pub struct SpinnerGuard {
    handle: JoinHandle<()>,
}

impl SpinnerGuard {
    pub fn with_status<F>(span: Span, status_fn: F) -> Self
    where
        F: Fn() -> ColoredString + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let tips = insights::get_shuffled_insights();
            let started = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(TICK);
            let mut shown = String::new();

            loop {
                interval.tick().await;

                let text = match phase_at(started.elapsed(), tips.len()) {
                    Phase::Status => status_fn().to_string(),
                    Phase::Tip(idx) => tips
                        .get(idx)
                        .copied()
                        .unwrap_or_default()
                        .italic()
                        .color(colors::TEXT_DEFAULT)
                        .to_string(),
                };

                if text != shown {
                    span.pb_set_message(&text);
                    shown = text;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
