use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Shared level used by the installed filter; store a new value to change
/// verbosity after startup.
#[derive(Clone)]
pub(crate) struct LogLevel(Arc<AtomicU8>);

impl LogLevel {
    pub(crate) fn set(&self, level: LevelFilter) {
        self.0.store(level_filter_to_u8(level), Ordering::Relaxed);
    }
}

pub(crate) fn setup_tracing(initial: LevelFilter) -> LogLevel {
    let state = Arc::new(AtomicU8::new(level_filter_to_u8(initial)));
    let filter_state = state.clone();
    let filter_layer = tracing_subscriber::filter::filter_fn(move |metadata| {
        let level = match filter_state.load(Ordering::Relaxed) {
            0 => return false,
            1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let is_geograph = metadata.target().starts_with("geograph");
        let effective_level = if is_geograph { level } else { Level::WARN };
        metadata.level() <= &effective_level
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter_layer))
        .init();

    LogLevel(state)
}

pub(crate) fn parse_level(text: &str) -> Result<LevelFilter, String> {
    text.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{text}'"))
}

fn level_filter_to_u8(level: LevelFilter) -> u8 {
    match level {
        LevelFilter::OFF => 0,
        LevelFilter::ERROR => 1,
        LevelFilter::WARN => 2,
        LevelFilter::INFO => 3,
        LevelFilter::DEBUG => 4,
        LevelFilter::TRACE => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::DEBUG));
        assert_eq!(parse_level("WARN"), Ok(LevelFilter::WARN));
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn level_encoding_is_ordered() {
        assert!(level_filter_to_u8(LevelFilter::ERROR) < level_filter_to_u8(LevelFilter::TRACE));
        assert_eq!(level_filter_to_u8(LevelFilter::OFF), 0);
    }
}
