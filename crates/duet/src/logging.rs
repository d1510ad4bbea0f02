//! Tracing setup
//!
//! Filter with `DUET_LOG` (falling back to `RUST_LOG`), e.g.
//! `DUET_LOG=duet_core=debug`. The viewer owns the terminal, so interactive
//! sessions log to `<data_local_dir>/duet/logs/duet.log` with daily
//! rotation; one-shot commands log to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("DUET_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init(interactive: bool) {
    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter())
    });

    let file_layer = if interactive {
        match crate::config::logs_dir().map(|dir| std::fs::create_dir_all(&dir).map(|_| dir)) {
            Some(Ok(dir)) => {
                let file_appender = tracing_appender::rolling::daily(dir, "duet.log");
                Some(
                    fmt::layer()
                        .with_writer(file_appender)
                        .with_ansi(false)
                        .with_target(true)
                        .with_line_number(true)
                        .with_filter(filter()),
                )
            }
            Some(Err(e)) => {
                eprintln!("Warning: Could not initialize file logging: {e}");
                None
            }
            None => None,
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
