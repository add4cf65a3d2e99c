/// Installs the process-wide `tracing` subscriber used by the CLI and
/// library crates. Mirrors the teacher's CLI bootstrap: an `EnvFilter`
/// defaulting to `info`, a compact formatter with a fixed local timestamp,
/// no target/file/line noise.
pub fn init_tracing() {
    use time::macros::format_description;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let time_format =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:2]");

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_timer(fmt::time::LocalTime::new(time_format))
                .with_target(false)
                .with_level(true)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .with_span_events(fmt::format::FmtSpan::NONE)
                .compact(),
        )
        .with(filter)
        .try_init();
}
