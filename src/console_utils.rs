use std::{fmt::Write as _, str::FromStr};

use tracing_core::{Event, LevelFilter, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt::{
        FmtContext, FormatEvent, FormatFields,
        format::{self, Format},
    },
    registry::LookupSpan,
};

/// Prints info messages of this crate without decoration and everything else
/// in the default format.
pub struct TracingFormatter;

impl<S, N> FormatEvent<S, N> for TracingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();

        if *metadata.level() == tracing_core::metadata::Level::INFO
            && metadata.target().starts_with("rattler_build_matrix")
        {
            ctx.format_fields(writer.by_ref(), event)?;
            writeln!(writer)
        } else {
            let default_format = Format::default().without_time();
            default_format.format_event(ctx, writer, event)
        }
    }
}

/// Constructs a default [`EnvFilter`] that is used when the user did not specify a custom RUST_LOG.
pub fn get_default_env_filter(verbose: LevelFilter) -> Result<EnvFilter, ParseError> {
    let mut result = EnvFilter::new(format!("rattler_build_matrix={verbose}"));

    if verbose >= LevelFilter::DEBUG {
        result = result.add_directive(Directive::from_str("minijinja=info")?);
    } else {
        result = result.add_directive(Directive::from_str("minijinja=warn")?);
    }

    Ok(result)
}

/// The environment filter: `RUST_LOG` if it is set, the default filter
/// for the requested verbosity otherwise.
pub fn env_filter(verbose: LevelFilter) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => get_default_env_filter(verbose),
    }
}
