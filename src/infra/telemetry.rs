use std::{io, sync::Once};

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::feed::{METRIC_LIST_CLAMPED, METRIC_LIST_RENDER};
use crate::application::preview::{METRIC_PREVIEW_FAILURE, METRIC_PREVIEW_RENDER};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Events go to stderr so that `quire list` output on stdout stays clean.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .with_writer(io::stderr)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(io::stderr)
            .compact()
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_LIST_RENDER,
            Unit::Count,
            "Total number of list views resolved, labelled by surface."
        );
        describe_counter!(
            METRIC_LIST_CLAMPED,
            Unit::Count,
            "Total number of list requests whose page was clamped into range."
        );
        describe_counter!(
            METRIC_PREVIEW_RENDER,
            Unit::Count,
            "Total number of social-preview cards rendered."
        );
        describe_counter!(
            METRIC_PREVIEW_FAILURE,
            Unit::Count,
            "Total number of social-preview requests that failed."
        );
    });
}
