use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

#[derive(Default)]
struct JsonFieldVisitor {
    fields: Map<String, Value>,
}

impl JsonFieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonFieldVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

/// One JSON object per event, shaped after the OpenTelemetry log data model.
#[derive(Clone)]
struct OtelJsonEventFormatter {
    service_name: String,
    service_version: String,
}

fn severity_number(level: &Level) -> u64 {
    match *level {
        Level::TRACE => 1,
        Level::DEBUG => 5,
        Level::INFO => 9,
        Level::WARN => 13,
        Level::ERROR => 17,
    }
}

/// Builds the record for one event out of its visited fields.
fn build_record(
    level: &Level,
    target: &str,
    fallback_body: &str,
    mut attributes: Map<String, Value>,
    service_name: &str,
    service_version: &str,
) -> Value {
    // Sign-in attempts are correlated by their attempt id.
    if let Some(v) = attributes.remove("attempt_id") {
        attributes.insert("auth.attempt.id".to_string(), v);
    }
    if let Some(v) = attributes.remove("attempt") {
        attributes.insert("auth.attempt.number".to_string(), v);
    }
    attributes.insert("code.target".to_string(), Value::from(target));

    let body = attributes
        .remove("message")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| fallback_body.to_string());

    let mut resource = Map::new();
    resource.insert("service.name".to_string(), Value::from(service_name));
    resource.insert("service.version".to_string(), Value::from(service_version));

    let mut root = Map::new();
    root.insert(
        "timestamp".to_string(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    root.insert("severity_text".to_string(), Value::from(level.as_str()));
    root.insert(
        "severity_number".to_string(),
        Value::from(severity_number(level)),
    );
    root.insert("body".to_string(), Value::from(body));
    root.insert("resource".to_string(), Value::Object(resource));
    root.insert("attributes".to_string(), Value::Object(attributes));
    Value::Object(root)
}

impl<S, N> FormatEvent<S, N> for OtelJsonEventFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut visitor = JsonFieldVisitor::default();
        event.record(&mut visitor);

        let mut attributes = visitor.fields;
        if let Some(file) = metadata.file() {
            attributes.insert("code.filepath".to_string(), Value::from(file));
        }
        if let Some(line) = metadata.line() {
            attributes.insert("code.lineno".to_string(), Value::from(line));
        }

        let record = build_record(
            metadata.level(),
            metadata.target(),
            metadata.name(),
            attributes,
            &self.service_name,
            &self.service_version,
        );
        let serialized = serde_json::to_string(&record).map_err(|_| std::fmt::Error)?;
        writer.write_str(&serialized)?;
        writer.write_char('\n')
    }
}

/// Parse `logging.level`.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        other => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            other
        )),
    }
}

/// Install the global subscriber. `RUST_LOG` directives are added on top of the level.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level_filter = parse_level(&logging_config.level)?;
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter_layer);
    let result = match logging_config.format.to_lowercase().as_str() {
        "json" => registry
            .with(fmt::layer().event_format(OtelJsonEventFormatter {
                service_name: logging_config.service_name.clone(),
                service_version: logging_config.service_version.clone(),
            }))
            .try_init(),
        // Anything else falls back to human-readable console output.
        _ => registry.with(fmt::layer().pretty()).try_init(),
    };
    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}
