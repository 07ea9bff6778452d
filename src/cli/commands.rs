//! CLI command implementations

use std::sync::Arc;

use serde_json::Value;

use crate::config::AppConfig;
use crate::db::Database;
use crate::observability::{default_sink, Event, EventRecord, EventSink};
use crate::params::{ParamError, Parameters, PermitSpec};
use crate::resources::{article_params, comment_params};
use crate::views::render_article_index;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, write_response};

/// Load configuration and dispatch a parsed command
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    let sink = default_sink();
    sink.emit(EventRecord::new(Event::ConfigLoaded).with_field("base_url", &config.base_url));

    match cli.command {
        Command::Permit { spec, require } => {
            let body = read_request()?;
            let filtered = permit(&config, sink, body, &spec, require.as_deref())?;
            write_response(filtered)
        }
        Command::Load => {
            let bodies = read_requests().collect::<CliResult<Vec<Value>>>()?;
            let index = load(&config, sink, bodies)?;
            write_response(index)
        }
        Command::Schema => write_response(schema(sink)?),
    }
}

fn request_params(config: &AppConfig, sink: Arc<dyn EventSink>, body: Value) -> CliResult<Parameters> {
    if !body.is_object() {
        return Err(CliError::invalid_input("request body must be a JSON object"));
    }
    Ok(Parameters::from_value_with_config(body, config.params_config(sink)))
}

/// Filter `body` through `spec`, optionally requiring a root key first
pub fn permit(
    config: &AppConfig,
    sink: Arc<dyn EventSink>,
    body: Value,
    spec: &str,
    require: Option<&str>,
) -> CliResult<Value> {
    let spec: PermitSpec = spec.parse()?;
    let params = request_params(config, sink, body)?;

    let target = match require {
        Some(key) => params.require(key)?,
        None => params,
    };

    Ok(target.permit(&spec).to_value())
}

/// Create a record per body through the resource specs; returns the article index
pub fn load(config: &AppConfig, sink: Arc<dyn EventSink>, bodies: Vec<Value>) -> CliResult<Value> {
    let mut db = Database::with_sink(Arc::clone(&sink))?;

    for body in bodies {
        let params = request_params(config, Arc::clone(&sink), body)?;

        if params.contains_key("article") {
            db.create_article(&article_params(&params)?)?;
        } else if params.contains_key("comment") {
            db.create_comment(&comment_params(&params)?)?;
        } else {
            return Err(ParamError::missing("article").into());
        }
    }

    Ok(render_article_index(db.articles(), &config.base_url)?)
}

/// The migrated schema as JSON
pub fn schema(sink: Arc<dyn EventSink>) -> CliResult<Value> {
    let db = Database::with_sink(sink)?;
    Ok(serde_json::to_value(db.schema())?)
}
