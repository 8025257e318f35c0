// Directory search backed by the PulseMCP API

use crate::error::{McpError, McpResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_number, json_schema_object, json_schema_string, Tool};
use pulse_sdk::{ListServersParams, PulseClient};
use serde_json::{Map, Number, Value};
use tracing::{debug, info, warn};

pub const TOOL_NAME: &str = "list_servers";

/// Advertised page-size ceiling. Documented in the schema, never enforced here.
pub const MAX_COUNT_PER_PAGE: u64 = 5000;

/// Why a `list_servers` argument set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("arguments must be an object")]
    NotAnObject,

    #[error("`{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Check untrusted tool arguments and lift them into typed query parameters.
///
/// Every field is optional, but a key that is present must carry the right
/// JSON type (`null` included in "wrong"). Unknown keys are ignored.
pub fn validate(arguments: &Value) -> Result<ListServersParams, ValidationError> {
    let args = arguments.as_object().ok_or(ValidationError::NotAnObject)?;

    let query = match args.get("query") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "query",
                expected: "string",
            })
        }
    };

    Ok(ListServersParams {
        query,
        count_per_page: number_field(args, "count_per_page")?,
        offset: number_field(args, "offset")?,
    })
}

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_field(
    args: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Number>, ValidationError> {
    match args.get(field) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(normalize_number(n))),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "number",
        }),
    }
}

/// Integral floats (`10.0`, `1e3`) go on the wire as plain integers, the way
/// a JSON number reads once it has been parsed. Other values pass through.
fn normalize_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

/// `list_servers`: search the MCP server directory and relay the API's
/// response unchanged.
pub struct ListServersTool {
    client: PulseClient,
}

impl ListServersTool {
    pub fn new(client: PulseClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListServersTool {
    fn schema(&self) -> ToolSchema {
        let mut count_per_page = json_schema_number("Number of results per page (maximum: 5000)");
        count_per_page["maximum"] = serde_json::json!(MAX_COUNT_PER_PAGE);

        ToolSchema {
            name: TOOL_NAME.to_string(),
            description: "List MCP servers with optional filtering".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Search term to filter servers"),
                    "count_per_page": count_per_page,
                    "offset": json_schema_number("Number of results to skip for pagination")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, arguments: Value) -> McpResult<CallToolResult> {
        let params = validate(&arguments).map_err(|e| {
            debug!(error = %e, "Rejected list_servers arguments");
            McpError::InvalidParams("Invalid arguments for list_servers".to_string())
        })?;

        info!(
            query = params.query.as_deref().unwrap_or(""),
            count_per_page = ?params.count_per_page,
            offset = ?params.offset,
            "Listing servers"
        );

        match self.client.servers().list_raw(&params).await {
            Ok(body) => {
                let text = serde_json::to_string_pretty(&body)?;
                Ok(CallToolResult::text(text))
            }
            Err(e) => {
                warn!(error = %e, "PulseMCP API request failed");
                Ok(CallToolResult::error(format!("API Error: {}", e.user_message())))
            }
        }
    }
}
