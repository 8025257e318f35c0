pub mod list_servers;
mod registry;

pub use list_servers::ListServersTool;
pub use registry::{json_schema_number, json_schema_object, json_schema_string, Tool, ToolRegistry};
