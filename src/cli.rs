//! CLI domain: parse, route, and error presentation only.
//! No domain orchestration; a single route table dispatches to the
//! command layer and the renderers.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
