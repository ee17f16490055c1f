use super::CommandContext;
use crate::cli::{GlobalArgs, ServeArgs};
use crate::style;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn cmd_serve(global: &GlobalArgs, args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(global) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let controller = match ctx.open(&args.node_id) {
        Ok(controller) => controller,
        Err(code) => return code,
    };

    let shared = Arc::new(Mutex::new(controller));
    if let Err(e) = ctx
        .runtime
        .block_on(crate::server::serve(shared, args.port, args.open))
    {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
