use super::CommandContext;
use crate::api;
use crate::cli::{GlobalArgs, ShowArgs};
use crate::fs::{FileSystem, default_fs};
use crate::output::ViewReport;
use crate::style;
use std::io::{self, Write};

pub fn cmd_show(global: &GlobalArgs, args: ShowArgs) -> i32 {
    cmd_show_with_fs(global, args, default_fs())
}

pub fn cmd_show_with_fs(global: &GlobalArgs, args: ShowArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(global) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let view = match ctx.runtime.block_on(api::view(&ctx.config, &args.node_id)) {
        Ok(view) => view,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let rendered = match api::render(&ViewReport::new(&view), args.format) {
        Ok(text) => text,
        Err(e) => {
            style::error(&format!("Failed to render view: {}", e));
            return 1;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs.write(&path, &rendered) {
                style::error(&format!("Failed to write output file: {}", e));
                return 1;
            }
            style::success(&format!("View written to {}", style::path(&path)));
        }
        None => {
            let mut stdout = io::stdout();
            let written = match args.format {
                crate::cli::OutputFormat::Markdown => style::render_markdown(&rendered, &mut stdout),
                crate::cli::OutputFormat::Json => write!(stdout, "{}", rendered),
            };
            if let Err(e) = written {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
        }
    }

    0
}
