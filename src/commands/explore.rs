use super::CommandContext;
use crate::cli::{ExploreArgs, GlobalArgs};
use crate::model::Lane;
use crate::navigation::{NavigationController, NavigationOutcome};
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter, ViewReport, selectable_nodes};
use crate::style;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  <n> | select <n|id>   re-center on entry n of the listing, or on a node id
  more <lane>           load the next page of input-data, input-process, output-data or output-process
  back <index>          jump to a breadcrumb
  crumbs                list breadcrumbs
  view                  print the current view again
  json                  print the current view as JSON
  help                  show this message
  quit                  leave";

pub fn cmd_explore(global: &GlobalArgs, args: ExploreArgs) -> i32 {
    let ctx = match CommandContext::new(global) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let mut controller = match ctx.open(&args.node_id) {
        Ok(controller) => controller,
        Err(code) => return code,
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    if let Err(e) = ctx
        .runtime
        .block_on(run_session(&mut controller, stdin, &mut stdout))
    {
        style::error(&format!("Session ended: {}", e));
        return 1;
    }
    0
}

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Select(String),
    More(Lane),
    Back(usize),
    Crumbs,
    View,
    Json,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match (word, arg) {
        (n, None) if n.parse::<usize>().is_ok() => SessionCommand::Select(n.to_string()),
        ("select" | "s", Some(target)) => SessionCommand::Select(target.to_string()),
        ("more" | "m", Some(lane)) => {
            SessionCommand::More(lane.parse::<Lane>().map_err(|e| e.to_string())?)
        }
        ("back" | "b", Some(index)) => SessionCommand::Back(
            index
                .parse()
                .map_err(|_| format!("not a breadcrumb index: {}", index))?,
        ),
        ("crumbs" | "c", None) => SessionCommand::Crumbs,
        ("view" | "v", None) => SessionCommand::View,
        ("json", None) => SessionCommand::Json,
        ("help" | "?", None) => SessionCommand::Help,
        ("quit" | "q" | "exit", None) => SessionCommand::Quit,
        _ => return Err(format!("unknown command: {} (try `help`)", line.trim())),
    };
    Ok(Some(command))
}

/// Run an interactive session until `quit` or end of input.
pub async fn run_session<R, W>(
    controller: &mut NavigationController,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    print_view(controller, output)?;
    let mut lines = input.lines();

    loop {
        write!(output, "{}", style::prompt(&controller.current_view().label))?;
        output.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                style::error(&message);
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => writeln!(output, "{}", HELP)?,
            SessionCommand::View => print_view(controller, output)?,
            SessionCommand::Json => {
                JsonOutput::new().format(&ViewReport::from_controller(controller), output)?
            }
            SessionCommand::Crumbs => {
                let labels = controller.breadcrumbs().labels();
                if labels.is_empty() {
                    writeln!(output, "No breadcrumbs yet.")?;
                }
                for (index, (id, label)) in labels.iter().enumerate() {
                    writeln!(output, "{}. {} {}", index, label, id)?;
                }
            }
            SessionCommand::Back(index) => match controller.on_breadcrumb_selected(index) {
                Ok(_) => print_view(controller, output)?,
                Err(e) => style::error(&e.to_string()),
            },
            SessionCommand::More(lane) => match controller.on_load_more(lane) {
                Ok(expansion) => {
                    style::status(&format!(
                        "{} more in {} ({} hidden)",
                        expansion.added, lane, expansion.remaining
                    ));
                    print_view(controller, output)?;
                }
                Err(e) => style::error(&e.to_string()),
            },
            SessionCommand::Select(target) => {
                let Some(id) = resolve_target(controller, &target) else {
                    style::error(&format!("no entry {} in this view", target));
                    continue;
                };
                match controller.on_node_selected(&id).await {
                    Ok(NavigationOutcome::Unchanged) => {
                        style::hint("already centered on that node")
                    }
                    Ok(_) => print_view(controller, output)?,
                    Err(e) => style::error(&e.to_string()),
                }
            }
        }
    }

    Ok(())
}

/// A listing number becomes the view id at that position; anything else is
/// taken as an id.
fn resolve_target(controller: &NavigationController, target: &str) -> Option<String> {
    match target.parse::<usize>() {
        Ok(number) => selectable_nodes(controller.current_view())
            .get(number.checked_sub(1)?)
            .map(|n| n.id.clone()),
        Err(_) => Some(target.to_string()),
    }
}

fn print_view<W: Write>(controller: &NavigationController, output: &mut W) -> io::Result<()> {
    let mut markdown = Vec::new();
    MarkdownOutput::default().format(&ViewReport::from_controller(controller), &mut markdown)?;
    style::render_markdown(&String::from_utf8_lossy(&markdown), output)?;
    writeln!(output)
}
