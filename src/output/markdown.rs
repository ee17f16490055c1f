use crate::model::{Direction, Lane, ViewNode, ViewNodeKind};
use crate::navigation::NavigationPhase;
use crate::output::{OutputFormatter, ViewReport, selectable_nodes};
use std::io::Write;

/// Human-readable rendering of a view, numbered for the terminal explorer.
pub struct MarkdownOutput {
    pub show_breadcrumbs: bool,
}

impl MarkdownOutput {
    pub fn new(show_breadcrumbs: bool) -> Self {
        Self { show_breadcrumbs }
    }
}

impl Default for MarkdownOutput {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format<W: Write>(&self, report: &ViewReport<'_>, writer: &mut W) -> std::io::Result<()> {
        let view = report.view;
        let Some(focal) = view.focal().and_then(|n| n.node()) else {
            writeln!(writer, "_Nothing loaded yet._")?;
            return Ok(());
        };

        writeln!(writer, "# {} `{}`\n", focal.label, focal.id)?;
        write!(writer, "*{}*", focal.kind)?;
        if let Some(ctime) = focal.raw.ctime {
            write!(writer, " · created {}", ctime.format("%Y-%m-%d %H:%M"))?;
        }
        if report.state.phase != NavigationPhase::Idle {
            write!(writer, " · {:?}", report.state.phase)?;
        }
        writeln!(writer)?;

        if self.show_breadcrumbs && !report.breadcrumbs.is_empty() {
            let trail: Vec<_> = report
                .breadcrumbs
                .iter()
                .map(|b| format!("{}. {} `{}`", b.index, b.label, short_id(&b.focal_id)))
                .collect();
            writeln!(writer, "\n**Trail:** {}", trail.join(" → "))?;
        }

        let numbered = selectable_nodes(view);
        for direction in [Direction::Input, Direction::Output] {
            let lanes: Vec<_> = Lane::ALL
                .into_iter()
                .filter(|l| l.direction() == direction)
                .filter(|l| !view.lane_nodes(*l).is_empty())
                .collect();
            if lanes.is_empty() {
                continue;
            }

            let title = match direction {
                Direction::Input => "Inputs",
                Direction::Output => "Outputs",
            };
            writeln!(writer, "\n## {}", title)?;

            for lane in lanes {
                let heading = if lane.is_process() { "Processes" } else { "Data" };
                writeln!(writer, "\n### {}\n", heading)?;
                for (number, entry) in numbered
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| n.lane() == Some(lane))
                {
                    writeln!(writer, "{}", entry_line(number + 1, entry))?;
                }
            }
        }

        if numbered.is_empty() {
            writeln!(writer, "\nNo linked nodes.")?;
        }

        Ok(())
    }
}

fn entry_line(number: usize, entry: &ViewNode) -> String {
    match &entry.kind {
        ViewNodeKind::Neighbor {
            node, came_from, ..
        } => {
            let mut line = format!("{}. **{}** `{}`", number, node.label, short_id(&node.id));
            if !node.link_label().is_empty() {
                line.push_str(&format!(" via `{}`", node.link_label()));
            }
            if *came_from {
                line.push_str(" ← came from");
            }
            line
        }
        ViewNodeKind::Placeholder { count, .. } => {
            format!("{}. *+{} more*", number, count)
        }
        ViewNodeKind::Focal { node } => format!("{}. **{}**", number, node.label),
    }
}

/// First block of a UUID, or the whole id when it has none.
fn short_id(id: &str) -> &str {
    match id.split_once('-') {
        Some((head, _)) if head.len() == 8 => head,
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutOptions, layout};
    use crate::model::{Neighborhood, Node};
    use crate::output::Breadcrumb;

    fn render(report: &ViewReport<'_>) -> String {
        let mut out = Vec::new();
        MarkdownOutput::default().format(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_numbered_lanes_and_placeholder() {
        let focal = Node::new("f", "process.calculation.calcjob.CalcJobNode.");
        let mut neighborhood = Neighborhood::new(focal.clone());
        for i in 1..=11 {
            neighborhood.input_data.push(
                Node::new(format!("d{}", i), "data.core.int.Int.").with_link_label(format!("x{}", i)),
            );
        }
        neighborhood
            .output_data
            .push(Node::new("r", "data.core.dict.Dict.").with_link_label("result"));
        let mut view = layout(&focal, &neighborhood, &LayoutOptions::default());
        view.mark_came_from("r");

        let text = render(&ViewReport::new(&view));

        assert!(text.starts_with("# CalcJobNode `f`"));
        assert!(text.contains("## Inputs"));
        assert!(text.contains("1. **Int** `d1` via `x1`"));
        assert!(text.contains("11. *+1 more*"));
        assert!(text.contains("12. **Dict** `r` via `result` ← came from"));
        assert!(!text.contains("Trail"));
    }

    #[test]
    fn test_trail_and_empty_view() {
        let focal = Node::new("c4b1a2f0-aaaa-bbbb-cccc-000000000000", "data.core.int.Int.");
        let view = layout(&focal, &Neighborhood::new(focal.clone()), &LayoutOptions::default());
        let mut report = ViewReport::new(&view);
        report.breadcrumbs.push(Breadcrumb {
            index: 0,
            focal_id: "0a1b2c3d-0000-0000-0000-000000000000".to_string(),
            label: "Dict".to_string(),
        });

        let text = render(&report);

        assert!(text.starts_with("# Int `c4b1a2f0-aaaa-bbbb-cccc-000000000000`"));
        assert!(text.contains("**Trail:** 0. Dict `0a1b2c3d`"));
        assert!(text.contains("No linked nodes."));
    }
}
