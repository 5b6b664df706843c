//! Plain-text rendering of tables for the terminal.

use crate::store::{QUEUE_INFO_HEADER, SUMMARY_HEADER};
use prodjobs_state::{QueueInfoTable, SummaryRow};

/// Column alignment.
#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Render rows under a header and a dashed rule, one width per column.
fn render(header: &[&str], align: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .zip(align)
            .map(|((cell, &w), a)| match a {
                Align::Left => format!("{:<w$}", cell),
                Align::Right => format!("{:>w$}", cell),
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(header.to_vec()));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push(line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Format the summary table.
pub fn format_summary(rows: &[SummaryRow]) -> String {
    let mut align = vec![Align::Left, Align::Left];
    align.extend([Align::Right; 7]);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.jobdesc.clone(),
                r.cpugpu.to_string(),
                format!("{:.1}", r.node_hours),
                format!("{:.1}", r.percent),
                r.completed.to_string(),
                r.timeout.to_string(),
                r.failed.to_string(),
                r.cancelled.to_string(),
                r.node_fail.to_string(),
            ]
        })
        .collect();

    render(&SUMMARY_HEADER, &align, &cells)
}

/// Format every row of the aggregated accounting table.
pub fn format_queue_info(table: &QueueInfoTable) -> String {
    let mut align = vec![Align::Right];
    align.extend([Align::Left; 3]);
    align.push(Align::Right);
    align.extend([Align::Left; 8]);
    align.extend([Align::Right; 2]);

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| {
            vec![
                r.jobid.to_string(),
                r.jobname.clone(),
                r.partition.clone(),
                r.constraints.clone(),
                r.nnodes.to_string(),
                r.submit.clone(),
                r.eligible.clone(),
                r.start.clone(),
                r.end.clone(),
                r.elapsed.clone(),
                r.state.clone(),
                r.exitcode.clone(),
                r.jobdesc.clone(),
                format!("{:.4}", r.node_hours),
                r.gpu.to_string(),
            ]
        })
        .collect();

    format!(
        "SPECPROD: {}\n{}",
        table.specprod,
        render(&QUEUE_INFO_HEADER, &align, &cells)
    )
}
