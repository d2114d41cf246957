use awareness_common::SimulationLog;
use std::fmt::Write;

/// File name of the frame drawn after `iteration` (0 is the initial state).
pub fn frame_file_name(iteration: u32) -> String {
    format!("iteration_{}.png", iteration)
}

pub const CHART_FILE_NAME: &str = "counts_chart.png";
pub const REPORT_FILE_NAME: &str = "simulation_report.html";

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Builds the summary page: run parameters, the per-iteration statistics table,
/// one image per iteration and a link to the log the page was built from.
///
/// Everything here is derived from `log`; the page carries no state of its own.
pub fn build_html_report(log: &SimulationLog, log_link: &str) -> String {
    let config = &log.config;
    let mut html = String::new();

    html.push_str("<html><head><title>Awareness Simulation Report</title></head><body>\n");

    html.push_str("<h2>Simulation Parameters</h2>\n");
    // Writing into a String cannot fail.
    let _ = writeln!(html, "<p>Number of cells: {}</p>", config.num_cells);
    let _ = writeln!(html, "<p>Min connections: {}</p>", config.min_connections);
    let _ = writeln!(html, "<p>Max connections: {}</p>", config.max_connections);
    let _ = writeln!(html, "<p>Aware chance: {}</p>", config.aware_chance);
    let _ = writeln!(html, "<p>Spread chance: {}</p>", config.spread_chance);
    let _ = writeln!(html, "<p>Initial aware cells: {}</p>", config.num_initial_aware);
    let _ = writeln!(html, "<p>Number of iterations: {}</p>", config.num_iterations);
    let _ = writeln!(html, "<p>Seed: {}</p>", config.seed);
    let _ = writeln!(html, "<p>Edges: {}</p>", log.edges.len());

    html.push_str("<h2>Iteration Statistics</h2>\n");
    html.push_str(
        "<table border='1'><tr><th>Iteration</th><th>Num Aware</th>\
         <th>Num Aware (Not Spread)</th><th>Num Unaware</th><th>Spread From</th></tr>\n",
    );
    for record in &log.iterations {
        let spread_from = record
            .spreaders()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.iteration_number,
            record.counts.num_aware,
            record.counts.num_unaware_aware,
            record.counts.num_unaware,
            spread_from
        );
    }
    html.push_str("</table>\n");

    if log.iterations.len() >= 2 {
        let _ = writeln!(html, "<h2>Counts Over Time</h2>\n<img src='{}'>", CHART_FILE_NAME);
    }

    html.push_str("<h2>Plots</h2>\n");
    let _ = writeln!(html, "<h3>Initial State</h3>\n<img src='{}'>", frame_file_name(0));
    for record in &log.iterations {
        let _ = writeln!(
            html,
            "<h3>Iteration {}</h3>\n<img src='{}'>",
            record.iteration_number,
            frame_file_name(record.iteration_number)
        );
    }

    html.push_str("<h2>Logs</h2>\n");
    let _ = writeln!(html, "<p><a href='{}'>Link to log file</a></p>", escape_html(log_link));

    html.push_str("</body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use awareness_common::{IterationCounts, IterationRecord, RunConfig, Transmission};

    fn log_with(iterations: Vec<IterationRecord>) -> SimulationLog {
        SimulationLog {
            config: RunConfig::new(5, 1, 2, 0.2, 0.5, 1, iterations.len() as u32, 3).unwrap(),
            edges: vec![(0, 1), (0, 3)],
            degree_floors: vec![1; 5],
            initial_states: Vec::new(),
            iterations,
            final_states: Vec::new(),
        }
    }

    #[test]
    fn table_row_per_iteration_with_spreaders() {
        let record = IterationRecord {
            iteration_number: 1,
            before_states: Vec::new(),
            attempted_sources: vec![0, 2],
            transmissions: vec![Transmission { from: 0, to: 1 }, Transmission { from: 2, to: 4 }],
            after_states: Vec::new(),
            counts: IterationCounts { num_aware: 4, num_unaware_aware: 2, num_unaware: 1 },
        };
        let html = build_html_report(&log_with(vec![record]), "run_log.json");

        assert!(html.contains("<tr><td>1</td><td>4</td><td>2</td><td>1</td><td>0, 2</td></tr>"));
        assert!(html.contains("<p>Aware chance: 0.2</p>"));
        assert!(html.contains("<img src='iteration_0.png'>"));
        assert!(html.contains("<img src='iteration_1.png'>"));
        assert!(html.contains("<a href='run_log.json'>"));
        assert!(!html.contains(CHART_FILE_NAME));
    }

    #[test]
    fn empty_run_still_produces_a_page() {
        let html = build_html_report(&log_with(Vec::new()), "log.bin");
        assert!(html.starts_with("<html>"));
        assert!(html.contains("Iteration Statistics"));
        assert!(!html.contains("<td>"));
    }

    #[test]
    fn link_is_escaped() {
        let html = build_html_report(&log_with(Vec::new()), "a'b<c>.json");
        assert!(html.contains("a&#39;b&lt;c&gt;.json"));
    }
}
