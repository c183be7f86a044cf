use crawl_monitor_core::{MonitorPhase, MonitorViewModel, Outcome};
use url::Url;

const BAR_WIDTH: usize = 40;

/// Turns the view model into terminal lines.
pub fn render(view: &MonitorViewModel, server: &Url) -> Vec<String> {
    let mut lines = Vec::new();

    let prefix = match &view.job_id {
        Some(job_id) => format!("[{job_id}] "),
        None => String::new(),
    };

    match view.phase {
        MonitorPhase::Idle => {
            let text = match &view.last_error {
                Some(error) => format!("Idle (last attempt failed: {error})"),
                None => view.status_text.clone(),
            };
            lines.push(text);
        }
        MonitorPhase::Submitting => lines.push(view.status_text.clone()),
        MonitorPhase::Polling | MonitorPhase::Terminal => {
            lines.push(format!(
                "{prefix}{} | discovered {} | extracted {} | failed {}",
                view.status_text,
                format_with_commas(view.discovered),
                format_with_commas(view.extracted),
                format_with_commas(view.failed)
            ));
            lines.push(format!(
                "{} {}",
                progress_bar(view.progress_percent),
                view.progress_text
            ));
            if view.poll_failures > 0 {
                lines.push(format!(
                    "{prefix}status check failed {} time(s) in a row, retrying",
                    view.poll_failures
                ));
            }
        }
    }

    if let Some(artifacts) = &view.artifacts {
        let verdict = match view.outcome {
            Some(Outcome::Failed) => "Crawl failed",
            _ => "Crawl completed",
        };
        lines.push(format!("{prefix}{verdict}"));
        lines.push(format!(
            "Preview: {}",
            resolve(server, &artifacts.preview_path)
        ));
        lines.push(format!(
            "CSV export: {}",
            resolve(server, &artifacts.csv_export_path)
        ));
    }

    lines
}

fn progress_bar(percent: Option<u8>) -> String {
    match percent {
        Some(percent) => {
            let percent = percent.min(100);
            let filled = BAR_WIDTH * usize::from(percent) / 100;
            format!(
                "[{}{}] {:>3}%",
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH - filled),
                percent
            )
        }
        None => format!("[{}]   ?%", ".".repeat(BAR_WIDTH)),
    }
}

/// Appends `path` to the server URL the same way the client builds endpoints,
/// so a server mounted under a prefix keeps it.
fn resolve(server: &Url, path: &str) -> String {
    format!("{}{}", server.as_str().trim_end_matches('/'), path)
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
