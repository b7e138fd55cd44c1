//! Output formatting utilities for publish commands.

use super::traits::Output;
use shotpub::publisher::{PublishReport, StoredRecord, TaskReport};
use shotpub::version::{PathComponents, Resolution};

/// Print the parsed pieces of a path.
pub fn print_components(out: &dyn Output, components: &PathComponents) {
    out.println(&format!("Path:       {}", components.path.display()));
    out.println(&format!("Directory:  {}", components.directory.display()));
    out.println(&format!("Filename:   {}", components.filename));
    out.println(&format!("Prefix:     {}", components.prefix));
    out.println(&format!("Extension:  {}", display_or_none(&components.extension)));
    match components.version {
        Some(token) => out.println(&format!(
            "Version:    {} ({} digits)",
            token.number, token.padding
        )),
        None => out.println("Version:    none"),
    }
}

/// Print a resolved publish destination.
pub fn print_resolution(out: &dyn Output, resolution: &Resolution) {
    out.println(&format!(
        "Publish folder:  {}",
        resolution.publish_folder.display()
    ));
    out.println(&format!(
        "Highest found:   {}",
        resolution.state.highest_version_found
    ));
    out.println(&format!(
        "Version to use:  {}",
        resolution.state.version_to_use
    ));
    out.println(&format!(
        "Destination:     {}",
        resolution.destination.display()
    ));
}

/// Print the per-task outcome of a publish run.
pub fn print_report(out: &dyn Output, report: &PublishReport) {
    if report.tasks.is_empty() {
        out.println("Nothing to publish.");
        return;
    }

    for task in &report.tasks {
        out.println(&task_line(task));
        if let Some(destination) = &task.destination {
            out.indented(&format!("-> {}", destination.display()));
        }
        if let Some(id) = task.review_version {
            out.indented(&format!("review version {}", id));
        }
        if let Some(error) = &task.error {
            out.indented(&format!("error: {}", error));
        }
    }

    out.newline();
    let failed = report.failures().count();
    out.println(&format!(
        "{} completed, {} failed, {} skipped",
        report.completed(),
        failed,
        report.skipped()
    ));
    if report.aborted {
        out.println("Publishing stopped after the first failure.");
    }
}

/// Print stored records as a table.
pub fn print_records(out: &dyn Output, records: &[StoredRecord]) {
    if records.is_empty() {
        out.println("No publish records.");
        return;
    }

    out.println(&format!(
        "{:<6} {:<30} {:>7}  {:<8} {:<22} PATH",
        "ID", "NAME", "VERSION", "STATUS", "TYPE"
    ));
    for stored in records {
        let record = &stored.record;
        out.println(&format!(
            "{:<6} {:<30} {:>7}  {:<8} {:<22} {}",
            stored.id,
            record.name,
            record.version_number,
            stored.status.as_deref().unwrap_or("-"),
            record.published_file_type,
            record.path.display()
        ));
    }
}

fn task_line(task: &TaskReport) -> String {
    let version = task
        .version
        .map(|v| format!(" v{:03}", v))
        .unwrap_or_default();
    let state = if task.checked {
        task.state.to_string()
    } else {
        "unchecked".to_string()
    };
    format!("[{}] {}{} ({})", state, task.item_name, version, task.plugin)
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "none"
    } else {
        value
    }
}
