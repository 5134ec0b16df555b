use std::io::{self, IsTerminal, Write};

use todoapp_core::{ClearReport, Counters, TaskNode};
use todoapp_shared::TaskDto;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new() -> Self {
        let color = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Visible nodes only; filtered-out rows stay in the store but are not
    /// printed.
    #[tracing::instrument(skip_all)]
    pub fn print_task_table<W: Write>(
        &self,
        mut out: W,
        nodes: &[TaskNode],
        counters: Counters,
    ) -> anyhow::Result<()> {
        let rows: Vec<[Cell; 5]> = nodes
            .iter()
            .filter(|node| node.visible)
            .map(|node| {
                let done = node.state.is_complete();
                [
                    Cell::styled(node.id.to_string(), "33"),
                    if done {
                        Cell::styled("x", "32")
                    } else {
                        Cell::plain("")
                    },
                    Cell::plain(
                        node.priority
                            .map(|p| p.label())
                            .unwrap_or_default(),
                    ),
                    Cell::plain(node.due_date.as_deref().unwrap_or_default()),
                    if done {
                        Cell::styled(node.title.as_str(), "2")
                    } else {
                        Cell::plain(node.title.as_str())
                    },
                ]
            })
            .collect();

        self.write_table(&mut out, TASK_COLUMNS, &rows)?;
        writeln!(out)?;
        self.print_counters(&mut out, counters)?;
        Ok(())
    }

    pub fn print_counters<W: Write>(&self, mut out: W, counters: Counters) -> anyhow::Result<()> {
        writeln!(
            out,
            "completed: {}  incomplete: {}",
            counters.completed, counters.incomplete
        )?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub fn print_task_info<W: Write>(&self, mut out: W, task: &TaskDto) -> anyhow::Result<()> {
        writeln!(out, "id        {}", task.id)?;
        writeln!(out, "title     {}", task.title)?;
        writeln!(
            out,
            "status    {}",
            if task.completed { "completed" } else { "pending" }
        )?;
        if let Some(description) = task
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            writeln!(out, "desc      {description}")?;
        }
        if let Some(priority) = task.priority() {
            writeln!(out, "priority  {}", priority.label())?;
        }
        if let Some(due) = &task.due_date {
            writeln!(out, "due       {due}")?;
        }
        if let Some(created) = &task.created_at {
            writeln!(out, "created   {created}")?;
        }
        if let Some(updated) = &task.updated_at {
            writeln!(out, "modified  {updated}")?;
        }
        Ok(())
    }

    pub fn print_clear_report<W: Write>(&self, mut out: W, report: ClearReport) -> anyhow::Result<()> {
        let deleted = report.attempted - report.failed;
        writeln!(out, "deleted {deleted} task(s)")?;
        if report.failed > 0 {
            writeln!(
                out,
                "{} delete(s) failed on the server; the list was cleared anyway",
                report.failed
            )?;
        }
        Ok(())
    }

    /// Columns are padded to the widest plain text; the last column is
    /// not padded.
    fn write_table<W: Write, const N: usize>(
        &self,
        mut out: W,
        headers: [&str; N],
        rows: &[[Cell; N]],
    ) -> anyhow::Result<()> {
        let mut widths = headers.map(|header| UnicodeWidthStr::width(header));
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let header_cells = headers.map(Cell::plain);
        self.write_row(&mut out, &header_cells, &widths)?;
        let rule = widths.map(|width| Cell::plain("-".repeat(width)));
        self.write_row(&mut out, &rule, &widths)?;
        for row in rows {
            self.write_row(&mut out, row, &widths)?;
        }
        Ok(())
    }

    fn write_row<W: Write>(&self, mut out: W, cells: &[Cell], widths: &[usize]) -> anyhow::Result<()> {
        let mut line = String::new();
        for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push_str("  ");
            }
            line.push_str(&self.paint(cell));
            if idx + 1 < cells.len() {
                line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
            }
        }
        writeln!(out, "{}", line.trim_end())?;
        Ok(())
    }

    fn paint(&self, cell: &Cell) -> String {
        match cell.style {
            Some(code) if self.color && !cell.text.is_empty() => {
                format!("\x1b[{code}m{}\x1b[0m", cell.text)
            }
            _ => cell.text.clone(),
        }
    }
}

const TASK_COLUMNS: [&str; 5] = ["ID", "Done", "Pri", "Due", "Title"];

/// Table cell text and the SGR code used for it when color is on.
#[derive(Debug, Clone)]
struct Cell {
    text: String,
    style: Option<&'static str>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    fn styled(text: impl Into<String>, code: &'static str) -> Self {
        Self {
            text: text.into(),
            style: Some(code),
        }
    }

    fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use todoapp_core::{Filter, TaskStore, filter::apply_filter};
    use todoapp_shared::TaskId;

    use super::*;

    fn store() -> TaskStore {
        let mut store = TaskStore::new();
        store.replace_all(
            serde_json::from_str(
                r#"[
                  {"id": 1, "title": "water plants", "completed": false, "priority": 1},
                  {"id": 2, "title": "pay rent", "completed": true, "due_date": "2026-11-01"}
                ]"#,
            )
            .expect("tasks"),
        );
        store
    }

    #[test]
    fn table_lists_visible_rows_and_counters() {
        let mut store = store();
        apply_filter(&mut store, Filter::Incomplete);

        let mut out = Vec::new();
        Renderer::plain()
            .print_task_table(&mut out, store.nodes(), store.counters())
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("water plants"));
        assert!(text.contains("medium"));
        assert!(!text.contains("pay rent"));
        assert!(text.ends_with("completed: 1  incomplete: 1\n"));
    }

    #[test]
    fn info_prints_optional_fields_only_when_present() {
        let task = TaskDto {
            id: TaskId::Number(2),
            title: "pay rent".to_string(),
            completed: true,
            description: None,
            priority: None,
            due_date: Some("2026-11-01".to_string()),
            created_at: None,
            updated_at: None,
        };

        let mut out = Vec::new();
        Renderer::plain().print_task_info(&mut out, &task).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("status    completed"));
        assert!(text.contains("due       2026-11-01"));
        assert!(!text.contains("priority"));
        assert!(!text.contains("desc"));
    }

    #[test]
    fn colored_cells_pad_by_visible_width() {
        let renderer = Renderer { color: true };
        let rows = [[Cell::styled("7", "33"), Cell::plain("étude")]];

        let mut out = Vec::new();
        renderer
            .write_table(&mut out, ["Identifier", "Title"], &rows)
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Identifier  Title");
        assert_eq!(lines[1], "----------  -----");
        assert_eq!(lines[2], "\x1b[33m7\x1b[0m           étude");
    }
}
