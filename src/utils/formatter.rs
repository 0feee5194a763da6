use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};
use serde_json::Value;

use crate::Result;
use crate::tracker::StoryState;

pub enum OutputFormat {
    Table,
    Json,
}

pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn format_project(&self, project: &Value) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(project)?);
        }

        let mut output = Vec::new();
        let title = format!(
            "{} (#{})",
            field(project, "name"),
            field(project, "id")
        );
        if self.color {
            output.push(title.bold().to_string());
        } else {
            output.push(title);
        }

        for key in ["description", "current_iteration_number", "week_start_day"] {
            if project.get(key).is_some_and(|v| !v.is_null()) {
                output.push(format!("  {}: {}", key, field(project, key)));
            }
        }

        Ok(output.join("\n"))
    }

    pub fn format_stories(&self, stories: &[Value]) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(stories)?);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["ID", "Type", "State", "Name"]);

        for story in stories {
            let state = field(story, "current_state");
            let mut state_cell = Cell::new(&state);
            if self.color {
                state_cell = state_cell.fg(state_color(StoryState::of(story)));
            }

            table.add_row(vec![
                Cell::new(field(story, "id")),
                Cell::new(field(story, "story_type")).add_attribute(Attribute::Dim),
                state_cell,
                Cell::new(field(story, "name")),
            ]);
        }

        Ok(table.to_string())
    }

    pub fn format_tasks(&self, tasks: &Value) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(tasks)?);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["ID", "Done", "Description"]);

        for task in tasks.as_array().map(Vec::as_slice).unwrap_or_default() {
            let complete = task.get("complete").and_then(Value::as_bool).unwrap_or(false);
            let mark = if complete { "✓" } else { "·" };
            let mut mark_cell = Cell::new(mark);
            if self.color && complete {
                mark_cell = mark_cell.fg(Color::Green);
            }

            table.add_row(vec![
                Cell::new(field(task, "id")),
                mark_cell,
                Cell::new(field(task, "description")),
            ]);
        }

        Ok(table.to_string())
    }

    pub fn format_story_update(&self, story: &Value) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(story)?);
        }

        let line = format!(
            "Story {} is now {}",
            field(story, "id"),
            field(story, "current_state")
        );
        Ok(if self.color {
            line.green().to_string()
        } else {
            line
        })
    }
}

fn field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn state_color(state: Option<StoryState>) -> Color {
    match state {
        Some(StoryState::Accepted) => Color::Green,
        Some(StoryState::Delivered) => Color::Cyan,
        Some(StoryState::Finished) => Color::Blue,
        Some(StoryState::Started) => Color::Yellow,
        Some(StoryState::Rejected) => Color::Red,
        Some(StoryState::Unstarted) | Some(StoryState::Unscheduled) | None => Color::Grey,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_plain() {
        let formatter = OutputFormatter::new(OutputFormat::Table).without_color();
        let output = formatter
            .format_project(&json!({ "id": 42, "name": "Mango", "description": null }))
            .unwrap();
        assert_eq!(output, "Mango (#42)");
    }

    #[test]
    fn test_stories_table_contains_rows() {
        let formatter = OutputFormatter::new(OutputFormat::Table).without_color();
        let output = formatter
            .format_stories(&[
                json!({ "id": 1, "name": "Login", "story_type": "feature", "current_state": "started" }),
                json!({ "id": 2, "name": "Logout", "current_state": "accepted" }),
            ])
            .unwrap();

        assert!(output.contains("Login"));
        assert!(output.contains("started"));
        assert!(output.contains("Logout"));
        assert!(output.contains("State"));
    }

    #[test]
    fn test_json_output() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format_tasks(&json!([{ "id": 3 }])).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, json!([{ "id": 3 }]));
    }

    #[test]
    fn test_story_update_plain() {
        let formatter = OutputFormatter::new(OutputFormat::Table).without_color();
        let output = formatter
            .format_story_update(&json!({ "id": 7, "current_state": "finished" }))
            .unwrap();
        assert_eq!(output, "Story 7 is now finished");
    }
}
