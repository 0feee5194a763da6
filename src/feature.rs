use serde_json::Value;

pub struct FeatureGenerator;

impl FeatureGenerator {
    /// Convert a list of stories to Cucumber feature text
    pub fn generate(stories: &[Value]) -> String {
        let mut output = String::new();

        for (i, story) in stories.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&Self::format_story(story));
        }

        output
    }

    fn format_story(story: &Value) -> String {
        let id = Self::story_id(story);
        let mut block = String::new();

        let name = story
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Story {}", id));
        block.push_str(&format!("Feature: {}\n", name));

        if let Some(description) = story
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.trim().is_empty())
        {
            for line in description.lines() {
                if line.trim().is_empty() {
                    block.push('\n');
                } else {
                    block.push_str(&format!("  {}\n", line.trim_end()));
                }
            }
        }

        let state = story
            .get("current_state")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        block.push_str(&format!("\n  # story {} ({})\n", id, state));

        block
    }

    fn story_id(story: &Value) -> String {
        match story.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => "?".to_string(),
        }
    }
}
