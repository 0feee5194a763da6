use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::config::ClientConfig;
use crate::feature::FeatureGenerator;
use crate::http::{Client, Method, Request};
use crate::tracker::state::StoryState;
use crate::{MangoError, Result};

/// Client for a single Pivotal Tracker project.
///
/// The last fetched project and story list are kept on the instance and
/// replaced by every successful fetch. Failed calls are logged and leave
/// both untouched.
pub struct Mango {
    token: String,
    project_id: String,
    base_url: Url,
    http: Client,
    project: Value,
    stories: Vec<Value>,
}

impl Mango {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url().to_string();

        let Some(token) = config.token.filter(|t| !t.trim().is_empty()) else {
            tracing::error!("Missing API token");
            return Err(MangoError::MissingToken);
        };
        let Some(project_id) = config.project_id.filter(|p| !p.trim().is_empty()) else {
            tracing::error!("Missing project id");
            return Err(MangoError::MissingProjectId);
        };
        let base_url = Url::parse(&base_url)?;

        Ok(Self {
            token,
            project_id,
            base_url,
            http: Client::new()?,
            project: json!({}),
            stories: Vec::new(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn set_project_id(&mut self, project_id: impl Into<String>) {
        self.project_id = project_id.into();
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Last fetched project, `{}` before the first fetch.
    pub fn project(&self) -> &Value {
        &self.project
    }

    /// Last fetched stories, empty before the first fetch.
    pub fn stories(&self) -> &[Value] {
        &self.stories
    }

    /// Filter the cached stories without hitting the network.
    pub fn cached_stories_in_state(&self, state: StoryState) -> Vec<&Value> {
        self.stories
            .iter()
            .filter(|story| StoryState::of(story) == Some(state))
            .collect()
    }

    pub async fn fetch_project(&mut self) -> Result<&Value> {
        let request = self.request(Method::Get, &[])?;
        let context = format!("Could not get project with id {}", self.project_id);
        self.project = self.dispatch(request, &context).await?;
        tracing::info!(project_id = %self.project_id, "fetched project");
        Ok(&self.project)
    }

    pub async fn get_project(&mut self) -> Result<&Value> {
        self.fetch_project().await
    }

    pub async fn fetch_stories(&mut self) -> Result<&[Value]> {
        let request = self.request(Method::Get, &["stories"])?;
        let context = format!(
            "Could not get stories of project with id {}",
            self.project_id
        );
        self.store_stories(request, &context).await
    }

    pub async fn get_stories(&mut self) -> Result<&[Value]> {
        self.fetch_stories().await
    }

    /// Fetch the stories currently in `state`. The state name is checked
    /// before any request goes out.
    pub async fn get_stories_by_state(&mut self, state: &str) -> Result<&[Value]> {
        let state = Self::parse_state(state)?;
        let request = self
            .request(Method::Get, &["stories"])?
            .with_query("with_state", state.as_str());
        let context = format!("Could not get stories with state {}", state);
        self.store_stories(request, &context).await
    }

    /// Move a story to `state` and return the updated story.
    pub async fn set_story_state(&self, story_id: &str, state: &str) -> Result<Value> {
        let story_id = Self::require_story_id(story_id)?;
        let state = Self::parse_state(state)?;
        self.update_story_state(story_id, state).await
    }

    pub async fn accept_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Accepted).await
    }

    pub async fn deliver_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Delivered).await
    }

    pub async fn finish_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Finished).await
    }

    pub async fn start_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Started).await
    }

    pub async fn reject_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Rejected).await
    }

    pub async fn unstart_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Unstarted).await
    }

    pub async fn unschedule_story(&self, story_id: &str) -> Result<Value> {
        self.transition(story_id, StoryState::Unscheduled).await
    }

    /// Tasks attached to a story. Not cached.
    pub async fn get_story_tasks(&self, story_id: &str) -> Result<Value> {
        let story_id = Self::require_story_id(story_id)?;
        let request = self.request(Method::Get, &["stories", story_id, "tasks"])?;
        let context = format!(
            "Could not get list of tasks under story with id {}",
            story_id
        );
        self.dispatch(request, &context).await
    }

    /// Render the cached stories as Cucumber feature text.
    pub fn convert_stories(&self) -> Result<String> {
        if self.stories.is_empty() {
            tracing::error!("No stories to convert");
            return Err(MangoError::NoStories);
        }
        Ok(FeatureGenerator::generate(&self.stories))
    }

    async fn transition(&self, story_id: &str, state: StoryState) -> Result<Value> {
        let story_id = Self::require_story_id(story_id)?;
        self.update_story_state(story_id, state).await
    }

    async fn update_story_state(&self, story_id: &str, state: StoryState) -> Result<Value> {
        let request = self
            .request(Method::Put, &["stories", story_id])?
            .with_json(&json!({ "current_state": state }))?;
        let context = format!("Could not update story with id {}", story_id);
        let story = self.dispatch(request, &context).await?;
        tracing::info!(story_id, state = %state, "updated story state");
        Ok(story)
    }

    async fn store_stories(&mut self, request: Request, context: &str) -> Result<&[Value]> {
        self.stories = self.dispatch(request, context).await?;
        tracing::info!(
            project_id = %self.project_id,
            count = self.stories.len(),
            "fetched stories"
        );
        Ok(&self.stories)
    }

    /// Build an authenticated request for `projects/{project_id}/{segments..}`.
    fn request(&self, method: Method, segments: &[&str]) -> Result<Request> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MangoError::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("projects")
            .push(&self.project_id)
            .extend(segments);

        Request::new(method, url.as_str())?.with_tracker_token(&self.token)
    }

    /// Send `request` and parse a successful body. Every failure is logged
    /// with `context` before being returned.
    async fn dispatch<T: DeserializeOwned>(&self, request: Request, context: &str) -> Result<T> {
        let result = match self.http.execute(request).await {
            Ok(response) if response.is_success() => response.json(),
            Ok(response) => Err(MangoError::Api {
                status: response.status.code(),
                reason: response.status.reason_phrase(),
                message: context.to_string(),
            }),
            Err(e) => Err(e),
        };

        result.inspect_err(|e| tracing::error!("{}", failure_message(context, e)))
    }

    fn require_story_id(story_id: &str) -> Result<&str> {
        let story_id = story_id.trim();
        if story_id.is_empty() {
            tracing::error!("Missing story id");
            return Err(MangoError::MissingStoryId);
        }
        Ok(story_id)
    }

    fn parse_state(state: &str) -> Result<StoryState> {
        state
            .parse()
            .inspect_err(|_| tracing::error!("Invalid state '{}'", state))
    }
}

/// `Api` errors already carry `context` in their message.
fn failure_message(context: &str, err: &MangoError) -> String {
    match err {
        MangoError::Api { .. } => err.to_string(),
        _ => format!("{}: {}", context, err),
    }
}
