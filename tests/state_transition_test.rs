use mango::{ClientConfig, Mango, MangoError, StoryState};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_update(server: &MockServer, state: StoryState) {
    Mock::given(method("PUT"))
        .and(path("/projects/42/stories/555"))
        .and(header("X-TrackerToken", "test-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "current_state": state.as_str() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 555,
            "current_state": state.as_str()
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> Mango {
    Mango::new(ClientConfig::new("test-token", "42").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_transition_methods_send_their_state() {
    for state in StoryState::ALL {
        let server = MockServer::start().await;
        mount_update(&server, state).await;
        let mango = client_for(&server);

        let story = match state {
            StoryState::Accepted => mango.accept_story("555").await,
            StoryState::Delivered => mango.deliver_story("555").await,
            StoryState::Finished => mango.finish_story("555").await,
            StoryState::Started => mango.start_story("555").await,
            StoryState::Rejected => mango.reject_story("555").await,
            StoryState::Unstarted => mango.unstart_story("555").await,
            StoryState::Unscheduled => mango.unschedule_story("555").await,
        }
        .unwrap();

        assert_eq!(StoryState::of(&story), Some(state));
    }
}

#[tokio::test]
async fn test_set_story_state_normalizes_case() {
    let server = MockServer::start().await;
    mount_update(&server, StoryState::Finished).await;

    let story = client_for(&server)
        .set_story_state("555", "FINISHED")
        .await
        .unwrap();
    assert_eq!(story["current_state"], "finished");
}

#[tokio::test]
async fn test_set_story_state_rejects_invalid_state() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .set_story_state("555", "shipped")
        .await
        .unwrap_err();
    assert!(matches!(err, MangoError::InvalidState(_)));
}

#[tokio::test]
async fn test_set_story_state_requires_story_id() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .set_story_state(" ", "started")
        .await
        .unwrap_err();
    assert!(matches!(err, MangoError::MissingStoryId));

    let err = client_for(&server).start_story("").await.unwrap_err();
    assert!(matches!(err, MangoError::MissingStoryId));
}

#[tokio::test]
async fn test_set_story_state_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/projects/42/stories/555"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).accept_story("555").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not update story with id 555 (HTTP 404 Not Found)"
    );
}
