use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};
use shared::{ErrorCode, ErrorResponse, Poll, PollTally};

use crate::{cors::CORS, routes::{build_rocket, AppState}, store::MemoryPollStore};

fn client() -> Client {
    let rocket = build_rocket(AppState::new(MemoryPollStore::new()), CORS::new("http://localhost"));
    Client::tracked(rocket).expect("valid rocket instance")
}

fn create(client: &Client, body: Value) -> (Status, Value) {
    let response = client.post("/api/polls").json(&body).dispatch();
    let status = response.status();
    (status, response.into_json().unwrap_or(Value::Null))
}

fn vote(client: &Client, poll_id: i64, option_index: i64) -> Status {
    client.post("/api/polls/vote")
        .json(&json!({ "pollId": poll_id, "optionIndex": option_index }))
        .dispatch()
        .status()
}

fn fruit_poll(client: &Client) -> Poll {
    let (status, body) = create(client, json!({
        "question": "Best fruit?",
        "options": [{ "voteOption": "Apple", "voteCount": 0 }, { "voteOption": "Banana", "voteCount": 0 }]
    }));
    assert_eq!(status, Status::Ok);
    serde_json::from_value(body).unwrap()
}

#[test]
fn create_vote_and_read_back() {
    let client = client();
    let poll = fruit_poll(&client);
    assert_eq!(poll.options.len(), 2);

    assert_eq!(vote(&client, poll.id, 1), Status::Ok);

    let response = client.get(format!("/api/polls/{}", poll.id)).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_json::<Value>().unwrap(), json!({
        "id": poll.id,
        "question": "Best fruit?",
        "options": [
            { "voteOption": "Apple", "voteCount": 0 },
            { "voteOption": "Banana", "voteCount": 1 }
        ]
    }));
}

#[test]
fn submitted_counts_are_ignored() {
    let client = client();
    let (status, body) = create(&client, json!({
        "question": "  Tabs or spaces?  ",
        "options": [{ "voteOption": " Tabs ", "voteCount": 40 }, { "voteOption": "Spaces" }]
    }));
    assert_eq!(status, Status::Ok);
    let poll: Poll = serde_json::from_value(body).unwrap();
    assert_eq!(poll.question, "Tabs or spaces?");
    assert_eq!(poll.labels().collect::<Vec<_>>(), vec!["Tabs", "Spaces"]);
    assert_eq!(poll.total_votes(), 0);
}

#[test]
fn list_in_creation_order() {
    let client = client();
    let listed: Vec<Poll> = client.get("/api/polls").dispatch().into_json().unwrap();
    assert!(listed.is_empty());

    let first = fruit_poll(&client);
    let second = fruit_poll(&client);
    let listed: Vec<Poll> = client.get("/api/polls").dispatch().into_json().unwrap();
    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![first.id, second.id]);
}

#[test]
fn validation_failures_are_400() {
    let client = client();
    for body in [
        json!({ "question": "", "options": [{ "voteOption": "A" }, { "voteOption": "B" }] }),
        json!({ "question": "Q?", "options": [{ "voteOption": "OnlyOne" }] }),
        json!({ "question": "Q?", "options": [{ "voteOption": "A" }, { "voteOption": "   " }] }),
    ] {
        let (status, body) = create(&client, body);
        assert_eq!(status, Status::BadRequest);
        let error: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, ErrorCode::ValidationFailed);
    }
    let listed: Vec<Poll> = client.get("/api/polls").dispatch().into_json().unwrap();
    assert!(listed.is_empty());
}

#[test]
fn vote_errors() {
    let client = client();
    let poll = fruit_poll(&client);

    let response = client.post("/api/polls/vote")
        .json(&json!({ "pollId": 999, "optionIndex": 0 }))
        .dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.into_json::<ErrorResponse>().unwrap().code, ErrorCode::NotFound);

    let response = client.post("/api/polls/vote")
        .json(&json!({ "pollId": poll.id, "optionIndex": 99 }))
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.into_json::<ErrorResponse>().unwrap().code, ErrorCode::OutOfRange);

    assert_eq!(vote(&client, poll.id, -1), Status::BadRequest);

    let poll: Poll = client.get(format!("/api/polls/{}", poll.id)).dispatch().into_json().unwrap();
    assert_eq!(poll.total_votes(), 0);
}

#[test]
fn unknown_poll_is_404() {
    let client = client();
    let response = client.get("/api/polls/12345").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(response.into_json::<ErrorResponse>().unwrap().code, ErrorCode::NotFound);
    assert_eq!(client.get("/api/polls/12345/tally").dispatch().status(), Status::NotFound);
}

#[test]
fn malformed_vote_body_is_rejected() {
    let client = client();
    let response = client.post("/api/polls/vote")
        .header(ContentType::JSON)
        .body(r#"{"pollId": "one"}"#)
        .dispatch();
    assert!(response.status().code >= 400 && response.status().code < 500);
}

#[test]
fn tally_endpoint() {
    let client = client();
    let (_, body) = create(&client, json!({
        "question": "Q?",
        "options": [{ "voteOption": "A" }, { "voteOption": "B" }, { "voteOption": "C" }]
    }));
    let poll: Poll = serde_json::from_value(body).unwrap();

    let tally: PollTally = client.get(format!("/api/polls/{}/tally", poll.id)).dispatch().into_json().unwrap();
    assert_eq!(tally.total_votes, 0);
    assert!(tally.tallies.iter().all(|t| t.percent == 0.0));

    for index in [0, 1, 0, 0] {
        assert_eq!(vote(&client, poll.id, index), Status::Ok);
    }
    let response = client.get(format!("/api/polls/{}/tally", poll.id)).dispatch();
    let value: Value = response.into_json().unwrap();
    assert_eq!(value["pollId"], poll.id);
    assert_eq!(value["totalVotes"], 4);
    assert_eq!(value["tallies"][0], json!({ "label": "A", "count": 3, "percent": 75.0 }));
    assert_eq!(value["tallies"][1]["percent"], 25.0);
    assert_eq!(value["tallies"][2]["percent"], 0.0);
}

#[test]
fn cors_headers_for_allowed_origin() {
    let client = client();
    let response = client.get("/api/polls")
        .header(Header::new("Origin", "http://localhost:8080"))
        .dispatch();
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:8080")
    );

    let response = client.get("/api/polls")
        .header(Header::new("Origin", "https://elsewhere.example"))
        .dispatch();
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());

    assert_eq!(client.options("/api/polls").dispatch().status(), Status::Ok);
}

#[test]
fn bodies_without_json_content_type_are_415() {
    let client = client();
    let body = json!({ "question": "Q?", "options": [{ "voteOption": "A" }, { "voteOption": "B" }] });

    let response = client.post("/api/polls").body(body.to_string()).dispatch();
    assert_eq!(response.status(), Status::UnsupportedMediaType);
    assert_eq!(response.into_json::<ErrorResponse>().unwrap().code, ErrorCode::ValidationFailed);

    let response = client.post("/api/polls/vote")
        .header(ContentType::Plain)
        .body(json!({ "pollId": 1, "optionIndex": 0 }).to_string())
        .dispatch();
    assert_eq!(response.status(), Status::UnsupportedMediaType);

    let listed: Vec<Poll> = client.get("/api/polls").dispatch().into_json().unwrap();
    assert!(listed.is_empty());
}

#[test]
fn null_submitted_counts_are_accepted() {
    let client = client();
    let (status, body) = create(&client, json!({
        "question": "Q?",
        "options": [{ "voteOption": "A", "voteCount": null }, { "voteOption": "B", "voteCount": null }]
    }));
    assert_eq!(status, Status::Ok);
    let poll: Poll = serde_json::from_value(body).unwrap();
    assert_eq!(poll.total_votes(), 0);
    assert_eq!(poll.options[1].vote_count, 0);
}
