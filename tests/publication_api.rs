mod common;

use common::{publication_body, spawn_app};
use researchify::storage::repository::PublicationRepository;
use reqwest::Method;
use serde_json::{json, Value};

#[tokio::test]
async fn publication_crud() {
    let app = spawn_app().await;
    let team_id = app.create_team("Lab A", "a@lab.org").await;

    let (status, created) = app
        .send_json(Method::POST, "/publications", &publication_body(&team_id, "First Paper"))
        .await;
    assert_eq!(status, 201);
    assert_eq!(created["teamId"], team_id.as_str());
    assert_eq!(created["category"]["type"], "CONFERENCE");
    let id = created["_id"].as_str().unwrap().to_string();

    let (status, read) = app.get_json(&format!("/publications/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(read, created);

    let (status, updated) = app
        .send_json(
            Method::PATCH,
            &format!("/publications/{id}"),
            &json!({ "citedBy": 7, "summary": "A proper summary" }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["citedBy"], 7);
    assert_eq!(updated["title"], "First Paper");

    let (status, _) = app
        .send_json(Method::PATCH, &format!("/publications/{id}"), &json!({ "citedBy": -3 }))
        .await;
    assert_eq!(status, 400);

    let resp = app
        .request(Method::DELETE, &format!("/publications/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(app.get_json(&format!("/publications/{id}")).await.0, 404);
}

#[tokio::test]
async fn empty_authors_are_rejected_and_not_stored() {
    let app = spawn_app().await;
    let team_id = app.create_team("Lab A", "a@lab.org").await;

    let mut body = publication_body(&team_id, "No Authors");
    body["authors"] = json!([]);
    let (status, err) = app.send_json(Method::POST, "/publications", &body).await;
    assert_eq!(status, 400);
    assert_eq!(err["message"], "Validation error");
    assert_eq!(err["errors"][0], "Error: Authors must not be empty.");

    let stored = PublicationRepository::find_by_team(&app.state.db, &team_id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn publication_for_unknown_team_is_not_found() {
    let app = spawn_app().await;
    let ghost = uuid::Uuid::new_v4().to_string();
    let (status, body) = app
        .send_json(Method::POST, "/publications", &publication_body(&ghost, "Orphan"))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No team found with the given id");
}

#[tokio::test]
async fn bulk_import_is_rejected_as_a_whole() {
    let app = spawn_app().await;
    let team_id = app.create_team("Lab A", "a@lab.org").await;
    let path = format!("/publications/import/{team_id}");

    let good = json!({
        "authors": ["A Author"],
        "title": "Good Paper",
        "description": "Long enough",
    });
    let bad = json!({
        "authors": ["B Author"],
        "title": "x",
        "description": "Long enough",
    });

    let (status, err) = app
        .send_json(Method::POST, &path, &json!([good.clone(), bad]))
        .await;
    assert_eq!(status, 400);
    assert_eq!(
        err["errors"][0],
        "[1] Error: Title must be at least 3 characters."
    );
    let (_, list) = app.get_json(&format!("/publications/team/{team_id}")).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, created) = app
        .send_json(Method::POST, &path, &json!([good.clone(), good]))
        .await;
    assert_eq!(status, 201);
    assert_eq!(created.as_array().unwrap().len(), 2);
    let (_, list) = app.get_json(&format!("/publications/team/{team_id}")).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn scholar_scrape_checks_the_author_id() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/publications/import/short").await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Error: Invalid Google Scholar author id.");

    let (status, page) = app.get_json("/publications/import/SbUmSEAAAAAJ").await;
    assert_eq!(status, 200);
    assert_eq!(page["retrieved"], 1);
    assert_eq!(page["end"], false);
    let first: &Value = &page["publications"][0];
    assert_eq!(first["title"], "Deep Things");
    assert_eq!(first["category"]["type"], "JOURNAL");

    let (status, page) = app
        .get_json("/publications/import/SbUmSEAAAAAJ?start=10")
        .await;
    assert_eq!(status, 200);
    assert_eq!(page["end"], true);
}
