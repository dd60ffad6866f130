mod common;

use common::{publication_body, spawn_app, team_body, Session, TestApp};
use researchify::storage::repository::{AchievementRepository, PublicationRepository};
use reqwest::Method;
use serde_json::{json, Value};

async fn add_member(app: &TestApp, session: &Session, name: &str) -> Value {
    let resp = app
        .authed(Method::POST, &format!("/team/{}/member", session.team_id), session)
        .json(&json!({ "fullName": name, "position": "Researcher" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

async fn members(app: &TestApp, session: &Session) -> Vec<Value> {
    let resp = app
        .authed(Method::GET, &format!("/team/{}/member", session.team_id), session)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn lab_x_lifecycle() {
    let app = spawn_app().await;

    let resp = app
        .request(Method::POST, "/team")
        .json(&json!({
            "teamName": "Lab X",
            "orgName": "Uni Y",
            "email": "a@b.com",
            "password": "p",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let team_id: String = resp.json().await.unwrap();
    assert!(uuid::Uuid::parse_str(&team_id).is_ok());

    let resp = app
        .request(Method::POST, "/auth/login")
        .json(&json!({ "email": "a@b.com", "password": "p" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let access = common::set_cookie(&resp, "accessToken").unwrap();

    let resp = app
        .request(Method::GET, "/team")
        .header(reqwest::header::COOKIE, format!("accessToken={access}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let team: Value = resp.json().await.unwrap();
    assert_eq!(team["teamName"], "Lab X");
    assert_eq!(team["_id"], team_id.as_str());
    assert!(team.get("password").is_none());
    assert!(team.get("passwordHash").is_none());

    // hooks have run by the time creation answered
    let (status, website) = app.get_json(&format!("/clientWebsite/{team_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(website["publicationOptions"]["layout"], "None");
    assert_eq!(website["publicationOptions"]["sortBy"], "Title");
    assert_eq!(website["template"]["theme"], "light");
    let (status, homepage) = app.get_json(&format!("/homepage/{team_id}")).await;
    assert_eq!(status, 200);
    assert_eq!(homepage["aboutUs"], "");

    let resp = app
        .request(Method::DELETE, &format!("/team/{team_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    assert_eq!(app.get_json(&format!("/clientWebsite/{team_id}")).await.0, 404);
    assert_eq!(app.get_json(&format!("/homepage/{team_id}")).await.0, 404);
    let resp = app
        .request(Method::DELETE, &format!("/team/{team_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn registration_and_login_errors() {
    let app = spawn_app().await;
    app.create_team("Lab X", "lab@x.org").await;

    let (status, body) = app
        .send_json(Method::POST, "/team", &team_body("Other Lab", "lab@x.org"))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Email had been registered");

    let (status, body) = app
        .send_json(
            Method::POST,
            "/team",
            &json!({ "teamName": "ab", "orgName": "Uni", "email": "nope", "password": "" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);

    let (status, _) = app
        .send_json(
            Method::POST,
            "/auth/login",
            &json!({ "email": "who@x.org", "password": "whatever" }),
        )
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .send_json(
            Method::POST,
            "/auth/login",
            &json!({ "email": "lab@x.org", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["message"], "Incorrect email/password");
}

#[tokio::test]
async fn concurrent_registrations_with_one_email_yield_one_team() {
    let app = spawn_app().await;

    for round in 0..5 {
        let email = format!("race{round}@lab.org");
        let first = team_body("Lab One", &email);
        let second = team_body("Lab Two", &email);
        let (a, b) = tokio::join!(
            app.send_json(Method::POST, "/team", &first),
            app.send_json(Method::POST, "/team", &second),
        );

        let mut statuses = vec![a.0, b.0];
        statuses.sort();
        assert_eq!(statuses, vec![201, 400], "round {round}");
        let rejected = if a.0 == 400 { a.1 } else { b.1 };
        assert_eq!(rejected["message"], "Email had been registered");
    }

    let one = app.team_session("Lab P", "p@lab.org").await;
    app.create_team("Lab Q", "q@lab.org").await;
    let resp = app
        .authed(Method::PATCH, &format!("/team/{}", one.team_id), &one)
        .json(&json!({ "email": "q@lab.org" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn access_cookie_gate_and_refresh() {
    let app = spawn_app().await;
    let session = app.team_session("Lab X", "lab@x.org").await;

    let resp = app.request(Method::GET, "/team").send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .request(Method::GET, "/team")
        .header(reqwest::header::COOKIE, "accessToken=not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // a refresh token is signed with the other secret
    let resp = app
        .request(Method::GET, "/team")
        .header(reqwest::header::COOKIE, format!("accessToken={}", session.refresh))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app.request(Method::POST, "/auth/refresh").send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .request(Method::POST, "/auth/refresh")
        .header(reqwest::header::COOKIE, session.refresh_cookie())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fresh = common::set_cookie(&resp, "accessToken").unwrap();
    let resp = app
        .request(Method::GET, "/team")
        .header(reqwest::header::COOKIE, format!("accessToken={fresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app.request(Method::POST, "/auth/logout").send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let cleared: Vec<String> = resp
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cleared.len(), 2);
    assert!(cleared.iter().all(|c| c.contains("Max-Age=0") && c.contains("HttpOnly")));

    let (status, _) = app
        .send_json(Method::DELETE, &format!("/team/{}", session.team_id), &json!({}))
        .await;
    assert_eq!(status, 200);
    let resp = app
        .request(Method::POST, "/auth/refresh")
        .header(reqwest::header::COOKIE, session.refresh_cookie())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn path_ids_and_ownership_are_checked() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    let b = app.team_session("Lab B", "b@lab.org").await;

    let resp = app
        .authed(Method::GET, "/team/not-a-uuid/member", &a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .authed(Method::POST, &format!("/team/{}/member", b.team_id), &a)
        .json(&json!({ "fullName": "Intruder" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert!(members(&app, &b).await.is_empty());

    assert_eq!(app.get_json("/publications/123").await.0, 400);
}

#[tokio::test]
async fn member_edits_leave_siblings_and_other_teams_alone() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    let b = app.team_session("Lab B", "b@lab.org").await;

    let first = add_member(&app, &a, "Ada Lovelace").await;
    let second = add_member(&app, &a, "Grace Hopper").await;
    add_member(&app, &b, "Alan Turing").await;

    let mut changed = second.clone();
    changed["summary"] = json!("Compiler pioneer");
    let resp = app
        .authed(Method::PATCH, &format!("/team/{}/member", a.team_id), &a)
        .json(&changed)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let roster = members(&app, &a).await;
    assert_eq!(roster.len(), 2);
    assert_eq!(
        serde_json::to_string(&roster[0]).unwrap(),
        serde_json::to_string(&first).unwrap()
    );
    assert_eq!(roster[1]["summary"], "Compiler pioneer");

    let other = members(&app, &b).await;
    assert_eq!(other.len(), 1);
    assert_eq!(other[0]["fullName"], "Alan Turing");

    // a member id of another team is unknown here
    let resp = app
        .authed(
            Method::DELETE,
            &format!("/team/{}/member/{}", a.team_id, other[0]["_id"].as_str().unwrap()),
            &a,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(members(&app, &a).await.len(), 2);
    assert_eq!(members(&app, &b).await.len(), 1);

    let resp = app
        .authed(
            Method::DELETE,
            &format!("/team/{}/member/{}", a.team_id, first["_id"].as_str().unwrap()),
            &a,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let roster = members(&app, &a).await;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["fullName"], "Grace Hopper");
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    add_member(&app, &a, "Ada Lovelace").await;

    // the roster has been written once, so the team is at version 1
    let resp = app
        .authed(Method::POST, &format!("/team/{}/member", a.team_id), &a)
        .header(reqwest::header::IF_MATCH, "0")
        .json(&json!({ "fullName": "Grace Hopper" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert_eq!(members(&app, &a).await.len(), 1);

    let resp = app
        .authed(Method::POST, &format!("/team/{}/member", a.team_id), &a)
        .header(reqwest::header::IF_MATCH, "\"1\"")
        .json(&json!({ "fullName": "Grace Hopper" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let team: Value = app
        .authed(Method::GET, "/team", &a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(team["version"], 2);
}

#[tokio::test]
async fn batch_delete_is_all_or_nothing() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    let ada = add_member(&app, &a, "Ada Lovelace").await;
    let grace = add_member(&app, &a, "Grace Hopper").await;
    add_member(&app, &a, "Alan Turing").await;

    let unknown = uuid::Uuid::new_v4().to_string();
    let resp = app
        .authed(Method::PATCH, &format!("/team/{}/members", a.team_id), &a)
        .json(&json!([ada["_id"], unknown]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(members(&app, &a).await.len(), 3);

    let resp = app
        .authed(Method::PATCH, &format!("/team/{}/members", a.team_id), &a)
        .json(&json!([ada["_id"], grace["_id"]]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let roster = members(&app, &a).await;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["fullName"], "Alan Turing");

    let resp = app
        .authed(Method::DELETE, &format!("/team/{}/reset-members", a.team_id), &a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(members(&app, &a).await.is_empty());
}

#[tokio::test]
async fn twitter_handle_rules() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    let path = format!("/team/{}/twitter-handle", a.team_id);

    let resp = app
        .authed(Method::PATCH, &path, &a)
        .json(&json!({ "twitterHandle": "lab_a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let team: Value = resp.json().await.unwrap();
    assert_eq!(team["twitterHandle"], "lab_a");

    let resp = app
        .authed(Method::PATCH, &path, &a)
        .json(&json!({ "twitterHandle": "abcdefghijklmnop" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .authed(Method::PATCH, &path, &a)
        .json(&json!({ "twitterHandle": "../../x?y=1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let resp = app.authed(Method::GET, "/team", &a).send().await.unwrap();
    let team: Value = resp.json().await.unwrap();
    assert_eq!(team["twitterHandle"], "lab_a");

    let resp = app
        .authed(Method::PATCH, &path, &a)
        .json(&json!({ "twitterHandle": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Could not find user"));

    let resp = app
        .authed(Method::PATCH, &path, &a)
        .json(&json!({ "twitterHandle": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let team: Value = resp.json().await.unwrap();
    assert!(team["twitterHandle"].is_null());
}

#[tokio::test]
async fn deleting_a_team_removes_only_its_records() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    let b = app.team_session("Lab B", "b@lab.org").await;

    for session in [&a, &b] {
        let (status, _) = app
            .send_json(
                Method::POST,
                "/publications",
                &publication_body(&session.team_id, "Shared Title"),
            )
            .await;
        assert_eq!(status, 201);
        let (status, _) = app
            .send_json(
                Method::POST,
                "/achievements",
                &json!({
                    "teamId": session.team_id,
                    "title": "Best Paper",
                    "yearAwarded": 2022,
                    "description": "Awarded for a paper",
                }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let resp = app
        .request(Method::DELETE, &format!("/team/{}", a.team_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let db = &app.state.db;
    assert!(PublicationRepository::find_by_team(db, &a.team_id).await.unwrap().is_empty());
    assert!(AchievementRepository::find_by_team(db, &a.team_id).await.unwrap().is_empty());
    assert_eq!(app.get_json(&format!("/homepage/{}", a.team_id)).await.0, 404);

    let (status, pubs) = app.get_json(&format!("/publications/team/{}", b.team_id)).await;
    assert_eq!(status, 200);
    assert_eq!(pubs.as_array().unwrap().len(), 1);
    let (status, achievements) = app.get_json(&format!("/achievements/team/{}", b.team_id)).await;
    assert_eq!(status, 200);
    assert_eq!(achievements.as_array().unwrap().len(), 1);
    assert_eq!(app.get_json(&format!("/clientWebsite/{}", b.team_id)).await.0, 200);
}

#[tokio::test]
async fn reset_keeps_identity_and_restores_defaults() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    add_member(&app, &a, "Ada Lovelace").await;
    app.send_json(Method::POST, "/publications", &publication_body(&a.team_id, "A Paper"))
        .await;
    app.send_json(
        Method::PATCH,
        &format!("/clientWebsite/{}", a.team_id),
        &json!({ "title": "Lab A site", "publicationOptions": { "layout": "Category" } }),
    )
    .await;
    app.send_json(
        Method::PATCH,
        &format!("/homepage/{}", a.team_id),
        &json!({ "aboutUs": "We research things." }),
    )
    .await;

    let resp = app
        .authed(Method::DELETE, &format!("/team/{}/resetTeamData", a.team_id), &a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let team: Value = resp.json().await.unwrap();
    assert_eq!(team["teamName"], "Lab A");
    assert_eq!(team["email"], "a@lab.org");
    assert!(team["teamMembers"].as_array().unwrap().is_empty());

    let (_, pubs) = app.get_json(&format!("/publications/team/{}", a.team_id)).await;
    assert!(pubs.as_array().unwrap().is_empty());
    let (_, website) = app.get_json(&format!("/clientWebsite/{}", a.team_id)).await;
    assert!(website["title"].is_null());
    assert_eq!(website["publicationOptions"]["layout"], "None");
    let (_, homepage) = app.get_json(&format!("/homepage/{}", a.team_id)).await;
    assert_eq!(homepage["aboutUs"], "");

    // credentials survive
    app.login("a@lab.org").await;
}

#[tokio::test]
async fn github_pages_flow() {
    let app = spawn_app().await;
    let a = app.team_session("Lab A", "a@lab.org").await;
    add_member(&app, &a, "Ada Lovelace").await;

    let (status, body) = app
        .get_json(&format!("/team/{}/gh_auth/{}", a.team_id, common::GH_CODE))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["ghToken"], common::GH_TOKEN);

    let (status, _) = app
        .get_json(&format!("/team/{}/gh_auth/bad-code", a.team_id))
        .await;
    assert_eq!(status, 400);

    let (status, body) = app
        .send_json(
            Method::POST,
            &format!("/team/{}/pages-deploy", a.team_id),
            &json!({ "ghToken": "gho_no_repo" }),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "GitHub repo doesn't exist for this team!");
    assert!(app.deployer.calls.lock().unwrap().is_empty());

    let (status, body) = app
        .send_json(
            Method::POST,
            &format!("/team/{}/pages-deploy", a.team_id),
            &json!({ "ghToken": common::GH_TOKEN }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["githubUsername"], common::GH_LOGIN);
    {
        let calls = app.deployer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (team_id, bundle) = &calls[0];
        assert_eq!(team_id, &a.team_id);
        assert_eq!(bundle["REACT_APP_TEAM_INFO"]["teamName"], "Lab A");
        assert_eq!(bundle["REACT_APP_TEAM_MEMBERS"].as_array().unwrap().len(), 1);
        assert_eq!(bundle["REACT_APP_WEB_METADATA"]["template"]["layout"], "1");
    }

    let team: Value = app
        .authed(Method::GET, "/team", &a)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(team["githubUsername"], common::GH_LOGIN);

    let resp = app
        .authed(Method::DELETE, &format!("/team/{}/pages-clear", a.team_id), &a)
        .json(&json!({ "ghToken": common::GH_TOKEN }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        app.github.cleared.lock().unwrap().as_slice(),
        &[common::GH_LOGIN.to_string()]
    );
}
