mod common;

use actix_web::{cookie::Cookie, http::StatusCode, test};
use common::*;
use freelancer_dashboard::{app::build_app, db, AppState};

async fn user_id(state: &AppState, email: &str) -> i64 {
    db::get_user_by_email(state, email)
        .await
        .unwrap()
        .expect("registered user")
        .id
}

fn post_form(
    uri: &str,
    cookie: &Cookie<'static>,
    fields: &[(&str, &str)],
) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_form(fields)
}

fn get(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

#[actix_web::test]
async fn client_crud_round() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;
    let resp = test::call_service(&app, register_request("alice@example.com").to_request()).await;
    let cookie = session_cookie(&resp);
    let alice = user_id(&state, "alice@example.com").await;

    let resp = test::call_service(&app, get("/dashboard/clients?new=1", &cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("<dialog open"));

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", ""), ("name", "Acme"), ("email", "ops@acme.test"), ("phone", "")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard/clients");

    let clients = db::list_clients(&state, alice).await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].phone, None);
    let id = clients[0].id.to_string();

    let resp = test::call_service(&app, get(&format!("/dashboard/clients?edit={}", id), &cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Edit client"));

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", id.as_str()), ("name", "Acme Corp"), ("email", "ops@acme.test"), ("phone", "555-0100")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = test::call_service(&app, get("/dashboard/clients", &cookie).to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("Acme Corp"));
    assert!(body.contains("555-0100"));
    assert!(!body.contains("<dialog open"));

    let resp = test::call_service(
        &app,
        post_form(&format!("/dashboard/clients/{}/delete", id), &cookie, &[]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(db::list_clients(&state, alice).await.unwrap().is_empty());
}

#[actix_web::test]
async fn client_validation_keeps_form_open() {
    let app = test::init_service(build_app(test_state().await, session_settings())).await;
    let resp = test::call_service(&app, register_request("bob@example.com").to_request()).await;
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", ""), ("name", "Initech"), ("email", "  ")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_text(resp).await;
    assert!(body.contains("Email is required"));
    assert!(body.contains("<dialog open"));
    assert!(body.contains("value=\"Initech\""));
}

#[actix_web::test]
async fn rows_are_scoped_to_their_owner() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;

    let resp = test::call_service(&app, register_request("owner@example.com").to_request()).await;
    let owner_cookie = session_cookie(&resp);
    let resp = test::call_service(&app, register_request("other@example.com").to_request()).await;
    let other_cookie = session_cookie(&resp);
    let owner = user_id(&state, "owner@example.com").await;

    test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &owner_cookie,
            &[("id", ""), ("name", "Umbrella"), ("email", "it@umbrella.test")],
        )
        .to_request(),
    )
    .await;
    let id = db::list_clients(&state, owner).await.unwrap()[0].id.to_string();

    let resp = test::call_service(&app, get("/dashboard/clients", &other_cookie).to_request()).await;
    assert!(!body_text(resp).await.contains("Umbrella"));

    let resp = test::call_service(&app, get(&format!("/dashboard/clients?edit={}", id), &other_cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &other_cookie,
            &[("id", id.as_str()), ("name", "Hijacked"), ("email", "x@y.test")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        post_form(&format!("/dashboard/clients/{}/delete", id), &other_cookie, &[]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let clients = db::list_clients(&state, owner).await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Umbrella");
}

#[actix_web::test]
async fn invoices_are_numbered_and_totalled() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;
    let resp = test::call_service(&app, register_request("carol@example.com").to_request()).await;
    let cookie = session_cookie(&resp);
    let carol = user_id(&state, "carol@example.com").await;

    test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", ""), ("name", "Globex"), ("email", "ap@globex.test")],
        )
        .to_request(),
    )
    .await;
    let client_id = db::list_clients(&state, carol).await.unwrap()[0].id.to_string();

    for amount in ["100", "250"] {
        let resp = test::call_service(
            &app,
            post_form(
                "/dashboard/invoices",
                &cookie,
                &[
                    ("id", ""),
                    ("client_id", client_id.as_str()),
                    ("project_id", ""),
                    ("amount", amount),
                    ("tax_rate", "15"),
                    ("status", ""),
                    ("issue_date", "2025-01-10"),
                    ("due_date", "2025-02-10"),
                    ("notes", ""),
                ],
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let mut invoices = db::list_invoices(&state, carol).await.unwrap();
    invoices.sort_by(|a, b| a.invoice_number.cmp(&b.invoice_number));
    assert_eq!(invoices[0].invoice_number, "INV-000001");
    assert_eq!(invoices[1].invoice_number, "INV-000002");
    assert!((invoices[0].total_amount - 115.0).abs() < 1e-9);
    assert_eq!(invoices[0].status, "pending");

    let id = invoices[0].id.clone();
    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/invoices",
            &cookie,
            &[
                ("id", id.as_str()),
                ("client_id", client_id.as_str()),
                ("amount", "200"),
                ("tax_rate", "10"),
                ("status", "paid"),
                ("issue_date", "2025-01-10"),
                ("due_date", "2025-02-10"),
            ],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let updated = db::get_invoice(&state, carol, &id).await.unwrap().unwrap();
    assert_eq!(updated.invoice_number, "INV-000001");
    assert!((updated.total_amount - 220.0).abs() < 1e-9);
    assert_eq!(updated.status, "paid");

    let resp = test::call_service(&app, get("/dashboard/invoices", &cookie).to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("INV-000002"));
    assert!(body.contains("badge-green\">Paid"));
    assert!(body.contains("$287.50"));
}

#[actix_web::test]
async fn invoice_validation_errors_render_banner() {
    let app = test::init_service(build_app(test_state().await, session_settings())).await;
    let resp = test::call_service(&app, register_request("dave@example.com").to_request()).await;
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/invoices",
            &cookie,
            &[
                ("id", ""),
                ("client_id", "1"),
                ("amount", "0"),
                ("tax_rate", "0"),
                ("issue_date", "2025-01-10"),
                ("due_date", "2025-02-10"),
            ],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("Amount must be greater than zero"));
}

#[actix_web::test]
async fn deleted_client_shows_as_unspecified() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;
    let resp = test::call_service(&app, register_request("erin@example.com").to_request()).await;
    let cookie = session_cookie(&resp);
    let erin = user_id(&state, "erin@example.com").await;

    test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", ""), ("name", "Hooli"), ("email", "pay@hooli.test")],
        )
        .to_request(),
    )
    .await;
    let client_id = db::list_clients(&state, erin).await.unwrap()[0].id.to_string();

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/projects",
            &cookie,
            &[("id", ""), ("name", "Compression"), ("client_id", client_id.as_str()), ("progress", "40"), ("due", "")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    test::call_service(
        &app,
        post_form(&format!("/dashboard/clients/{}/delete", client_id), &cookie, &[]).to_request(),
    )
    .await;

    let projects = db::list_projects(&state, erin).await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].client_id.map(|id| id.to_string()), Some(client_id));

    let resp = test::call_service(&app, get("/dashboard/projects", &cookie).to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("Compression"));
    assert!(body.contains("Unspecified"));
    assert!(body.contains("badge-red\">40%"));
}

#[actix_web::test]
async fn project_requires_client() {
    let app = test::init_service(build_app(test_state().await, session_settings())).await;
    let resp = test::call_service(&app, register_request("frank@example.com").to_request()).await;
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/projects",
            &cookie,
            &[("id", ""), ("name", "Orphan"), ("client_id", "")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("A client must be selected for the project"));
}

#[actix_web::test]
async fn overview_reports_revenue_and_alerts() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;
    let resp = test::call_service(&app, register_request("gina@example.com").to_request()).await;
    let cookie = session_cookie(&resp);
    let gina = user_id(&state, "gina@example.com").await;

    test::call_service(
        &app,
        post_form(
            "/dashboard/clients",
            &cookie,
            &[("id", ""), ("name", "Stark"), ("email", "tony@stark.test")],
        )
        .to_request(),
    )
    .await;
    let client_id = db::list_clients(&state, gina).await.unwrap()[0].id.to_string();

    let invoices = [
        ("1000", "paid", "2099-01-01"),
        ("500", "pending", "2000-01-01"),
        ("300", "pending", "2099-01-01"),
    ];
    for (amount, status, due) in invoices {
        let resp = test::call_service(
            &app,
            post_form(
                "/dashboard/invoices",
                &cookie,
                &[
                    ("id", ""),
                    ("client_id", client_id.as_str()),
                    ("amount", amount),
                    ("tax_rate", "0"),
                    ("status", status),
                    ("issue_date", "2000-01-01"),
                    ("due_date", due),
                ],
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let resp = test::call_service(&app, get("/dashboard", &cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("$1,000.00"));
    assert!(body.contains("You have 1 overdue invoice(s)"));
    assert!(body.contains("You have 2 pending invoice(s)"));
    assert!(body.contains("Stark"));
}

#[actix_web::test]
async fn profile_update_shows_in_settings() {
    let app = test::init_service(build_app(test_state().await, session_settings())).await;
    let resp = test::call_service(&app, register_request("hank@example.com").to_request()).await;
    let cookie = session_cookie(&resp);

    let resp = test::call_service(
        &app,
        post_form("/dashboard/settings/profile", &cookie, &[("full_name", "  Hank Hill ")]).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Profile updated"));

    let resp = test::call_service(&app, get("/dashboard/settings", &cookie).to_request()).await;
    assert!(body_text(resp).await.contains("value=\"Hank Hill\""));
}

#[actix_web::test]
async fn projects_and_invoices_are_scoped_to_their_owner() {
    let state = test_state().await;
    let app = test::init_service(build_app(state.clone(), session_settings())).await;

    let resp = test::call_service(&app, register_request("ivy@example.com").to_request()).await;
    let owner_cookie = session_cookie(&resp);
    let resp = test::call_service(&app, register_request("jack@example.com").to_request()).await;
    let other_cookie = session_cookie(&resp);
    let owner = user_id(&state, "ivy@example.com").await;

    test::call_service(
        &app,
        post_form(
            "/dashboard/projects",
            &owner_cookie,
            &[("id", ""), ("name", "Lighthouse"), ("client_id", "1"), ("progress", "60")],
        )
        .to_request(),
    )
    .await;
    test::call_service(
        &app,
        post_form(
            "/dashboard/invoices",
            &owner_cookie,
            &[
                ("id", ""),
                ("client_id", "1"),
                ("amount", "900"),
                ("tax_rate", "0"),
                ("notes", "Lighthouse retainer"),
                ("issue_date", "2025-04-01"),
                ("due_date", "2025-05-01"),
            ],
        )
        .to_request(),
    )
    .await;
    let project_id = db::list_projects(&state, owner).await.unwrap()[0].id.clone();
    let invoice_id = db::list_invoices(&state, owner).await.unwrap()[0].id.clone();

    let resp = test::call_service(&app, get("/dashboard/projects", &other_cookie).to_request()).await;
    assert!(!body_text(resp).await.contains("Lighthouse"));
    let resp = test::call_service(&app, get("/dashboard/invoices", &other_cookie).to_request()).await;
    assert!(!body_text(resp).await.contains("INV-000001"));

    let resp = test::call_service(
        &app,
        get(&format!("/dashboard/projects?edit={}", project_id), &other_cookie).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = test::call_service(
        &app,
        get(&format!("/dashboard/invoices?edit={}", invoice_id), &other_cookie).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/projects",
            &other_cookie,
            &[("id", project_id.as_str()), ("name", "Taken"), ("client_id", "1"), ("progress", "100")],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = test::call_service(
        &app,
        post_form(
            "/dashboard/invoices",
            &other_cookie,
            &[
                ("id", invoice_id.as_str()),
                ("client_id", "1"),
                ("amount", "1"),
                ("status", "paid"),
                ("issue_date", "2025-04-01"),
                ("due_date", "2025-05-01"),
            ],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for uri in [
        format!("/dashboard/projects/{}/delete", project_id),
        format!("/dashboard/invoices/{}/delete", invoice_id),
    ] {
        let resp = test::call_service(&app, post_form(&uri, &other_cookie, &[]).to_request()).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let project = db::get_project(&state, owner, &project_id).await.unwrap().unwrap();
    assert_eq!(project.name, "Lighthouse");
    assert_eq!(project.progress, 60);
    let invoice = db::get_invoice(&state, owner, &invoice_id).await.unwrap().unwrap();
    assert_eq!(invoice.status, "pending");
    assert!((invoice.total_amount - 900.0).abs() < 1e-9);
}
