use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use super::*;
use crate::fake_api::ScriptedBookApi;

struct Harness {
    api: Arc<ScriptedBookApi>,
    refreshes: Arc<AtomicUsize>,
    form: FormController,
}

fn harness() -> Harness {
    let api = Arc::new(ScriptedBookApi::new());
    let refreshes = Arc::new(AtomicUsize::new(0));
    let form = FormController::new(api.clone(), {
        let refreshes = refreshes.clone();
        move || {
            refreshes.fetch_add(1, Ordering::SeqCst);
        }
    });
    Harness {
        api,
        refreshes,
        form,
    }
}

fn fill(form: &mut FormController, name: &str, description: &str, publish_date: &str, price: &str) {
    form.set_field(DraftField::Name, name).expect("name");
    form.set_field(DraftField::Description, description)
        .expect("description");
    form.set_field(DraftField::PublishDate, publish_date)
        .expect("publish date");
    form.set_field(DraftField::Price, price).expect("price");
}

#[tokio::test]
async fn empty_name_is_rejected_without_network_call() {
    let mut h = harness();
    fill(&mut h.form, "", "x", "2024-01-01", "10");

    let err = h.form.submit().await.expect_err("must fail");

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(h.form.draft().error.as_deref(), Some(MISSING_FIELDS_MESSAGE));
    assert!(h.api.create_calls().await.is_empty());
    assert_eq!(h.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn any_missing_field_blocks_submission() {
    let complete = ["Dune", "Desert planet", "1965-08-01", "15.99"];
    for missing in DraftField::ALL {
        let mut h = harness();
        for (field, value) in DraftField::ALL.into_iter().zip(complete) {
            if field != missing {
                h.form.set_field(field, value).expect("set");
            }
        }

        h.form.submit().await.expect_err("must fail");
        assert_eq!(
            h.form.draft().error.as_deref(),
            Some(MISSING_FIELDS_MESSAGE),
            "missing {missing}"
        );
        assert!(h.api.create_calls().await.is_empty(), "missing {missing}");
    }
}

#[tokio::test]
async fn whitespace_only_text_counts_as_missing() {
    let mut h = harness();
    fill(&mut h.form, "Dune", "   ", "1965-08-01", "1");

    h.form.submit().await.expect_err("must fail");
    assert_eq!(h.form.draft().error.as_deref(), Some(MISSING_FIELDS_MESSAGE));
}

#[tokio::test]
async fn zero_price_is_a_valid_price() {
    let mut h = harness();
    h.api.push_create(Ok(())).await;
    fill(&mut h.form, "Free Book", "Public domain", "1900-01-01", "0");
    assert_eq!(h.form.draft().price, Some(0.0));

    h.form.submit().await.expect("submit");

    let calls = h.api.create_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].price, 0.0);
}

#[tokio::test]
async fn success_clears_draft_and_triggers_refresh() {
    let mut h = harness();
    h.api.push_create(Ok(())).await;
    fill(&mut h.form, " Dune ", "Desert planet", "1965-08-01", "15.99");

    h.form.submit().await.expect("submit");

    assert_eq!(h.form.draft(), &BookDraft::default());
    assert_eq!(h.refreshes.load(Ordering::SeqCst), 1);

    let calls = h.api.create_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "Dune");
    assert_eq!(calls[0].description, "Desert planet");
    assert_eq!(
        calls[0].publish_date,
        NaiveDate::from_ymd_opt(1965, 8, 1).expect("date")
    );
    assert_eq!(calls[0].price, 15.99);
}

#[tokio::test]
async fn success_after_failed_attempt_clears_error() {
    let mut h = harness();
    h.api
        .push_create(Err(ClientError::Server {
            status: 500,
            message: None,
        }))
        .await;
    h.api.push_create(Ok(())).await;
    fill(&mut h.form, "Dune", "Desert planet", "1965-08-01", "15.99");

    h.form.submit().await.expect_err("first attempt fails");
    assert_eq!(h.form.draft().error.as_deref(), Some(ADD_FAILED_MESSAGE));

    h.form.submit().await.expect("retry succeeds");
    assert_eq!(h.form.draft().error, None);
    assert!(h.form.draft().is_empty());
}

#[tokio::test]
async fn server_error_keeps_draft_and_surfaces_server_text() {
    let mut h = harness();
    h.api
        .push_create(Err(ClientError::Server {
            status: 409,
            message: Some("A book with this name already exists".into()),
        }))
        .await;
    fill(&mut h.form, "Dune", "Desert planet", "1965-08-01", "15.99");
    let before = h.form.draft().clone();

    h.form.submit().await.expect_err("must fail");

    let after = h.form.draft();
    assert_eq!(after.name, before.name);
    assert_eq!(after.description, before.description);
    assert_eq!(after.publish_date, before.publish_date);
    assert_eq!(after.price, before.price);
    assert_eq!(
        after.error.as_deref(),
        Some("A book with this name already exists")
    );
    assert_eq!(h.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn format_failure_uses_generic_message() {
    let mut h = harness();
    h.api
        .push_create(Err(ClientError::Format("bad".into())))
        .await;
    fill(&mut h.form, "Dune", "Desert planet", "1965-08-01", "15.99");

    h.form.submit().await.expect_err("must fail");
    assert_eq!(h.form.draft().error.as_deref(), Some(ADD_FAILED_MESSAGE));
    assert_eq!(h.form.draft().name, "Dune");
}

#[tokio::test]
async fn malformed_date_is_rejected_locally() {
    let mut h = harness();
    fill(&mut h.form, "Dune", "Desert planet", "08/01/1965", "15.99");

    h.form.submit().await.expect_err("must fail");
    assert_eq!(h.form.draft().error.as_deref(), Some(INVALID_DATE_MESSAGE));
    assert!(h.api.create_calls().await.is_empty());
}

#[tokio::test]
async fn typed_negative_price_is_rejected_on_submit() {
    let mut h = harness();
    fill(&mut h.form, "Dune", "Desert planet", "1965-08-01", "");
    h.form.set_price(Some(-1.0));

    h.form.submit().await.expect_err("must fail");
    assert_eq!(h.form.draft().error.as_deref(), Some(INVALID_PRICE_MESSAGE));
    assert!(h.api.create_calls().await.is_empty());
}

#[test]
fn price_text_parsing() {
    let mut h = harness();

    h.form.set_field(DraftField::Price, "12.5").expect("price");
    assert_eq!(h.form.draft().price, Some(12.5));

    let err = h
        .form
        .set_field(DraftField::Price, "-3")
        .expect_err("negative");
    assert_eq!(err.kind(), crate::error::ClientErrorKind::Validation);
    assert_eq!(h.form.draft().price, Some(12.5), "draft left unchanged");

    h.form.set_field(DraftField::Price, "abc").expect_err("not a number");
    h.form.set_field(DraftField::Price, "NaN").expect_err("not finite");

    h.form.set_field(DraftField::Price, "  ").expect("blank unsets");
    assert_eq!(h.form.draft().price, None);
}

#[test]
fn reset_discards_draft() {
    let mut h = harness();
    fill(&mut h.form, "Dune", "Desert planet", "1965-08-01", "15.99");
    h.form.reset();
    assert!(h.form.draft().is_empty());
    assert_eq!(h.form.draft().error, None);
}

#[test]
fn field_names_parse_case_insensitively() {
    assert_eq!("Name".parse::<DraftField>().ok(), Some(DraftField::Name));
    assert_eq!(
        "publishDate".parse::<DraftField>().ok(),
        Some(DraftField::PublishDate)
    );
    assert!("isbn".parse::<DraftField>().is_err());
}
