/// Integration tests for request decoration and auth-failure handling
///
/// These tests verify that a rejected credential anywhere in the client:
/// - Tears the session down (memory and store)
/// - Shows the session-expired notification
/// - Sends the user back to the login screen
/// - Still fails the call that triggered it

mod common;

use common::TestContext;
use tasknest_client::api::SESSION_EXPIRED_MESSAGE;
use tasknest_client::session::{KeyValueStore, TOKEN_KEY, USER_KEY};
use tasknest_client::tasks::LOAD_FAILED_MESSAGE;
use tasknest_client::transport::Method;
use tasknest_client::ui::{auth_guard, sign_out, Navigator, Route};
use tasknest_shared::models::TaskForm;

#[tokio::test]
async fn test_expired_token_tears_session_down() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;
    let token = ctx.app.sessions.current_token().unwrap();
    ctx.server.revoke_token(&token).await;
    let mut changes = ctx.app.sessions.subscribe();

    let err = ctx.app.tasks.load_tasks().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(401));

    assert!(!ctx.app.sessions.is_authenticated());
    assert_eq!(ctx.store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(ctx.store.get(USER_KEY).unwrap(), None);
    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), None);

    assert_eq!(ctx.navigator.current_route(), Route::Login);
    assert_eq!(ctx.errors(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_forbidden_on_delete_resets_saving() {
    let (ctx, user) = TestContext::signed_in("a@a.com").await;
    let task = ctx.server.seed_task(&user.email, "Mine", false).await;
    ctx.app.tasks.load_tasks().await.unwrap();
    ctx.server.fail_next(Method::Delete, 403, Some("Forbidden")).await;

    let err = ctx.app.tasks.delete_task(&task).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(!ctx.app.tasks.is_saving());
    assert_eq!(ctx.app.tasks.tasks(), vec![task]);
    assert!(!ctx.app.sessions.is_authenticated());
    assert_eq!(ctx.navigator.current_route(), Route::Login);
}

#[tokio::test]
async fn test_unauthorized_submit_reports_and_unlocks() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;
    ctx.server.fail_next(Method::Post, 401, None).await;

    let err = ctx
        .app
        .tasks
        .submit_task(TaskForm::titled("X"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!ctx.app.tasks.is_saving());
    assert!(ctx.app.tasks.tasks().is_empty());
    assert!(!ctx.app.sessions.is_authenticated());
}

#[tokio::test]
async fn test_rejected_mutations_are_notified_once() {
    let (ctx, user) = TestContext::signed_in("a@a.com").await;
    let task = ctx.server.seed_task(&user.email, "Mine", false).await;
    ctx.app.tasks.load_tasks().await.unwrap();
    ctx.server.fail_next(Method::Post, 401, Some("Unauthorized")).await;

    ctx.app
        .tasks
        .submit_task(TaskForm::titled("X"))
        .await
        .unwrap_err();

    assert_eq!(ctx.errors(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
    assert_eq!(
        ctx.app.tasks.error_message(),
        Some("Unauthorized".to_string())
    );

    ctx.app.tasks.toggle_completed(&task).await.unwrap_err();
    ctx.app.tasks.delete_task(&task).await.unwrap_err();

    assert_eq!(
        ctx.errors(),
        vec![SESSION_EXPIRED_MESSAGE.to_string(); 3]
    );
}

#[tokio::test]
async fn test_no_redirect_when_already_on_login() {
    let ctx = TestContext::new([false; 0]);

    let err = ctx.app.tasks.load_tasks().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(ctx.navigator.visits().is_empty());
    assert_eq!(ctx.errors(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_requests_after_teardown_are_undecorated() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;
    ctx.server.fail_next(Method::Get, 401, None).await;

    ctx.app.tasks.load_tasks().await.unwrap_err();
    ctx.app.tasks.load_tasks().await.unwrap_err();

    let requests = ctx.server.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests[0].authorization.is_some());
    assert_eq!(requests[1].authorization, None);
}

#[tokio::test]
async fn test_other_errors_keep_the_session() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;
    ctx.server.fail_next(Method::Get, 500, None).await;

    ctx.app.tasks.load_tasks().await.unwrap_err();

    assert!(ctx.app.sessions.is_authenticated());
    assert_eq!(ctx.navigator.current_route(), Route::Tasks);
    assert_eq!(ctx.errors(), vec![LOAD_FAILED_MESSAGE.to_string()]);
}

#[tokio::test]
async fn test_task_list_guard_after_expiry() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;
    assert!(auth_guard(&ctx.app.sessions, ctx.navigator.as_ref()));

    ctx.server.fail_next(Method::Get, 401, None).await;
    ctx.app.tasks.load_tasks().await.unwrap_err();

    assert!(!auth_guard(&ctx.app.sessions, ctx.navigator.as_ref()));
    assert_eq!(ctx.navigator.current_route(), Route::Login);
}

#[tokio::test]
async fn test_sign_out_is_idempotent() {
    let (ctx, _) = TestContext::signed_in("a@a.com").await;

    sign_out(&ctx.app.sessions, ctx.navigator.as_ref());
    sign_out(&ctx.app.sessions, ctx.navigator.as_ref());

    assert!(!ctx.app.sessions.is_authenticated());
    assert!(ctx.store.is_empty());
    assert_eq!(ctx.navigator.current_route(), Route::Login);
    assert!(ctx.errors().is_empty());
}
