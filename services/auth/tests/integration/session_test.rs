use jupiter_auth::error::AuthServiceError;
use jupiter_auth::usecase::login::{LoginInput, LoginOutput};
use jupiter_auth::usecase::session::{RevokeOutcome, SkipReason};
use jupiter_domain::id::SessionId;

use crate::helpers::{
    Harness, MockSessionRepo, MockUserRepo, TEST_CLIENT_ADDRESS, TEST_EMAIL, fresh_code,
};

/// Log `email` in through a freshly planted code.
async fn logged_in(h: &Harness, email: &str) -> LoginOutput {
    h.codes
        .codes
        .lock()
        .unwrap()
        .insert(email.to_owned(), fresh_code(email, "123456"));
    h.login()
        .execute(LoginInput {
            email: email.to_owned(),
            code: "123456".to_owned(),
            client_address: TEST_CLIENT_ADDRESS.to_owned(),
        })
        .await
        .unwrap()
}

// ── RefreshTokenUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_rotate_tokens_for_live_session() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    let out = h.refresh().execute(Some(&login.refresh_token)).await.unwrap();

    assert_eq!(out.session_id, login.session_id);
    let identity = h.tokens.verify_refresh_token(&out.refresh_token).unwrap();
    assert_eq!(identity.session_id, login.session_id);
    assert!(h.sessions.contains(login.session_id));
}

#[tokio::test]
async fn should_keep_rotating_with_latest_token() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    let first = h.refresh().execute(Some(&login.refresh_token)).await.unwrap();
    let second = h.refresh().execute(Some(&first.refresh_token)).await.unwrap();

    assert_eq!(second.session_id, login.session_id);
}

#[tokio::test]
async fn should_reject_refresh_without_token() {
    let h = Harness::default();
    let result = h.refresh().execute(None).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_garbage_refresh_token() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    let result = h.refresh().execute(Some("not-a-jwt")).await;

    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
    assert!(h.sessions.contains(login.session_id));
}

#[tokio::test]
async fn should_reject_access_token_used_as_refresh_token() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    let result = h.refresh().execute(Some(&login.access_token)).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_well_signed_token_of_deleted_session() {
    let h = Harness::default();
    let orphan = h.tokens.sign_refresh_token(SessionId::generate()).unwrap();

    assert!(h.tokens.verify_refresh_token(&orphan.token).is_ok());
    let result = h.refresh().execute(Some(&orphan.token)).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_revoke_session_whose_user_is_gone() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;
    h.users.users.lock().unwrap().clear();

    let result = h.refresh().execute(Some(&login.refresh_token)).await;

    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
    assert!(!h.sessions.contains(login.session_id));
}

#[tokio::test]
async fn should_surface_store_failure_as_internal() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;
    let broken = Harness {
        sessions: MockSessionRepo::broken(),
        tokens: h.tokens.clone(),
        ..Harness::default()
    };

    let result = broken.refresh().execute(Some(&login.refresh_token)).await;

    assert!(
        matches!(result, Err(AuthServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_session_when_refresh_fails_on_store_error() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;
    let flaky = Harness {
        sessions: h.sessions.clone(),
        users: MockUserRepo::broken(),
        tokens: h.tokens.clone(),
        ..Harness::default()
    };

    let result = flaky.refresh().execute(Some(&login.refresh_token)).await;

    assert!(matches!(result, Err(AuthServiceError::Internal(_))));
    assert!(h.sessions.contains(login.session_id));
    h.refresh().execute(Some(&login.refresh_token)).await.unwrap();
}

// ── LogoutUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_logout_and_invalidate_refresh_token() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    let outcome = h.logout().execute(Some(&login.refresh_token)).await;

    assert_eq!(outcome, RevokeOutcome::Revoked { sessions: 1 });
    assert!(!h.sessions.contains(login.session_id));
    let result = h.refresh().execute(Some(&login.refresh_token)).await;
    assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
}

#[tokio::test]
async fn should_only_revoke_the_named_session() {
    let h = Harness::default();
    let first = logged_in(&h, TEST_EMAIL).await;
    let second = logged_in(&h, TEST_EMAIL).await;

    h.logout().execute(Some(&first.refresh_token)).await;

    assert!(h.sessions.contains(second.session_id));
    h.refresh().execute(Some(&second.refresh_token)).await.unwrap();
}

#[tokio::test]
async fn should_skip_logout_for_each_unresolvable_token() {
    let h = Harness::default();
    let orphan = h.tokens.sign_refresh_token(SessionId::generate()).unwrap();

    assert_eq!(
        h.logout().execute(None).await,
        RevokeOutcome::Skipped(SkipReason::MissingCookie)
    );
    assert_eq!(
        h.logout().execute(Some("not-a-jwt")).await,
        RevokeOutcome::Skipped(SkipReason::InvalidToken)
    );
    assert_eq!(
        h.logout().execute(Some(&orphan.token)).await,
        RevokeOutcome::Skipped(SkipReason::SessionNotFound)
    );
}

#[tokio::test]
async fn should_skip_logout_when_store_fails() {
    let h = Harness {
        sessions: MockSessionRepo::broken(),
        ..Harness::default()
    };
    let token = h.tokens.sign_refresh_token(SessionId::generate()).unwrap();

    assert_eq!(
        h.logout().execute(Some(&token.token)).await,
        RevokeOutcome::Skipped(SkipReason::StoreError)
    );
}

#[tokio::test]
async fn should_treat_repeated_logout_as_no_op() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    h.logout().execute(Some(&login.refresh_token)).await;
    let again = h.logout().execute(Some(&login.refresh_token)).await;

    assert_eq!(again, RevokeOutcome::Skipped(SkipReason::SessionNotFound));
}

// ── LogoutAllSessionsUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_revoke_every_session_of_the_user() {
    let h = Harness::default();
    let sessions = [
        logged_in(&h, TEST_EMAIL).await,
        logged_in(&h, TEST_EMAIL).await,
        logged_in(&h, TEST_EMAIL).await,
    ];
    let other = logged_in(&h, "b@x.com").await;

    let outcome = h.logout_all().execute(Some(&sessions[1].refresh_token)).await;

    assert_eq!(outcome, RevokeOutcome::Revoked { sessions: 3 });
    for login in &sessions {
        let result = h.refresh().execute(Some(&login.refresh_token)).await;
        assert!(matches!(result, Err(AuthServiceError::Unauthorized)));
    }
    assert!(h.sessions.contains(other.session_id));
    h.refresh().execute(Some(&other.refresh_token)).await.unwrap();
}

#[tokio::test]
async fn should_skip_logout_all_without_token() {
    let h = Harness::default();
    let login = logged_in(&h, TEST_EMAIL).await;

    assert_eq!(
        h.logout_all().execute(None).await,
        RevokeOutcome::Skipped(SkipReason::MissingCookie)
    );
    assert!(h.sessions.contains(login.session_id));
}
