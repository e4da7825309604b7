use hut_auth::domain::repository::{PendingActionStore, UserDirectory};
use hut_auth::domain::types::FlowKind;
use hut_auth::error::AuthServiceError;
use hut_auth::usecase::signup::{
    SignupRequestInput, SignupRequestUseCase, SignupVerifyInput, SignupVerifyUseCase,
};

use crate::helpers::{TEST_OTP_SECRET, TestBackends, seed_user};

fn request_usecase(
    backends: &TestBackends,
) -> SignupRequestUseCase<
    hut_auth::infra::memory::MemoryPendingStore,
    hut_auth::infra::mailer::MemoryMailer,
    hut_auth::infra::directory::MemoryUserDirectory,
> {
    SignupRequestUseCase {
        store: backends.store.clone(),
        mailer: backends.mailer.clone(),
        directory: backends.directory.clone(),
        limiter: backends.limiter.clone(),
        hasher: backends.hasher.clone(),
        otp_secret: TEST_OTP_SECRET.to_owned(),
    }
}

fn verify_usecase(
    backends: &TestBackends,
) -> SignupVerifyUseCase<
    hut_auth::infra::memory::MemoryPendingStore,
    hut_auth::infra::directory::MemoryUserDirectory,
> {
    SignupVerifyUseCase {
        store: backends.store.clone(),
        directory: backends.directory.clone(),
        otp_secret: TEST_OTP_SECRET.to_owned(),
    }
}

fn signup_input(email: &str, username: &str) -> SignupRequestInput {
    SignupRequestInput {
        email: email.to_owned(),
        name: "New User".to_owned(),
        username: username.to_owned(),
        password: "long-enough-password".to_owned(),
    }
}

#[tokio::test]
async fn should_verify_signup_exactly_once() {
    let backends = TestBackends::new();
    request_usecase(&backends)
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();

    let code = backends.mailer.last_code_for("a@x.com").unwrap();
    let user = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: code.clone(),
        })
        .await
        .unwrap();
    assert_eq!(user.username, "newuser");
    assert!(
        backends
            .directory
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .is_some()
    );

    // Same correct code a second time: the action is gone.
    let second = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: code,
        })
        .await;
    assert!(matches!(second, Err(AuthServiceError::Verification)));
}

#[tokio::test]
async fn should_burn_code_on_wrong_guess() {
    let backends = TestBackends::new();
    request_usecase(&backends)
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();
    let code = backends.mailer.last_code_for("a@x.com").unwrap();
    let wrong = if code == "123456" { "654321" } else { "123456" };

    let first = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: wrong.to_owned(),
        })
        .await;
    assert!(matches!(first, Err(AuthServiceError::Verification)));

    // One wrong guess consumed the action; the right code no longer works.
    let second = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: code,
        })
        .await;
    assert!(matches!(second, Err(AuthServiceError::Verification)));
}

#[tokio::test]
async fn should_invalidate_previous_code_on_resend() {
    let backends = TestBackends::new();
    let usecase = request_usecase(&backends);
    usecase
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();
    let first_code = backends.mailer.last_code_for("a@x.com").unwrap();

    usecase
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();
    let second_code = backends.mailer.last_code_for("a@x.com").unwrap();

    if first_code == second_code {
        // 1-in-900k collision; nothing to assert about supersede.
        return;
    }

    let result = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: first_code,
        })
        .await;
    assert!(matches!(result, Err(AuthServiceError::Verification)));
}

#[tokio::test]
async fn should_accept_latest_code_after_resend() {
    let backends = TestBackends::new();
    let usecase = request_usecase(&backends);
    usecase
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();
    usecase
        .execute(signup_input("a@x.com", "newuser"))
        .await
        .unwrap();

    let latest = backends.mailer.last_code_for("a@x.com").unwrap();
    let user = verify_usecase(&backends)
        .execute(SignupVerifyInput {
            email: "a@x.com".to_owned(),
            otp: latest,
        })
        .await
        .unwrap();
    assert_eq!(user.email, "a@x.com");
}

#[tokio::test]
async fn should_reject_taken_username_before_issuing_code() {
    let backends = TestBackends::new();
    seed_user(&backends.directory, "other@x.com", "newuser");

    let result = request_usecase(&backends)
        .execute(signup_input("a@x.com", "newuser"))
        .await;
    match result {
        Err(AuthServiceError::Precondition(message)) => {
            assert_eq!(message, "Username already taken");
        }
        other => panic!("expected Precondition, got {other:?}"),
    }
    assert!(backends.mailer.sent().is_empty());
    assert!(
        backends
            .store
            .get("a@x.com", FlowKind::UserSignup)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn should_reject_registered_email_before_issuing_code() {
    let backends = TestBackends::new();
    seed_user(&backends.directory, "a@x.com", "existing");

    let result = request_usecase(&backends)
        .execute(signup_input("a@x.com", "newuser"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::Precondition(_))));
    assert!(backends.mailer.sent().is_empty());
}

#[tokio::test]
async fn should_rate_limit_fourth_send_in_window() {
    let backends = TestBackends::new();
    let usecase = request_usecase(&backends);

    for _ in 0..3 {
        usecase
            .execute(signup_input("a@x.com", "newuser"))
            .await
            .unwrap();
    }
    let fourth = usecase.execute(signup_input("a@x.com", "newuser")).await;
    assert!(matches!(fourth, Err(AuthServiceError::RateLimited)));
    assert_eq!(backends.mailer.sent().len(), 3);
}

#[tokio::test]
async fn should_retain_pending_action_on_delivery_failure() {
    let backends = TestBackends::new();
    backends.mailer.set_failing(true);

    let result = request_usecase(&backends)
        .execute(signup_input("a@x.com", "newuser"))
        .await;
    assert!(matches!(result, Err(AuthServiceError::Delivery)));

    // The action stays so support channels could still complete the flow.
    assert!(
        backends
            .store
            .get("a@x.com", FlowKind::UserSignup)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn should_reject_malformed_signup_fields() {
    let backends = TestBackends::new();
    let usecase = request_usecase(&backends);

    let bad_email = usecase
        .execute(SignupRequestInput {
            email: "not-an-email".to_owned(),
            name: "New User".to_owned(),
            username: "newuser".to_owned(),
            password: "long-enough-password".to_owned(),
        })
        .await;
    assert!(matches!(bad_email, Err(AuthServiceError::Validation(_))));

    let bad_username = usecase
        .execute(SignupRequestInput {
            email: "a@x.com".to_owned(),
            name: "New User".to_owned(),
            username: "x".to_owned(),
            password: "long-enough-password".to_owned(),
        })
        .await;
    assert!(matches!(bad_username, Err(AuthServiceError::Validation(_))));

    let bad_password = usecase
        .execute(SignupRequestInput {
            email: "a@x.com".to_owned(),
            name: "New User".to_owned(),
            username: "newuser".to_owned(),
            password: "short".to_owned(),
        })
        .await;
    assert!(matches!(bad_password, Err(AuthServiceError::Validation(_))));
}
