use crate::{
    auth::{AuthClient, AuthFlow, AuthMode, FlowError},
    cli::{
        actions::login::{already_signed_in, reveal_downloads},
        globals::GlobalArgs,
        prompt::Prompter,
    },
    shell::Shell,
};
use anyhow::{Result, bail};
use secrecy::SecretString;
use tokio::io::AsyncBufRead;

#[derive(Debug, Default)]
pub struct Args {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

/// Two steps: details first, then the emailed code. A rejected code can be
/// re-entered; an empty answer cancels.
///
/// # Errors
/// Returns an error if a prompt fails, the code cannot be sent, signup is
/// cancelled, or the account was created but the follow-up sign-in failed.
pub async fn sign_up<R: AsyncBufRead + Unpin>(
    flow: &mut AuthFlow,
    prompter: &mut Prompter<R>,
    args: Args,
) -> Result<()> {
    let name = prompter.or_ask(args.name, "Full name").await?;
    let email = prompter.or_ask(args.email, "Email").await?;
    let password = prompter.secret_or_ask(args.password, "Password").await?;

    let notice = flow.request_code(&name, &email, password).await?;
    println!("{notice}");

    loop {
        let code = prompter.line("Verification code").await?;
        if code.is_empty() {
            bail!("signup cancelled: no verification code entered");
        }

        match flow.complete_signup(&code).await {
            Ok((_, notice)) => {
                println!("{notice}");
                return Ok(());
            }
            Err(err @ FlowError::Register(_)) => eprintln!("{err}"),
            Err(err @ FlowError::LoginAfterRegister(_)) => {
                eprintln!("Your account exists; sign in with `xuper login`.");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// # Errors
/// See [`sign_up`].
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let store = globals.store();
    let mut shell = Shell::init(store.clone());
    if already_signed_in(&shell) {
        return Ok(());
    }

    let api = globals.api(store)?;
    let mut flow = AuthFlow::new(AuthClient::new(api.clone()), AuthMode::Signup);
    let mut prompter = Prompter::stdin();

    sign_up(&mut flow, &mut prompter, args).await?;

    reveal_downloads(&mut shell, api).await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        auth::VerificationStage,
        config::ClientConfig,
        http::ApiClient,
        session::SessionStore,
    };
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc, time::Duration};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn signup_flow(uri: &str) -> (AuthFlow, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::in_memory());
        let config = ClientConfig::new(uri, Duration::from_secs(2), "/nonexistent").unwrap();
        let api = ApiClient::new(config, store.clone()).unwrap();
        (AuthFlow::new(AuthClient::new(api), AuthMode::Signup), store)
    }

    async fn mount_code_and_register(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/xuper/verify-email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/xuper/register"))
            .and(body_partial_json(json!({"verificationCode": "000000"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid code"})))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/xuper/register"))
            .and(body_partial_json(json!({
                "name": "Ana",
                "email": "ana@xuper.app",
                "password": "hunter22",
                "verificationCode": "123456"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "1", "name": "Ana"})))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_rejected_code_can_be_reentered() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        mount_code_and_register(&server).await;
        Mock::given(method("POST"))
            .and(path("/xuper/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt",
                "_id": "1",
                "name": "Ana",
                "email": "ana@xuper.app"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut flow, store) = signup_flow(&server.uri());
        let mut prompter =
            Prompter::new(&b"Ana\nana@xuper.app\nhunter22\n000000\n123456\n"[..]);

        sign_up(&mut flow, &mut prompter, Args::default())
            .await
            .unwrap();

        assert_eq!(store.load().unwrap().user.name, "Ana");
        assert_eq!(flow.registration().stage(), VerificationStage::AwaitingCode);
    }

    #[tokio::test]
    async fn test_failed_login_after_register_stops_asking() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        mount_code_and_register(&server).await;
        Mock::given(method("POST"))
            .and(path("/xuper/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let (mut flow, store) = signup_flow(&server.uri());
        let mut prompter = Prompter::new(
            &b"Ana\nana@xuper.app\nhunter22\n000000\n123456\nleftover\n"[..],
        );

        let err = sign_up(&mut flow, &mut prompter, Args::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FlowError>(),
            Some(FlowError::LoginAfterRegister(_))
        ));
        assert!(store.load().is_none());
        assert_eq!(prompter.line("Next").await.unwrap(), "leftover");
    }

    #[tokio::test]
    async fn test_empty_code_cancels() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xuper/verify-email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/xuper/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "1"})))
            .expect(0)
            .mount(&server)
            .await;

        let (mut flow, _) = signup_flow(&server.uri());
        let args = Args {
            name: Some("Ana".to_string()),
            email: Some("ana@xuper.app".to_string()),
            password: Some(SecretString::from("hunter22")),
        };
        let mut prompter = Prompter::new(&b"\n"[..]);

        let err = sign_up(&mut flow, &mut prompter, args).await.unwrap_err();
        assert!(err.to_string().contains("signup cancelled"));
    }
}
