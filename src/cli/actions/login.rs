use crate::{
    auth::{AuthClient, AuthFlow, AuthMode, Notice},
    cli::{
        actions::{downloads::print_links, status::print_view},
        globals::GlobalArgs,
        prompt::Prompter,
    },
    content::ContentClient,
    http::ApiClient,
    shell::{Section, Shell, View},
};
use anyhow::Result;
use secrecy::SecretString;
use tokio::io::AsyncBufRead;
use tracing::warn;

#[derive(Debug, Default)]
pub struct Args {
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

/// Prints the signed-in notice and returns `true` when a session already exists.
pub fn already_signed_in(shell: &Shell) -> bool {
    let Some(name) = shell.display_name() else {
        return false;
    };
    println!("Already signed in as {name}. Run `xuper logout` to switch accounts.");
    true
}

/// Shows what a fresh sign-in unlocked: the view and, once the reveal fires,
/// the download links. Missing links are logged, not fatal.
pub async fn reveal_downloads(shell: &mut Shell, api: ApiClient) {
    let Some(reveal) = shell.on_auth_success() else {
        return;
    };
    let section = reveal.wait().await;
    print_view(shell);

    if section != Section::Downloads || shell.view() == View::Admin {
        return;
    }
    match ContentClient::new(api).downloads().await {
        Ok(links) => print_links(&links),
        Err(err) => warn!(error = %err, "download links unavailable"),
    }
}

/// Asks for whatever `args` leaves out and signs in.
///
/// # Errors
/// Returns an error if a prompt fails, a required field is blank, or the
/// backend rejects the sign-in.
pub async fn sign_in<R: AsyncBufRead + Unpin>(
    flow: &mut AuthFlow,
    prompter: &mut Prompter<R>,
    args: Args,
) -> Result<Notice> {
    let email = prompter.or_ask(args.email, "Email").await?;
    let password = prompter.secret_or_ask(args.password, "Password").await?;

    let (_, notice) = flow.login(&email, password).await?;
    Ok(notice)
}

/// # Errors
/// See [`sign_in`].
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let store = globals.store();
    let mut shell = Shell::init(store.clone());
    if already_signed_in(&shell) {
        return Ok(());
    }

    let api = globals.api(store)?;
    let mut flow = AuthFlow::new(AuthClient::new(api.clone()), AuthMode::Login);
    let mut prompter = Prompter::stdin();

    let notice = sign_in(&mut flow, &mut prompter, args).await?;
    println!("{notice}");

    reveal_downloads(&mut shell, api).await;
    Ok(())
}
