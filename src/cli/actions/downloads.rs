use crate::{
    cli::globals::GlobalArgs,
    content::{ContentClient, DownloadLinks, Platform},
    shell::Shell,
};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct Args {
    pub platform: Option<Platform>,
    pub output: Option<PathBuf>,
}

pub fn print_links(links: &DownloadLinks) {
    for platform in [Platform::Mobile, Platform::Tv] {
        match links.link(platform) {
            Ok(url) => println!("{:<8}{url}", platform.label()),
            Err(_) => println!("{:<8}unavailable", platform.label()),
        }
    }
}

/// Lists the download links, or saves one package when a platform is given.
///
/// # Errors
/// Returns an error if nobody is signed in, or the links or package cannot be
/// fetched.
pub async fn execute(args: Args, globals: &GlobalArgs) -> Result<()> {
    let store = globals.store();
    if !Shell::init(store.clone()).is_authenticated() {
        bail!("downloads are available after signing in: run `xuper login`");
    }

    let content = ContentClient::new(globals.api(store)?);
    let links = content
        .downloads()
        .await
        .context("failed to fetch download links")?;

    let Some(platform) = args.platform else {
        print_links(&links);
        return Ok(());
    };

    let destination = args
        .output
        .unwrap_or_else(|| PathBuf::from(platform.file_name()));
    let bytes = content
        .fetch_to(&links, platform, &destination)
        .await
        .with_context(|| format!("failed to download the {platform} package"))?;

    println!(
        "Saved {platform} package to {} ({bytes} bytes)",
        destination.display()
    );
    Ok(())
}
