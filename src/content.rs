//! Download links for the Xuper apps. The backend hands out one package URL
//! per platform; `xptv` is the mobile build and `xprtv` the TV build.

use crate::{
    error::{Error, Result},
    http::ApiClient,
};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info, instrument};

const DOWNLOAD_PATH: &str = "/api/xuper/download";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Mobile,
    Tv,
}

impl Platform {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Mobile => "xuper-mobile.apk",
            Self::Tv => "xuper-tv.apk",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Tv => "TV",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "mobile" | "phone" => Ok(Self::Mobile),
            "tv" => Ok(Self::Tv),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLinks {
    #[serde(default)]
    pub xptv: String,
    #[serde(default)]
    pub xprtv: String,
}

impl DownloadLinks {
    /// URL for one platform.
    ///
    /// # Errors
    /// `Error::DownloadUnavailable` when the backend sent an empty URL.
    pub fn link(&self, platform: Platform) -> Result<&str> {
        let url = match platform {
            Platform::Mobile => self.xptv.trim(),
            Platform::Tv => self.xprtv.trim(),
        };
        if url.is_empty() {
            Err(Error::DownloadUnavailable(platform.label()))
        } else {
            Ok(url)
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContentClient {
    api: ApiClient,
}

impl ContentClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns the mapped HTTP error if the links cannot be fetched.
    pub async fn downloads(&self) -> Result<DownloadLinks> {
        self.api.get_json(DOWNLOAD_PATH).await
    }

    /// Streams the platform package into `destination`. Returns the bytes written.
    ///
    /// The body goes to a `.part` file next to `destination`, renamed into
    /// place once complete; a failed transfer leaves `destination` untouched.
    ///
    /// # Errors
    /// `DownloadUnavailable` for an empty link, the mapped HTTP error if the
    /// request fails, `DownloadInterrupted` if the body stops short, or
    /// `Storage` if the file cannot be written.
    #[instrument(skip(self, links, destination))]
    pub async fn fetch_to(
        &self,
        links: &DownloadLinks,
        platform: Platform,
        destination: impl AsRef<Path>,
    ) -> Result<u64> {
        let url = links.link(platform)?;
        let mut response = self.api.fetch(url).await?;

        let destination = destination.as_ref();
        let partial = partial_path(destination);
        let result: Result<u64> = async {
            let written = stream_to(&mut response, &partial).await?;
            fs::rename(&partial, destination).await?;
            Ok(written)
        }
        .await;
        let written = match result {
            Ok(written) => written,
            Err(err) => {
                if let Err(remove_err) = fs::remove_file(&partial).await {
                    debug!("failed to remove partial download: {remove_err}");
                }
                return Err(err);
            }
        };

        info!(bytes = written, "download complete");
        Ok(written)
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut partial = destination.as_os_str().to_owned();
    partial.push(".part");
    PathBuf::from(partial)
}

async fn stream_to(response: &mut Response, path: &Path) -> Result<u64> {
    let mut file = File::create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| Error::DownloadInterrupted(err.to_string()))?
    {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
