//! Opening URLs in an external browser

use crate::error::{Error, Result};
use std::process::{Command, Stdio};

const BROWSERS: &[&str] = &[
    "xdg-open",
    "gnome-open",
    "kfmclient openURL",
    "sensible-browser",
    "firefox",
    "epiphany",
    "iceweasel",
    "seamonkey",
    "galeon",
    "mozilla",
    "opera",
    "konqueror",
    "netscape",
    "links -g",
];

/// Commands tried for a URL: `$BROWSER` first when set, then the fallbacks
fn candidates(env_browser: Option<String>) -> Vec<String> {
    env_browser
        .filter(|b| !b.trim().is_empty())
        .into_iter()
        .chain(BROWSERS.iter().map(|b| b.to_string()))
        .collect()
}

fn spawn(command_line: &str, url: &str) -> bool {
    let mut parts = command_line.split_whitespace();
    let Some(program) = parts.next() else {
        return false;
    };

    Command::new(program)
        .args(parts)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .is_ok()
}

/// Open `url` with the first browser that can be started
pub fn open_url(url: &str) -> Result<()> {
    for browser in candidates(std::env::var("BROWSER").ok()) {
        if spawn(&browser, url) {
            tracing::debug!(browser = %browser, url, "Opened URL");
            return Ok(());
        }
    }

    tracing::warn!(url, "Couldn't find a Web browser");
    Err(Error::NoBrowser(url.to_string()))
}
