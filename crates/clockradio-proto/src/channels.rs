//! Channel list loading.
//!
//! The list file is UTF-8 text, one `name|url[|format]` entry per line.
//! Blank lines and `#` comments are ignored.  Bad lines are logged and
//! skipped; they never fail the load.

use std::collections::HashMap;
use std::path::Path;

use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("no name specified")]
    MissingName,
    #[error("invalid url \"{0}\"")]
    InvalidUrl(String),
}

/// A named stream.  Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    name: String,
    url: String,
    format: Option<String>,
}

impl Channel {
    pub fn new(name: &str, url: &str) -> Result<Self, ChannelError> {
        Self::with_format(name, url, None)
    }

    pub fn with_format(name: &str, url: &str, format: Option<&str>) -> Result<Self, ChannelError> {
        if !is_valid_name(name) {
            return Err(ChannelError::MissingName);
        }
        if !is_valid_url(url) {
            return Err(ChannelError::InvalidUrl(url.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            format: format.filter(|f| !f.is_empty()).map(str::to_string),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Optional third field.  Carried but not used for playback.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// `scheme://host/path`, all three non-empty.
fn is_valid_url(raw: &str) -> bool {
    let Some((scheme, rest)) = raw.split_once("://") else {
        return false;
    };
    let Some((host, _path)) = rest.split_once('/') else {
        return false;
    };
    if scheme.is_empty() || host.is_empty() {
        return false;
    }
    url::Url::parse(raw).is_ok()
}

/// Ordered channel list plus name lookup.  Rebuilt wholesale on each load.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    order: Vec<String>,
    by_name: HashMap<String, Channel>,
}

impl ChannelRegistry {
    pub fn parse(source: &str) -> Self {
        let mut registry = Self::default();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('|').map(str::trim).collect();
            if fields.len() < 2 {
                warn!("skipping invalid line {}: not enough fields", line_no);
                continue;
            }

            match Channel::with_format(fields[0], fields[1], fields.get(2).copied()) {
                Ok(channel) => registry.insert(channel),
                Err(e) => warn!("skipping invalid line {}: {}", line_no, e),
            }
        }

        info!("found {} channel(s)", registry.order.len());
        for name in &registry.order {
            info!("  {}", name);
        }
        registry
    }

    /// Read and parse the list file.  A missing or unreadable file yields an
    /// empty registry.
    pub fn load(path: &Path) -> Self {
        info!("loading channels from {:?}", path);
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                error!("could not read channel list {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn insert(&mut self, channel: Channel) {
        let name = channel.name().to_string();
        if self.by_name.insert(name.clone(), channel).is_some() {
            warn!("overwriting channel \"{}\"", name);
        } else {
            self.order.push(name);
        }
    }

    /// Channel names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }
}
