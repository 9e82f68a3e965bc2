//! Portfolio content.
//!
//! The command handlers only read from a [`ContentProvider`]; they never
//! validate or mutate what it returns. [`Portfolio`] is the bundled
//! implementation and can be loaded from a TOML or JSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Read-only source of portfolio facts.
pub trait ContentProvider: Send + Sync {
    fn profile(&self) -> &Profile;
    fn social_links(&self) -> &[SocialLink];
    fn projects(&self) -> &[Project];
    fn stack(&self) -> &[StackCategory];
    fn resume_url(&self) -> Option<&str>;
    fn media(&self) -> &MediaLinks;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackCategory {
    pub category: String,
    pub technologies: Vec<String>,
}

/// External channels linked by the `blog`, `videos` and `podcasts` commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaLinks {
    pub blog: Option<String>,
    pub videos: Option<String>,
    pub podcasts: Option<String>,
}

/// Bundled content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub stack: Vec<StackCategory>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub media: MediaLinks,
}

impl Portfolio {
    /// Loads content from `path`, or returns the bundled sample when no path
    /// is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Loads content from a file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content from {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse content from {}", path.display()))
        } else {
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse content from {}", path.display()))
        }
    }

    /// Sample portfolio shipped with the binary.
    pub fn builtin() -> Self {
        fn link(platform: &str, url: &str) -> SocialLink {
            SocialLink {
                platform: platform.to_string(),
                url: url.to_string(),
            }
        }
        fn project(name: &str, description: &str, url: &str) -> Project {
            Project {
                name: name.to_string(),
                description: description.to_string(),
                url: url.to_string(),
            }
        }
        fn category(name: &str, technologies: &[&str]) -> StackCategory {
            StackCategory {
                category: name.to_string(),
                technologies: technologies.iter().map(ToString::to_string).collect(),
            }
        }

        Self {
            profile: Profile {
                name: "Jordan Avery".to_string(),
                email: "hello@jordanavery.dev".to_string(),
                bio: "Software engineer who enjoys building fast tools, small languages \
                      and the occasional terminal toy."
                    .to_string(),
                skills: vec![
                    "Systems programming".to_string(),
                    "Distributed services".to_string(),
                    "Developer tooling".to_string(),
                ],
                location: "Lisbon, Portugal".to_string(),
            },
            social: vec![
                link("GitHub", "https://github.com/jordanavery"),
                link("LinkedIn", "https://www.linkedin.com/in/jordanavery"),
                link("Mastodon", "https://hachyderm.io/@jordanavery"),
            ],
            projects: vec![
                project(
                    "termfolio",
                    "A portfolio that pretends to be a shell",
                    "https://github.com/jordanavery/termfolio",
                ),
                project(
                    "tinykv",
                    "Log-structured key-value store with a tiny footprint",
                    "https://github.com/jordanavery/tinykv",
                ),
                project(
                    "lexi",
                    "Incremental lexer generator for editor tooling",
                    "https://github.com/jordanavery/lexi",
                ),
            ],
            stack: vec![
                category("Languages", &["Rust", "TypeScript", "Go", "SQL"]),
                category("Backend", &["tokio", "axum", "PostgreSQL", "Redis"]),
                category("Frontend", &["React", "Svelte", "Tailwind CSS"]),
                category("Tooling", &["Git", "Nix", "Docker", "GitHub Actions"]),
            ],
            resume_url: Some("https://jordanavery.dev/resume.pdf".to_string()),
            media: MediaLinks {
                blog: Some("https://jordanavery.dev/blog".to_string()),
                videos: Some("https://www.youtube.com/@jordanavery".to_string()),
                podcasts: Some("https://jordanavery.dev/podcasts".to_string()),
            },
        }
    }
}

impl ContentProvider for Portfolio {
    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn social_links(&self) -> &[SocialLink] {
        &self.social
    }

    fn projects(&self) -> &[Project] {
        &self.projects
    }

    fn stack(&self) -> &[StackCategory] {
        &self.stack
    }

    fn resume_url(&self) -> Option<&str> {
        self.resume_url.as_deref()
    }

    fn media(&self) -> &MediaLinks {
        &self.media
    }
}
