//! Validation of raw action inputs into a [`ResolvedConfiguration`].

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{RuntimeConfig, WarshipConfig};
use crate::error::ValidationError;
use crate::stamp::RunStamp;
use crate::tag::{CommitMessageSource, resolve_tag};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));

/// Action inputs exactly as received. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub tomcat_version: Option<String>,
    pub java_version: Option<String>,
    pub base_image: Option<String>,
    pub war_file: Option<String>,
    pub tomcat_extras_folder: Option<String>,
    pub ports: Option<String>,
    pub timezone: Option<String>,
    pub ep_files: Option<String>,
    pub image_name: Option<String>,
    pub tag_name: Option<String>,
}

/// Runner context the inputs are resolved against.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Checkout directory; also the docker build context
    pub workspace: PathBuf,
    /// `owner/repo`
    pub repository: Option<String>,
    /// Triggering event (`push`, `pull_request`, ...)
    pub event_name: Option<String>,
}

/// Base the custom image is layered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSelector {
    /// One of the published `<tomcat>-java<java>` runtime images
    Versions { tomcat: u32, java: u32 },
    /// Any caller-supplied image reference
    BaseImage(String),
}

impl RuntimeSelector {
    pub fn image_reference(&self, runtime: &RuntimeConfig) -> String {
        match self {
            Self::Versions { tomcat, java } => {
                format!("{}:{tomcat}-java{java}", runtime.image_repository)
            }
            Self::BaseImage(image) => image.clone(),
        }
    }
}

/// Validated, internally consistent inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub runtime: RuntimeSelector,
    /// WAR file, relative to the workspace
    pub archive: PathBuf,
    /// Directory copied over the Tomcat home, relative to the workspace
    pub extras_folder: Option<PathBuf>,
    pub ports: Vec<u16>,
    pub timezone: Option<String>,
    /// Files under the Tomcat home filled from environment variables at startup
    pub template_files: Vec<String>,
    pub image_name: String,
    pub tag_name: String,
}

impl ResolvedConfiguration {
    /// Validate `raw` against `context`, failing on the first problem found.
    ///
    /// Checks run in a fixed order: runtime selector, version format, WAR
    /// file, extras folder, ports, time zone. The tag is resolved only once everything
    /// else is valid.
    pub fn resolve(
        raw: &RawInputs,
        context: &ActionContext,
        settings: &WarshipConfig,
        commits: &dyn CommitMessageSource,
        stamp: RunStamp,
    ) -> Result<Self, ValidationError> {
        let runtime = resolve_runtime(raw)?;
        let archive = resolve_archive(raw, &context.workspace)?;
        let extras_folder = resolve_extras_folder(raw, &context.workspace)?;
        let ports = match non_empty(&raw.ports) {
            Some(ports) => parse_ports(ports)?,
            None => Vec::new(),
        };
        let timezone = non_empty(&raw.timezone)
            .map(parse_timezone)
            .transpose()?;
        let template_files = non_empty(&raw.ep_files)
            .map(parse_lines)
            .unwrap_or_default();

        let image_name = match non_empty(&raw.image_name) {
            Some(name) => name.to_owned(),
            None => default_image_name(settings, context.repository.as_deref())?,
        };
        let tag_name = resolve_tag(
            non_empty(&raw.tag_name),
            context.event_name.as_deref(),
            commits,
            stamp,
        );

        Ok(Self {
            runtime,
            archive,
            extras_folder,
            ports,
            timezone,
            template_files,
            image_name,
            tag_name,
        })
    }

    /// `<image-name>:<tag-name>`
    pub fn image_reference(&self) -> String {
        format!("{}:{}", self.image_name, self.tag_name)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_runtime(raw: &RawInputs) -> Result<RuntimeSelector, ValidationError> {
    let tomcat = non_empty(&raw.tomcat_version);
    let java = non_empty(&raw.java_version);
    let base_image = non_empty(&raw.base_image);
    let has_versions = tomcat.is_some() || java.is_some();

    match (has_versions, base_image) {
        (true, Some(_)) => Err(ValidationError::ConflictingRuntimeSelector),
        (false, None) => Err(ValidationError::MissingRuntimeSelector),
        (false, Some(image)) => Ok(RuntimeSelector::BaseImage(image.to_owned())),
        (true, None) => Ok(RuntimeSelector::Versions {
            tomcat: parse_version("tomcat-version", tomcat)?,
            java: parse_version("java-version", java)?,
        }),
    }
}

fn parse_version(field: &'static str, value: Option<&str>) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidVersionFormat {
        field,
        value: value.unwrap_or_default().to_owned(),
    };
    let value = value.filter(|v| DIGITS.is_match(v)).ok_or_else(&invalid)?;
    value.parse().map_err(|_| invalid())
}

fn resolve_archive(raw: &RawInputs, workspace: &Path) -> Result<PathBuf, ValidationError> {
    let war_file = non_empty(&raw.war_file)
        .map(PathBuf::from)
        .ok_or(ValidationError::MissingArchive)?;

    let full_path = workspace.join(&war_file);
    if !is_inside_workspace(&war_file) || !full_path.exists() {
        return Err(ValidationError::ArchiveNotFound(war_file));
    }
    if !full_path.is_file() {
        return Err(ValidationError::ArchiveNotAFile(war_file));
    }
    Ok(war_file)
}

fn resolve_extras_folder(
    raw: &RawInputs,
    workspace: &Path,
) -> Result<Option<PathBuf>, ValidationError> {
    let Some(folder) = non_empty(&raw.tomcat_extras_folder).map(PathBuf::from) else {
        return Ok(None);
    };

    let full_path = workspace.join(&folder);
    if !is_inside_workspace(&folder) || !full_path.exists() {
        return Err(ValidationError::ExtrasFolderNotFound(folder));
    }
    if !full_path.is_dir() {
        return Err(ValidationError::ExtrasFolderNotADirectory(folder));
    }
    Ok(Some(folder))
}

/// Only plain relative paths stay inside the build context; absolute paths
/// and `..` would point outside what `docker build` can see.
fn is_inside_workspace(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Parse a comma-separated port list, preserving order.
pub fn parse_ports(raw: &str) -> Result<Vec<u16>, ValidationError> {
    raw.split(',')
        .map(str::trim)
        .map(|token| match token.parse::<u16>() {
            Ok(port) if port != 0 && DIGITS.is_match(token) => Ok(port),
            _ => Err(ValidationError::InvalidPort(token.to_owned())),
        })
        .collect()
}

/// Zone names (`Area/Location`) never contain whitespace.
fn parse_timezone(raw: &str) -> Result<String, ValidationError> {
    if raw.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidTimezone(raw.to_owned()));
    }
    Ok(raw.to_owned())
}

/// Split a multi-line input, trimming each line and dropping blank ones.
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn default_image_name(
    settings: &WarshipConfig,
    repository: Option<&str>,
) -> Result<String, ValidationError> {
    let repository = repository
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(ValidationError::MissingRepository)?;
    Ok(format!("{}/{}", settings.publish.registry, repository).to_lowercase())
}
