use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single registry entry as contributed in `servers/<id>.json`.
///
/// This is the typed view used by the consistency checks. The bundle keeps
/// working on the JSON object itself so fields this model does not know
/// about survive aggregation untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerDefinition {
    /// Unique identifier (e.g., "com.github-mcp")
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional short alias for tool prefixing (e.g., "gh")
    pub alias: Option<String>,

    /// Short description (1-2 sentences)
    pub description: Option<String>,

    /// Optional icon (emoji or URL)
    pub icon: Option<String>,

    /// Category ids, resolved against `categories.json`
    #[serde(default)]
    pub categories: Vec<String>,

    /// Self-contained transport configuration (includes inputs!)
    pub transport: TransportConfig,

    /// Authentication configuration
    pub auth: Option<AuthConfig>,

    /// What the server exposes
    pub capabilities: Option<Capabilities>,

    /// Related links
    pub links: Option<ServerLinks>,

    /// Who submitted the definition
    pub contributor: Option<Contributor>,

    /// Publisher/vendor info
    pub publisher: Option<PublisherInfo>,

    /// Platform compatibility
    #[serde(default)]
    pub platforms: Vec<Platform>,

    /// Screenshots and other media
    pub media: Option<Media>,

    /// Tags for search/filtering
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ServerDefinition {
    pub fn requires_oauth(&self) -> bool {
        matches!(self.auth, Some(AuthConfig::Oauth { .. }))
    }

    /// Inputs declared by the transport
    pub fn inputs(&self) -> &[InputDefinition] {
        &self.transport.metadata().inputs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Stdio,
    Http,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::Stdio => "stdio",
            TransportType::Http => "http",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    Stdio {
        // Defaulted so a missing command surfaces as a consistency issue
        // rather than an undecodable file.
        #[serde(default)]
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: BTreeMap<String, String>,
        #[serde(default)]
        metadata: TransportMetadata,
    },
    Http {
        #[serde(default)]
        url: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        #[serde(default)]
        metadata: TransportMetadata,
    },
}

impl TransportConfig {
    /// Get the transport type
    pub fn transport_type(&self) -> TransportType {
        match self {
            TransportConfig::Stdio { .. } => TransportType::Stdio,
            TransportConfig::Http { .. } => TransportType::Http,
        }
    }

    /// Get metadata reference for this transport
    pub fn metadata(&self) -> &TransportMetadata {
        match self {
            TransportConfig::Stdio { metadata, .. } => metadata,
            TransportConfig::Http { metadata, .. } => metadata,
        }
    }

    /// The tool that launches this server, as far as the registry cares.
    pub fn launcher(&self) -> Launcher {
        match self {
            TransportConfig::Http { .. } => Launcher::Http,
            TransportConfig::Stdio { command, .. } => {
                // Strip any directory and Windows extension ("C:\\bin\\npx.cmd" -> "npx")
                let base = command
                    .rsplit(['/', '\\'])
                    .next()
                    .unwrap_or(command)
                    .trim_end_matches(".cmd")
                    .trim_end_matches(".exe");
                match base {
                    "npx" => Launcher::Npx,
                    "uvx" => Launcher::Uvx,
                    "docker" => Launcher::Docker,
                    _ => Launcher::Command(command.clone()),
                }
            }
        }
    }
}

/// How a descriptor's server process is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    Npx,
    Uvx,
    Docker,
    Http,
    /// Any other executable (e.g. a vendor CLI)
    Command(String),
}

/// Id suffixes that already name the launcher.
pub const LAUNCHER_SUFFIXES: &[&str] = &["-npx", "-uvx", "-docker", "-http", "-cli"];

impl Launcher {
    /// Short label used in inventories and id suffixes
    pub fn label(&self) -> &str {
        match self {
            Launcher::Npx => "npx",
            Launcher::Uvx => "uvx",
            Launcher::Docker => "docker",
            Launcher::Http => "http",
            Launcher::Command(cmd) => cmd.as_str(),
        }
    }

    /// Suffix a stdio id is expected to carry, if any.
    pub fn suffix(&self) -> &str {
        match self {
            Launcher::Npx => "-npx",
            Launcher::Uvx => "-uvx",
            Launcher::Docker => "-docker",
            Launcher::Http => "-http",
            Launcher::Command(_) => "-cli",
        }
    }
}

/// Returns true when `id` ends in one of the [`LAUNCHER_SUFFIXES`].
pub fn has_launcher_suffix(id: &str) -> bool {
    LAUNCHER_SUFFIXES.iter().any(|s| id.ends_with(s))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransportMetadata {
    /// Inputs required by this transport
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,
}

/// Input field type for user configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Single-line text input
    #[default]
    Text,
    /// Password/secret input (masked)
    Password,
    /// Numeric input
    Number,
    /// Boolean toggle
    Boolean,
    /// URL input with validation
    Url,
    /// Selection from predefined options
    Select,
    /// File path selection
    FilePath,
    /// Directory path selection
    DirectoryPath,
}

/// Guidance for obtaining an input value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObtainGuidance {
    /// URL where user can obtain this value
    pub url: Option<String>,
    /// Step-by-step instructions (markdown supported)
    pub instructions: Option<String>,
    /// Label for the "obtain" button
    pub button_label: Option<String>,
}

/// A substitutable variable referenced as `${input:ID}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub r#type: InputType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub secret: bool,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    /// Choices for `select` inputs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub obtain: Option<ObtainGuidance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    None,
    ApiKey { instructions: Option<String> },
    OptionalApiKey { instructions: Option<String> },
    Oauth { instructions: Option<String> },
    Basic { instructions: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Capabilities {
    #[serde(default)]
    pub tools: bool,
    #[serde(default)]
    pub resources: bool,
    #[serde(default)]
    pub prompts: bool,
    #[serde(default)]
    pub read_only_mode: bool,
}

/// Links related to the server
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerLinks {
    pub homepage: Option<String>,
    pub documentation: Option<String>,
    pub repository: Option<String>,
    pub issues: Option<String>,
    pub changelog: Option<String>,
    pub support: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub name: Option<String>,
    pub github: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherInfo {
    pub name: String,
    pub domain: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub official: bool,
}

/// Platform compatibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Media {
    #[serde(default)]
    pub screenshots: Vec<String>,
    pub video: Option<String>,
}
