//! Configuration layer: the per-user credentials store and process logging settings.

use std::{
    fmt, fs,
    io::{self, BufRead, Stdin, StdinLock, Stdout, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, level_filters::LevelFilter};

pub const CONFIG_FILE_NAME: &str = "cbot.json";
const CONFIG_DIR_NAME_WINDOWS: &str = "cbot";
const CONFIG_DIR_NAME_POSIX: &str = ".cbot";

/// Language sent in the `content-language` header regardless of the stored value.
pub const FORCED_CONTENT_LANGUAGE: &str = "ja";

const PROMPT_ACCESS_TOKEN: &str = "Input your Access Token:";
const PROMPT_SECRET_KEY: &str = "Input your Secret Key:";
const PROMPT_API_PATH: &str = "Input your API public path:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("config file load failed. {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("config file load failed. {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("config file create failed. {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("config file create failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("config file create failed. setup canceled")]
    Canceled,
    #[error("unable to resolve the configuration directory; set CBOT_CONFIG_DIR")]
    NoConfigDir,
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Access credentials and API location, as persisted in `cbot.json`.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AccessToken", default)]
    pub access_token: String,
    #[serde(rename = "SecretKey", default)]
    pub secret_key: String,
    #[serde(rename = "ApiPath", default)]
    pub api_path: String,
    #[serde(rename = "ContentLanguage", default)]
    pub content_language: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("secret_key", &"<redacted>")
            .field("api_path", &self.api_path)
            .field("content_language", &self.content_language)
            .finish()
    }
}

impl Credentials {
    /// Write the profile summary shown by `cbot-cli -p`.
    pub fn write_profile<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Access Token : {}", self.access_token)?;
        writeln!(out, "Secret Key   : {}", self.secret_key)?;
        writeln!(out, "API Path     : {}", self.api_path)
    }
}

/// Source of answers for the interactive setup.
///
/// `Ok(None)` means the input ended before an answer was given.
pub trait CredentialPrompt {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>>;
}

/// Line-oriented prompt: writes the label, reads one line.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Prompt on the process stdin/stdout.
pub fn stdio_prompt() -> LinePrompt<StdinLock<'static>, Stdout> {
    let stdin: Stdin = io::stdin();
    LinePrompt::new(stdin.lock(), io::stdout())
}

impl<R: BufRead, W: Write> CredentialPrompt for LinePrompt<R, W> {
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        self.output.write_all(label.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn ask_required<P: CredentialPrompt + ?Sized>(
    prompt: &mut P,
    label: &str,
) -> Result<String, ConfigError> {
    match prompt.ask(label) {
        Ok(Some(answer)) => Ok(answer),
        Ok(None) => Err(ConfigError::Canceled),
        Err(err) => {
            debug!(error = %err, "prompt read failed");
            Err(ConfigError::Canceled)
        }
    }
}

/// Collect a full set of credentials from `prompt`.
pub fn prompt_credentials<P: CredentialPrompt + ?Sized>(
    prompt: &mut P,
) -> Result<Credentials, ConfigError> {
    let access_token = ask_required(prompt, PROMPT_ACCESS_TOKEN)?;
    let secret_key = ask_required(prompt, PROMPT_SECRET_KEY)?;
    let api_path = ask_required(prompt, PROMPT_API_PATH)?;

    Ok(Credentials {
        access_token,
        secret_key,
        api_path,
        content_language: FORCED_CONTENT_LANGUAGE.to_string(),
    })
}

/// Platform default: `%APPDATA%\cbot` on Windows, `$HOME/.cbot` elsewhere.
pub fn default_config_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME_WINDOWS))
    } else {
        dirs::home_dir().map(|dir| dir.join(CONFIG_DIR_NAME_POSIX))
    }
}

/// The single credentials file of this user.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use `dir_override` when given, the platform default otherwise.
    pub fn locate(dir_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        match dir_override {
            Some(dir) => Ok(Self::new(dir)),
            None => default_config_dir()
                .map(Self::new)
                .ok_or(ConfigError::NoConfigDir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Read the stored credentials. The content language is always replaced
    /// with [`FORCED_CONTENT_LANGUAGE`].
    pub fn load(&self) -> Result<Credentials, ConfigError> {
        let path = self.path();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound { path });
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let mut credentials: Credentials = serde_json::from_str(&data)
            .map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        credentials.content_language = FORCED_CONTENT_LANGUAGE.to_string();

        debug!(path = %path.display(), "loaded credentials");
        Ok(credentials)
    }

    /// Prompt for fresh credentials and persist them. Nothing is written when
    /// the prompt is canceled.
    pub fn create<P: CredentialPrompt + ?Sized>(
        &self,
        prompt: &mut P,
    ) -> Result<Credentials, ConfigError> {
        let credentials = prompt_credentials(prompt)?;
        self.save(&credentials)?;
        Ok(credentials)
    }

    /// Re-run the full setup; there is no partial edit.
    pub fn update<P: CredentialPrompt + ?Sized>(
        &self,
        prompt: &mut P,
    ) -> Result<Credentials, ConfigError> {
        self.create(prompt)
    }

    pub fn load_or_create<P: CredentialPrompt + ?Sized>(
        &self,
        prompt: &mut P,
    ) -> Result<Credentials, ConfigError> {
        match self.load() {
            Err(ConfigError::NotFound { path }) => {
                debug!(path = %path.display(), "no credentials file, starting setup");
                self.create(prompt)
            }
            other => other,
        }
    }

    /// Write `credentials` as indented JSON, creating the directory owner-only.
    pub fn save(&self, credentials: &Credentials) -> Result<(), ConfigError> {
        let mut body = serde_json::to_string_pretty(credentials).map_err(ConfigError::Encode)?;
        body.push('\n');

        create_private_dir(&self.dir).map_err(|source| ConfigError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path();
        write_private_file(&path, body.as_bytes())
            .map_err(|source| ConfigError::Write { path: path.clone(), source })?;

        debug!(path = %path.display(), "saved credentials");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, body: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(body)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, body: &[u8]) -> io::Result<()> {
    fs::write(path, body)
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    /// Resolve logging from the optional `--log-level` / `--log-json` values.
    pub fn from_overrides(level: Option<&str>, json: Option<bool>) -> Result<Self, ConfigError> {
        let level = match level {
            Some(level) => LevelFilter::from_str(level.trim()).map_err(|err| {
                ConfigError::invalid("logging.level", format!("failed to parse: {err}"))
            })?,
            None => LevelFilter::WARN,
        };

        let format = if json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };

        Ok(Self { level, format })
    }
}
