use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::error::{Result, WizardError};

pub const DEFAULT_PRIMARY_COLOR: &str = "#4F46E5";

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// In-memory handle to a user supplied file (contract or logo)
#[derive(Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Kind of file a path is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Word document with the contract body (.docx only)
    Contract,
    /// PNG or JPEG image
    Logo,
}

impl FileKind {
    fn label(&self) -> &'static str {
        match self {
            FileKind::Contract => ".docx",
            FileKind::Logo => "PNG/JPEG",
        }
    }

    /// MIME type for a file name, or None if the extension is not accepted.
    fn mime_for(&self, name: &str) -> Option<&'static str> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;

        match (self, ext.as_str()) {
            (FileKind::Contract, "docx") => Some(DOCX_MIME),
            (FileKind::Logo, "png") => Some("image/png"),
            (FileKind::Logo, "jpg" | "jpeg") => Some("image/jpeg"),
            _ => None,
        }
    }
}

impl FileHandle {
    /// Build a handle from bytes already in memory, checking the extension.
    pub fn from_bytes(name: impl Into<String>, kind: FileKind, bytes: impl Into<Bytes>) -> Result<Self> {
        let name = name.into();
        let mime = kind.mime_for(&name).ok_or_else(|| WizardError::UnsupportedFile {
            name: name.clone(),
            expected: kind.label(),
        })?;
        Ok(Self {
            name,
            mime,
            bytes: bytes.into(),
        })
    }

    /// Read a file from disk. The extension is checked before any IO.
    pub async fn load<P: AsRef<Path>>(path: P, kind: FileKind) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        if kind.mime_for(&name).is_none() {
            return Err(WizardError::UnsupportedFile {
                name,
                expected: kind.label(),
            });
        }

        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(WizardError::EmptyFile(name));
        }
        debug!("Loaded {} ({} bytes)", name, bytes.len());
        Self::from_bytes(name, kind, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The contract body: pasted text or an uploaded document, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractContent {
    Text(String),
    File(FileHandle),
}

impl ContractContent {
    /// Whether there is something to submit. Blank text and empty files count as missing.
    pub fn is_present(&self) -> bool {
        match self {
            ContractContent::Text(text) => !text.trim().is_empty(),
            ContractContent::File(file) => !file.is_empty(),
        }
    }

    /// Multipart field name the backend expects for this variant.
    pub fn form_field(&self) -> &'static str {
        match self {
            ContractContent::Text(_) => "text",
            ContractContent::File(_) => "file",
        }
    }
}

/// Brand color, always stored as upper-case `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct PrimaryColor(String);

impl PrimaryColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }
}

impl Default for PrimaryColor {
    fn default() -> Self {
        Self(DEFAULT_PRIMARY_COLOR.to_string())
    }
}

impl FromStr for PrimaryColor {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| WizardError::InvalidColor(s.to_string()))?;

        let expanded = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(WizardError::InvalidColor(s.to_string())),
        };

        Ok(Self(format!("#{}", expanded.to_ascii_uppercase())))
    }
}

impl TryFrom<String> for PrimaryColor {
    type Error = WizardError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for PrimaryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the user has chosen so far
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractConfig {
    pub content: Option<ContractContent>,
    pub primary_color: PrimaryColor,
    pub logo: Option<FileHandle>,
}

impl ContractConfig {
    /// Right-biased shallow merge: fields set in `patch` win, absent ones are kept.
    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(content) = patch.content {
            self.content = Some(content);
        }
        if let Some(color) = patch.primary_color {
            self.primary_color = color;
        }
        if let Some(logo) = patch.logo {
            self.logo = logo;
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.as_ref().is_some_and(ContractContent::is_present)
    }
}

/// Typed partial update emitted by a step when it completes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub content: Option<ContractContent>,
    pub primary_color: Option<PrimaryColor>,
    /// `Some(None)` clears the logo, `None` leaves it untouched
    pub logo: Option<Option<FileHandle>>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: ContractContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.content(ContractContent::Text(text.into()))
    }

    pub fn primary_color(mut self, color: PrimaryColor) -> Self {
        self.primary_color = Some(color);
        self
    }

    pub fn logo(mut self, logo: Option<FileHandle>) -> Self {
        self.logo = Some(logo);
        self
    }
}
