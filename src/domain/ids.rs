//! Domain identifier types with validation
//!
//! Newtype wrappers for the opaque identifiers of a remote model, and the
//! [`DocumentReference`] that bundles them after parsing a model URL.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MODEL_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/documents/([^/]+)/([wv])/([^/]+)/e/([^/?#]+)").expect("valid model URL regex")
});

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank input
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Document identifier (`did`)
    DocumentId,
    "Document ID"
);
opaque_id!(
    /// Workspace or version identifier (`wid` / `vid`)
    WorkspaceId,
    "Workspace ID"
);
opaque_id!(
    /// Element (part studio) identifier (`eid`)
    ElementId,
    "Element ID"
);

/// Whether the reference points at a mutable workspace or an immutable version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkspaceKind {
    /// `/w/` URLs
    Workspace,
    /// `/v/` URLs
    Version,
}

impl WorkspaceKind {
    /// Path segment used in API endpoints
    pub fn segment(&self) -> &'static str {
        match self {
            WorkspaceKind::Workspace => "w",
            WorkspaceKind::Version => "v",
        }
    }
}

/// Reference to a part studio inside a document
///
/// # Examples
///
/// ```
/// use onshape_exporter::domain::ids::{DocumentReference, WorkspaceKind};
///
/// let reference = DocumentReference::from_url(
///     "https://cad.onshape.com/documents/abc/w/def/e/ghi",
/// ).unwrap();
/// assert_eq!(reference.document_id.as_str(), "abc");
/// assert_eq!(reference.workspace_kind, WorkspaceKind::Workspace);
/// assert_eq!(reference.element_id.as_str(), "ghi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Document identifier
    pub document_id: DocumentId,

    /// Workspace or version marker
    pub workspace_kind: WorkspaceKind,

    /// Workspace or version identifier
    pub workspace_id: WorkspaceId,

    /// Element identifier
    pub element_id: ElementId,
}

impl DocumentReference {
    /// Parses a browser URL of a part studio
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not contain
    /// `/documents/{did}/{w|v}/{wid}/e/{eid}`.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let caps = MODEL_URL_PATTERN
            .captures(url)
            .ok_or_else(|| format!("Invalid Onshape URL format: {url}"))?;

        let workspace_kind = match &caps[2] {
            "v" => WorkspaceKind::Version,
            _ => WorkspaceKind::Workspace,
        };

        Ok(Self {
            document_id: DocumentId::new(&caps[1])?,
            workspace_kind,
            workspace_id: WorkspaceId::new(&caps[3])?,
            element_id: ElementId::new(&caps[4])?,
        })
    }

    /// `d/{did}/{w|v}/{wid}` path fragment shared by most endpoints
    pub fn document_path(&self) -> String {
        format!(
            "d/{}/{}/{}",
            self.document_id,
            self.workspace_kind.segment(),
            self.workspace_id
        )
    }

    /// `d/{did}/{w|v}/{wid}/e/{eid}` path fragment
    pub fn element_path(&self) -> String {
        format!("{}/e/{}", self.document_path(), self.element_id)
    }
}

impl FromStr for DocumentReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_url(s)
    }
}
