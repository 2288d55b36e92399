//! Source type detection for changed files.

use serde::Serialize;

/// Source type of a changed file, decided from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    /// Flow-typed sources are recognized but never analyzed.
    Flow,
    Other,
}

impl SourceKind {
    /// Classifies `filename` by the text after its last `.`.
    ///
    /// Matching is exact and case-sensitive: `App.JS` is `Other`.
    pub fn classify(filename: &str) -> Self {
        match extension(filename) {
            Some("js") => SourceKind::JavaScript,
            Some("jsx") => SourceKind::Jsx,
            Some("ts") => SourceKind::TypeScript,
            Some("tsx") => SourceKind::Tsx,
            Some("flow") => SourceKind::Flow,
            _ => SourceKind::Other,
        }
    }

    /// Whether the complexity oracle is run for this kind.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            SourceKind::JavaScript | SourceKind::Jsx | SourceKind::TypeScript | SourceKind::Tsx
        )
    }

    /// Statically-typed variant flag passed to the oracle.
    pub fn is_typescript(self) -> bool {
        matches!(self, SourceKind::TypeScript | SourceKind::Tsx)
    }

    pub fn is_flow_typed(self) -> bool {
        self == SourceKind::Flow
    }
}

/// Returns the text after the last `.` of the file name, if any.
///
/// Dots in directory names are ignored: `dir.v2/Makefile` has no extension.
pub fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext)
}
