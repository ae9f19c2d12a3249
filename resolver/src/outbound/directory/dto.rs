//! DTO for directory lookups.

use serde::Deserialize;

use crate::domain::Locality;

/// Directory answer. Unknown codes come back as `{"erro": true}`.
#[derive(Debug, Deserialize)]
pub(super) struct DirectoryResponseDto {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    erro: bool,
}

impl DirectoryResponseDto {
    /// The locality, unless the directory flagged the code or left it blank.
    pub(super) fn into_locality(self) -> Option<Locality> {
        if self.erro {
            return None;
        }
        Locality::new(self.localidade).ok()
    }
}
