//! Pre-trained classifier artifact.
//!
//! The artifact is read once at startup and kept as a fingerprint (size and
//! SHA-256) so the health endpoint can report which model is deployed. No
//! endpoint runs inference.

use std::path::{Path, PathBuf};

use crime_insights_crime_models::CrimeType;
use crime_insights_server_models::ApiClassifier;
use sha2::{Digest as _, Sha256};

/// A loaded classifier artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierArtifact {
    path: PathBuf,
    size_bytes: u64,
    sha256: String,
}

impl ClassifierArtifact {
    /// Reads and fingerprints the artifact at `path`.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let artifact = Self::from_bytes(path, &bytes);

        log::info!(
            "Loaded classifier artifact {} ({} bytes, sha256 {})",
            path.display(),
            artifact.size_bytes,
            artifact.sha256
        );

        Ok(artifact)
    }

    fn from_bytes(path: &Path, bytes: &[u8]) -> Self {
        Self {
            path: path.to_path_buf(),
            size_bytes: bytes.len() as u64,
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }

    /// Hex-encoded SHA-256 of the artifact.
    #[must_use]
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// The classifier's output labels, indexed by label code.
    #[must_use]
    pub fn labels() -> Vec<String> {
        CrimeType::all().iter().map(ToString::to_string).collect()
    }

    /// API representation for the health endpoint.
    #[must_use]
    pub fn to_api(&self) -> ApiClassifier {
        ApiClassifier {
            path: self.path.display().to_string(),
            size_bytes: self.size_bytes,
            sha256: self.sha256.clone(),
            labels: Self::labels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_bytes() {
        let artifact = ClassifierArtifact::from_bytes(Path::new("model.pkl"), b"abc");
        assert_eq!(
            artifact.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(artifact.to_api().size_bytes, 3);
    }

    #[test]
    fn labels_follow_codes() {
        assert_eq!(
            ClassifierArtifact::labels(),
            vec!["Assault", "Murder", "Theft", "Fraud", "Robbery"]
        );
    }

    #[test]
    fn load_missing_file_fails() {
        let path = std::env::temp_dir().join("crime_insights_missing_model.pkl");
        let _ = std::fs::remove_file(&path);
        assert!(ClassifierArtifact::load(&path).is_err());
    }
}
