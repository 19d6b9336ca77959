//! Artifact publishing policy.
//!
//! One build either becomes the project's main artifact or attaches as a
//! classified supplemental one. Replacing an existing main artifact without
//! a classifier is refused - that is how two unclassified image builds end
//! up silently overwriting each other.

use std::path::{Path, PathBuf};

use crate::assemble::ImageArtifact;
use crate::error::LinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedArtifact {
    pub classifier: String,
    pub file: PathBuf,
}

/// The project's artifact slots: one main, any number of classified.
#[derive(Debug, Default)]
pub struct ProjectArtifacts {
    main: Option<PathBuf>,
    attached: Vec<AttachedArtifact>,
}

impl ProjectArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a project whose main artifact slot is already taken,
    /// e.g. by an earlier packaging step.
    pub fn with_main(main: PathBuf) -> Self {
        Self {
            main: Some(main),
            attached: Vec::new(),
        }
    }

    pub fn publish(&mut self, artifact: &ImageArtifact) -> Result<(), LinkError> {
        match &artifact.classifier {
            Some(classifier) => {
                self.attached.push(AttachedArtifact {
                    classifier: classifier.clone(),
                    file: artifact.archive.clone(),
                });
                Ok(())
            }
            None => {
                if self.main.is_some() {
                    return Err(LinkError::AmbiguousArtifactReplacement);
                }
                self.main = Some(artifact.archive.clone());
                Ok(())
            }
        }
    }

    pub fn main(&self) -> Option<&Path> {
        self.main.as_deref()
    }

    pub fn attached(&self) -> &[AttachedArtifact] {
        &self.attached
    }
}
