/// Owner of the mesh the viewer renders
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ObjError;
use crate::geometry::{InterleavedMesh, RawMesh};
use crate::interleave::interleave;
use crate::normals::synthesize_normals;
use crate::obj::{LoadReport, ObjLoader};

/// Holds the interleaved mesh from its load until it is unloaded or
/// replaced. A failed load never replaces the current mesh.
#[derive(Debug, Default)]
pub struct MeshResource {
    mesh: InterleavedMesh,
    path: Option<PathBuf>,
    report: Option<LoadReport>,
    loader: ObjLoader,
}

impl MeshResource {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an in-memory raw mesh, such as [`RawMesh::cube`]
    pub fn from_raw(raw: &RawMesh) -> Result<Self, ObjError> {
        raw.validate()?;
        let mut raw = raw.clone();
        synthesize_normals(&mut raw)?;
        Ok(Self {
            mesh: interleave(&raw)?,
            ..Self::default()
        })
    }

    /// Load `path`, replacing the current mesh on success
    pub fn load(&mut self, path: &Path) -> Result<&LoadReport, ObjError> {
        let load = self.loader.load_path(path)?;
        self.mesh = load.mesh;
        self.path = Some(path.to_path_buf());
        Ok(self.report.insert(load.report))
    }

    /// Load the current path again. Returns `Ok(None)` when the resource
    /// was not loaded from a file.
    pub fn reload(&mut self) -> Result<Option<&LoadReport>, ObjError> {
        let Some(path) = self.path.clone() else {
            return Ok(None);
        };
        match self.load(&path) {
            Ok(report) => Ok(Some(report)),
            Err(e) => {
                warn!("Reload of '{}' failed, keeping previous mesh: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Drop the mesh and forget its source
    pub fn unload(&mut self) {
        if let Some(path) = self.path.take() {
            info!("Unloaded '{}'", path.display());
        }
        self.mesh = InterleavedMesh::new();
        self.report = None;
    }

    pub fn mesh(&self) -> &InterleavedMesh {
        &self.mesh
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        !self.mesh.is_empty()
    }
}
