use std::cell::Cell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

/// File extensions the viewer accepts, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("unsupported file type: {name} (expected .glb or .gltf)")]
    UnsupportedFormat { name: String },
    #[error("failed to read asset at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dropped file '{name}' carried no path or data")]
    EmptySource { name: String },
}

/// Opaque handle over the bytes of one validated asset.
///
/// The viewport controller owns at most one of these at a time. A handle is
/// released when it is dropped; `AssetIntake::live_handles` exposes the count
/// so the no-leak invariant stays observable.
pub struct ResourceHandle {
    id: u64,
    name: String,
    bytes: Arc<[u8]>,
    live: Rc<Cell<usize>>,
}

impl ResourceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        log::debug!("Released resource handle #{} ('{}')", self.id, self.name);
    }
}

/// Returns true when `name` ends in one of the recognized 3D-asset suffixes.
pub fn is_supported(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Converts user-supplied files into resource handles.
pub struct AssetIntake {
    next_id: u64,
    live: Rc<Cell<usize>>,
}

impl AssetIntake {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Number of handles produced by this intake that have not been released.
    pub fn live_handles(&self) -> usize {
        self.live.get()
    }

    /// Validates a picked or dropped file by path and reads its bytes.
    pub fn submit_path(&mut self, path: &Path) -> Result<ResourceHandle, IntakeError> {
        let name = path
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("asset")
            .to_string();
        if !is_supported(&name) {
            return Err(IntakeError::UnsupportedFormat { name });
        }
        let bytes = std::fs::read(path).map_err(|source| IntakeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.make_handle(name, bytes.into()))
    }

    /// Validates a dropped file that arrived with its bytes already in memory.
    pub fn submit_bytes(&mut self, name: &str, bytes: Arc<[u8]>) -> Result<ResourceHandle, IntakeError> {
        if !is_supported(name) {
            return Err(IntakeError::UnsupportedFormat {
                name: name.to_string(),
            });
        }
        Ok(self.make_handle(name.to_string(), bytes))
    }

    fn make_handle(&mut self, name: String, bytes: Arc<[u8]>) -> ResourceHandle {
        self.next_id += 1;
        self.live.set(self.live.get() + 1);
        log::info!(
            "Materialized resource handle #{} for '{}' ({} bytes)",
            self.next_id,
            name,
            bytes.len()
        );
        ResourceHandle {
            id: self.next_id,
            name,
            bytes,
            live: Rc::clone(&self.live),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_supported, AssetIntake, IntakeError};
    use std::path::PathBuf;

    fn bytes(data: &[u8]) -> std::sync::Arc<[u8]> {
        data.to_vec().into()
    }

    #[test]
    fn recognizes_allowlisted_extensions_case_insensitively() {
        assert!(is_supported("model.glb"));
        assert!(is_supported("model.GLB"));
        assert!(is_supported("scene.gltf"));
        assert!(is_supported("scene.GlTf"));
        assert!(!is_supported("model.obj"));
        assert!(!is_supported("model.glb.txt"));
        assert!(!is_supported("model"));
    }

    #[test]
    fn rejects_unsupported_format_without_creating_a_handle() {
        let mut intake = AssetIntake::new();
        let result = intake.submit_bytes("model.obj", bytes(b"solid"));
        assert!(matches!(
            result,
            Err(IntakeError::UnsupportedFormat { ref name }) if name == "model.obj"
        ));
        assert_eq!(intake.live_handles(), 0);
    }

    #[test]
    fn accepts_uppercase_glb() {
        let mut intake = AssetIntake::new();
        let handle = intake.submit_bytes("model.GLB", bytes(b"glTF")).unwrap();
        assert_eq!(handle.name(), "model.GLB");
        assert_eq!(handle.len(), 4);
        assert_eq!(intake.live_handles(), 1);
    }

    #[test]
    fn dropping_a_handle_releases_it_exactly_once() {
        let mut intake = AssetIntake::new();
        let first = intake.submit_bytes("a.glb", bytes(b"a")).unwrap();
        let second = intake.submit_bytes("b.gltf", bytes(b"b")).unwrap();
        assert_eq!(intake.live_handles(), 2);
        drop(first);
        assert_eq!(intake.live_handles(), 1);
        drop(second);
        assert_eq!(intake.live_handles(), 0);
    }

    #[test]
    fn submit_path_reads_bytes_and_uses_the_file_name() {
        let mut path = std::env::temp_dir();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        path.push(format!("glbview_intake_{}_{}.glb", std::process::id(), nonce));
        std::fs::write(&path, b"glTF\x02\x00\x00\x00").unwrap();

        let mut intake = AssetIntake::new();
        let handle = intake.submit_path(&path).unwrap();
        assert_eq!(handle.len(), 8);
        assert!(handle.name().starts_with("glbview_intake_"));
        assert_eq!(intake.live_handles(), 1);

        drop(handle);
        assert_eq!(intake.live_handles(), 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn submit_path_surfaces_read_errors() {
        let mut intake = AssetIntake::new();
        let missing = PathBuf::from("definitely/not/here.glb");
        let result = intake.submit_path(&missing);
        assert!(matches!(result, Err(IntakeError::Read { .. })));
        assert_eq!(intake.live_handles(), 0);
    }

    #[test]
    fn submit_path_validates_before_touching_the_filesystem() {
        let mut intake = AssetIntake::new();
        let result = intake.submit_path(&PathBuf::from("missing.obj"));
        assert!(matches!(result, Err(IntakeError::UnsupportedFormat { .. })));
    }
}
