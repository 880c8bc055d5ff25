pub mod obj;
pub mod stl;

pub use obj::{parse_obj_bytes, parse_obj_str, ObjError};
pub use stl::{parse_stl_bytes, parse_stl_str, StlError};

use crate::{error::LoadError, Mesh};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Picks the format from the extension of a path or URL. Query strings and
    /// fragments are ignored.
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let (_, ext) = file.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Some(MeshFormat::Obj),
            "stl" => Some(MeshFormat::Stl),
            _ => None,
        }
    }
}

/// Decodes a whole file's bytes and validates the result.
pub fn decode_mesh(bytes: &[u8], format: MeshFormat) -> Result<Mesh, LoadError> {
    let mesh = match format {
        MeshFormat::Obj => parse_obj_bytes(bytes)?,
        MeshFormat::Stl => parse_stl_bytes(bytes)?,
    };
    mesh.validate_basic()?;
    if mesh.is_empty() {
        return Err(LoadError::EmptyMesh);
    }
    Ok(mesh)
}
