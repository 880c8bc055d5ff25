use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

use crate::Mesh;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("line {line}: failed to parse float `{token}`")]
    ParseFloat { line: usize, token: String },
    #[error("line {line}: failed to parse index `{token}`")]
    ParseIndex { line: usize, token: String },
    #[error("line {line}: vertex index {index} out of range ({len} defined)")]
    MissingVertex { line: usize, index: i64, len: usize },
    #[error("line {line}: face corner has no vertex index")]
    MissingFaceVertex { line: usize },
    #[error("obj data is not valid utf-8")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Clone, Copy, Debug)]
struct FaceIndex {
    v: i64,
    vn: i64,
}

#[derive(Clone, Debug)]
struct ParsedFace {
    line: usize,
    corners: Vec<FaceIndex>,
}

#[derive(Clone, Debug, Default)]
struct ParsedObj {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<ParsedFace>,
}

fn parse_f32(tok: Option<&str>, line: usize) -> Result<f32, ObjError> {
    let tok = tok.unwrap_or_default();
    tok.parse::<f32>().map_err(|_| ObjError::ParseFloat {
        line,
        token: tok.to_string(),
    })
}

fn parse_i64(tok: &str, line: usize) -> Result<i64, ObjError> {
    tok.parse::<i64>().map_err(|_| ObjError::ParseIndex {
        line,
        token: tok.to_string(),
    })
}

fn parse_vec3<'a>(it: &mut impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, ObjError> {
    Ok(Vec3::new(
        parse_f32(it.next(), line)?,
        parse_f32(it.next(), line)?,
        parse_f32(it.next(), line)?,
    ))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`. Texture coordinates are accepted and ignored.
fn parse_face_index(tok: &str, line: usize) -> Result<FaceIndex, ObjError> {
    let mut parts = tok.split('/');
    let v = match parts.next() {
        Some(s) if !s.is_empty() => parse_i64(s, line)?,
        _ => return Err(ObjError::MissingFaceVertex { line }),
    };
    let _vt = parts.next();
    let vn = match parts.next() {
        Some(s) if !s.is_empty() => parse_i64(s, line)?,
        _ => 0,
    };
    Ok(FaceIndex { v, vn })
}

/// 1-based, or negative relative to the end of the list so far.
fn resolve_index(idx: i64, len: usize, line: usize) -> Result<usize, ObjError> {
    let resolved = match idx {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(len as i64 + i),
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
        _ => Err(ObjError::MissingVertex { line, index: idx, len }),
    }
}

fn parse_obj(src: &str) -> Result<ParsedObj, ObjError> {
    let mut parsed = ParsedObj::default();

    for (n, line) in src.lines().enumerate() {
        let line_no = n + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let Some(key) = it.next() else {
            continue;
        };
        match key {
            "v" => parsed.positions.push(parse_vec3(&mut it, line_no)?),
            "vn" => parsed.normals.push(parse_vec3(&mut it, line_no)?),
            "f" => {
                let corners = it
                    .map(|tok| parse_face_index(tok, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    continue;
                }
                // Relative indices refer to the lists as they stand on this line.
                let corners = corners
                    .into_iter()
                    .map(|c| {
                        let v = resolve_index(c.v, parsed.positions.len(), line_no)? as i64;
                        let vn = if c.vn == 0 {
                            -1
                        } else {
                            resolve_index(c.vn, parsed.normals.len(), line_no)? as i64
                        };
                        Ok(FaceIndex { v, vn })
                    })
                    .collect::<Result<Vec<_>, ObjError>>()?;
                parsed.faces.push(ParsedFace {
                    line: line_no,
                    corners,
                });
            }
            _ => {}
        }
    }

    Ok(parsed)
}

fn build_mesh(parsed: ParsedObj) -> Mesh {
    let use_obj_normals = !parsed.normals.is_empty()
        && parsed
            .faces
            .iter()
            .all(|f| f.corners.iter().all(|c| c.vn >= 0));

    let mut mesh = Mesh::new();
    let mut map: HashMap<(i64, i64), u32> = HashMap::new();

    for face in &parsed.faces {
        let mut idxs: Vec<u32> = Vec::with_capacity(face.corners.len());
        for c in &face.corners {
            let key = if use_obj_normals { (c.v, c.vn) } else { (c.v, -1) };
            let out = *map.entry(key).or_insert_with(|| {
                let out = mesh.positions.len() as u32;
                mesh.positions.push(parsed.positions[c.v as usize]);
                if use_obj_normals {
                    mesh.normals.push(parsed.normals[c.vn as usize]);
                }
                out
            });
            idxs.push(out);
        }
        triangulate_fan(&idxs, &mut mesh);
    }

    if mesh.normals.len() != mesh.positions.len() {
        mesh.normals.clear();
    }
    mesh.ensure_normals();
    mesh
}

fn triangulate_fan(idxs: &[u32], mesh: &mut Mesh) {
    if idxs.len() < 3 {
        return;
    }
    let base = idxs[0];
    for pair in idxs[1..].windows(2) {
        mesh.indices.push([base, pair[0], pair[1]]);
    }
}

/// Parses Wavefront OBJ text into a single mesh. Groups, objects and
/// materials are flattened.
pub fn parse_obj_str(src: &str) -> Result<Mesh, ObjError> {
    let parsed = parse_obj(src)?;
    tracing::trace!(
        positions = parsed.positions.len(),
        normals = parsed.normals.len(),
        faces = parsed.faces.len(),
        first_face_line = parsed.faces.first().map(|f| f.line),
        "parsed obj"
    );
    Ok(build_mesh(parsed))
}

pub fn parse_obj_bytes(bytes: &[u8]) -> Result<Mesh, ObjError> {
    parse_obj_str(std::str::from_utf8(bytes)?)
}
