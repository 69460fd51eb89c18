//! Deduplicated render-mesh extraction.
//!
//! OBJ faces index positions, texcoords, and normals independently; GPUs
//! want one vertex buffer indexed by one index buffer. Extraction resolves
//! each face reference into a full [`Vertex`] and deduplicates repeated
//! combinations, assigning output indices in order of first appearance.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::obj::SubObject;

/// A fully resolved render vertex.
///
/// Deduplication compares vertices by the exact bit patterns of their
/// floats; there is no epsilon. Near-duplicate vertices produced by exporter
/// jitter will not merge, and `-0.0` does not merge with `0.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub position: Vec3,
    /// Zero when the face reference carried no normal index.
    pub normal: Vec3,
    /// Zero when the face reference carried no texcoord index.
    pub uv: Vec2,
}

/// Errors from resolving face indices against a sub-object's arrays.
///
/// OBJ indices are author-controlled text, so out-of-range references are
/// reported instead of read.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error(
        "face index {index} resolves outside the {attribute} array \
         (length {len}) in sub-object '{name}'"
    )]
    IndexOutOfRange {
        name: String,
        attribute: &'static str,
        index: i64,
        len: usize,
    },
}

/// A deduplicated vertex/index buffer pair for one sub-object.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Resolve an OBJ index against an array of `len` elements: positive values
/// are 1-based, non-positive values count back from the end (`-1` is the
/// last element).
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let offset = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };

    if offset >= 0 && (offset as usize) < len {
        Some(offset as usize)
    } else {
        None
    }
}

fn gather<T: Copy>(
    values: &[T],
    index: i64,
    attribute: &'static str,
    name: &str,
) -> Result<T, MeshError> {
    resolve_index(index, values.len())
        .map(|offset| values[offset])
        .ok_or_else(|| MeshError::IndexOutOfRange {
            name: name.to_string(),
            attribute,
            index,
            len: values.len(),
        })
}

/// Exact-match dedup key: the bit patterns of all eight floats.
fn vertex_key(v: &Vertex) -> [u32; 8] {
    [
        v.position.x.to_bits(),
        v.position.y.to_bits(),
        v.position.z.to_bits(),
        v.normal.x.to_bits(),
        v.normal.y.to_bits(),
        v.normal.z.to_bits(),
        v.uv.x.to_bits(),
        v.uv.y.to_bits(),
    ]
}

/// Append one sub-object's deduplicated vertex and triangle-index data to
/// caller-supplied buffers.
///
/// Additive: existing buffer contents are kept and new indices are based at
/// the current vertex count, so several sub-objects can be packed into one
/// buffer pair. Deduplication happens within one call only.
///
/// Guarantees on success: exactly `sub.indices.len()` indices are appended,
/// and the appended vertices are the distinct resolved combinations in order
/// of first appearance.
pub fn extract_mesh_data(
    sub: &SubObject,
    out_vertices: &mut Vec<Vertex>,
    out_indices: &mut Vec<u32>,
) -> Result<(), MeshError> {
    let mut mapped: HashMap<[u32; 8], u32> = HashMap::new();
    out_indices.reserve(sub.indices.len());

    for face_index in &sub.indices {
        let position = gather(&sub.positions, face_index.position, "position", &sub.name)?;

        // index 0 marks an absent reference; substitute zero vectors
        let normal = if face_index.normal == 0 {
            Vec3::ZERO
        } else {
            gather(&sub.normals, face_index.normal, "normal", &sub.name)?
        };

        let uv = if face_index.texcoord == 0 {
            Vec2::ZERO
        } else {
            gather(&sub.texcoords, face_index.texcoord, "texcoord", &sub.name)?
        };

        let vertex = Vertex { position, normal, uv };

        let index = match mapped.entry(vertex_key(&vertex)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = out_vertices.len() as u32;
                out_vertices.push(vertex);
                *entry.insert(index)
            }
        };
        out_indices.push(index);
    }

    Ok(())
}

impl SubObject {
    /// Extract this sub-object into a fresh deduplicated [`MeshData`].
    pub fn extract_mesh(&self) -> Result<MeshData, MeshError> {
        let mut mesh = MeshData::default();
        extract_mesh_data(self, &mut mesh.vertices, &mut mesh.indices)?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::{parse_obj, FaceIndex};

    fn sub_with_positions(count: usize) -> SubObject {
        let mut sub = SubObject::default();
        for i in 0..count {
            sub.positions.push(Vec3::new(i as f32, 0.0, 0.0));
        }
        sub
    }

    #[test]
    fn test_negative_indices_resolve_from_the_end() {
        assert_eq!(resolve_index(-1, 5), Some(4));
        assert_eq!(resolve_index(-5, 5), Some(0));
        assert_eq!(resolve_index(-6, 5), None);
        assert_eq!(resolve_index(1, 5), Some(0));
        assert_eq!(resolve_index(5, 5), Some(4));
        assert_eq!(resolve_index(6, 5), None);
        assert_eq!(resolve_index(0, 5), None);
    }

    #[test]
    fn test_extract_plane_example() {
        let obj = "o Plane001\n\
                   v 0 0 0\nv 1 0 0\nv 1 1 0\n\
                   vt 0 0\nvt 1 0\nvt 1 1\n\
                   vn 0 0 1\n\
                   f 1/1/1 2/2/1 3/3/1\n";
        let model = parse_obj(obj).unwrap();
        let mesh = model.sub_objects[0].extract_mesh().unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertices[2].uv, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_identical_combinations_share_an_index() {
        // quad split: corners 1 and 3 are referenced by both triangles
        let obj = "o Quad\n\
                   v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
                   vn 0 0 1\n\
                   f 1//1 2//1 3//1 4//1\n";
        let model = parse_obj(obj).unwrap();
        let mesh = model.sub_objects[0].extract_mesh().unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_distinct_normals_split_the_vertex() {
        // same position, different normals: no merge
        let obj = "o Edge\n\
                   v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                   vn 0 0 1\nvn 1 0 0\n\
                   f 1//1 2//1 3//1\nf 1//2 2//2 3//2\n";
        let model = parse_obj(obj).unwrap();
        let mesh = model.sub_objects[0].extract_mesh().unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_negative_face_indices() {
        let mut sub = sub_with_positions(5);
        sub.indices.extend([
            FaceIndex::new(-5, 0, 0),
            FaceIndex::new(-1, 0, 0),
            FaceIndex::new(3, 0, 0),
        ]);
        let mesh = sub.extract_mesh().unwrap();

        assert_eq!(mesh.vertices[0].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1].position, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[2].position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let mut sub = sub_with_positions(2);
        sub.name = "broken".to_string();
        sub.indices.push(FaceIndex::new(3, 0, 0));

        let err = sub.extract_mesh().unwrap_err();
        let MeshError::IndexOutOfRange { name, attribute, index, len } = err;
        assert_eq!(name, "broken");
        assert_eq!(attribute, "position");
        assert_eq!(index, 3);
        assert_eq!(len, 2);
    }

    #[test]
    fn test_absent_references_fill_with_zero() {
        let mut sub = sub_with_positions(3);
        sub.indices.extend([
            FaceIndex::new(1, 0, 0),
            FaceIndex::new(2, 0, 0),
            FaceIndex::new(3, 0, 0),
        ]);
        let mesh = sub.extract_mesh().unwrap();

        assert_eq!(mesh.vertices[0].normal, Vec3::ZERO);
        assert_eq!(mesh.vertices[0].uv, Vec2::ZERO);
    }

    #[test]
    fn test_extraction_is_additive() {
        let obj = "o A\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
                   o B\nv 5 5 5\nv 6 5 5\nv 5 6 5\nf 1 2 3\n";
        let model = parse_obj(obj).unwrap();

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for sub in &model.sub_objects {
            extract_mesh_data(sub, &mut vertices, &mut indices).unwrap();
        }

        assert_eq!(vertices.len(), 6);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        // B's triangle resolved against B's own arrays
        assert_eq!(vertices[3].position, Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_index_count_matches_triple_count() {
        let obj = "o M\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
                   f 1 2 3 4\nf 1 2 3\n";
        let model = parse_obj(obj).unwrap();
        let sub = &model.sub_objects[0];
        let mesh = sub.extract_mesh().unwrap();

        assert_eq!(mesh.indices.len(), sub.indices.len());
    }
}
