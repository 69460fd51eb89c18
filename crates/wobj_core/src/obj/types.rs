//! Parsed OBJ model types.
//!
//! These types hold the file contents exactly as parsed: per-sub-object
//! attribute arrays and raw 1-based face indices. Conversion to a renderable
//! vertex/index buffer happens separately in [`crate::mesh`].

use glam::{Vec2, Vec3};

/// One vertex reference of a face: `position[/texcoord[/normal]]`.
///
/// Indices follow the OBJ convention: positive values are 1-based into the
/// owning sub-object's attribute arrays, non-positive values are offsets from
/// the end of the array (`-1` is the last element). A value of `0` marks an
/// absent reference; mesh extraction substitutes a zero vector rather than
/// resolving it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceIndex {
    /// Position index (always present in well-formed input)
    pub position: i64,

    /// Texture coordinate index, 0 when absent
    pub texcoord: i64,

    /// Normal index, 0 when absent
    pub normal: i64,
}

impl FaceIndex {
    pub fn new(position: i64, texcoord: i64, normal: i64) -> Self {
        Self { position, texcoord, normal }
    }
}

/// One named mesh group delimited by an `o` or `g` marker.
///
/// A sub-object exclusively owns its attribute arrays and index list; face
/// indices always resolve against the same sub-object's arrays, never a
/// neighbor's. The materializing pass creates every sub-object with its
/// arrays reserved to the exact counts from the scanning pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubObject {
    /// Name from the `o`/`g` line; empty for the implicit sub-object that
    /// owns geometry appearing before any marker.
    pub name: String,

    /// Material assigned by `usemtl`; the last assignment in the sub-object
    /// wins. Empty when no `usemtl` appeared.
    pub material: String,

    /// Vertex positions (`v`)
    pub positions: Vec<Vec3>,

    /// Vertex normals (`vn`)
    pub normals: Vec<Vec3>,

    /// Texture coordinates (`vt`; only the first two fields are kept)
    pub texcoords: Vec<Vec2>,

    /// Face vertex references, three per triangle (quads are split on
    /// ingest)
    pub indices: Vec<FaceIndex>,
}

impl SubObject {
    /// Create an empty sub-object with every array reserved to its final
    /// size. Used by the materializing pass so that filling the model never
    /// reallocates.
    pub fn with_capacity(
        positions: usize,
        normals: usize,
        texcoords: usize,
        indices: usize,
    ) -> Self {
        Self {
            name: String::new(),
            material: String::new(),
            positions: Vec::with_capacity(positions),
            normals: Vec::with_capacity(normals),
            texcoords: Vec::with_capacity(texcoords),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Number of triangles referenced by this sub-object.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A fully parsed OBJ file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjModel {
    /// Sub-objects in file order
    pub sub_objects: Vec<SubObject>,

    /// `mtllib` references in file order
    pub material_libraries: Vec<String>,
}

impl ObjModel {
    /// True when the model holds no geometry and no material references.
    pub fn is_empty(&self) -> bool {
        self.sub_objects.is_empty() && self.material_libraries.is_empty()
    }

    /// Total triangle count across all sub-objects.
    pub fn triangle_count(&self) -> usize {
        self.sub_objects.iter().map(SubObject::triangle_count).sum()
    }
}
