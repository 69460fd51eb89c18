//! Counting pass.
//!
//! A single forward scan over the buffer that classifies every line and
//! accumulates exact element counts per sub-object, without storing any
//! geometry. The materializing pass sizes every container from these counts,
//! which is what eliminates amortized-growth reallocation for large meshes.

use super::cursor::{is_quad_face, Cursor, LineToken};

/// Exact element counts produced by the counting pass.
///
/// Slot `k` of each per-sub-object vector belongs to sub-object `k`. Slots
/// are created lazily the first time a sub-object references that attribute,
/// catching up with zeroes for sub-objects that never did; a vector may stay
/// shorter than `num_sub_objects` when trailing sub-objects lack the
/// attribute entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjCounts {
    /// Number of sub-objects, including the implicit unnamed one when
    /// geometry precedes any `o`/`g` marker.
    pub num_sub_objects: usize,

    /// Number of `mtllib` lines
    pub num_material_libs: usize,

    /// Per-sub-object `v` counts
    pub num_positions: Vec<usize>,

    /// Per-sub-object `vn` counts
    pub num_normals: Vec<usize>,

    /// Per-sub-object `vt` counts
    pub num_uvs: Vec<usize>,

    /// Per-sub-object face-vertex counts: 3 per triangle, 6 per quad
    pub num_indices: Vec<usize>,

    /// Per-material-library `usemtl` counts
    pub num_materials: Vec<usize>,
}

impl ObjCounts {
    /// Geometry before the first `o`/`g` marker belongs to an implicit
    /// unnamed sub-object, which has to be counted so the materializing
    /// pass pre-sizes for it.
    fn claim_sub_object(&mut self) {
        if self.num_sub_objects == 0 {
            self.num_sub_objects = 1;
        }
    }
}

/// Add `amount` to the counter slot of the current owner (sub-object or
/// material library), creating zeroed slots up to it on first reference.
fn bump(slots: &mut Vec<usize>, owners: usize, amount: usize) {
    let owners = owners.max(1);
    while slots.len() < owners {
        slots.push(0);
    }
    slots[owners - 1] += amount;
}

/// Run the counting pass over a whole buffer.
///
/// Malformed lines are not diagnosed here; they are counted by their token
/// class and left for the materializing pass to report. Unrecognized
/// directives are skipped.
pub fn scan_counts(content: &str) -> ObjCounts {
    let mut counts = ObjCounts::default();
    let mut cursor = Cursor::new(content);

    loop {
        match cursor.line_token() {
            LineToken::Eof => break,

            LineToken::Whitespace => {
                cursor.skip_whitespace();
                continue;
            }

            LineToken::Comment | LineToken::SmoothingGroup | LineToken::Unknown => {}

            LineToken::Object | LineToken::Group => {
                counts.num_sub_objects += 1;
            }

            LineToken::Position => {
                counts.claim_sub_object();
                bump(&mut counts.num_positions, counts.num_sub_objects, 1);
            }

            LineToken::Normal => {
                counts.claim_sub_object();
                bump(&mut counts.num_normals, counts.num_sub_objects, 1);
            }

            LineToken::TexCoord => {
                counts.claim_sub_object();
                bump(&mut counts.num_uvs, counts.num_sub_objects, 1);
            }

            LineToken::Face => {
                counts.claim_sub_object();
                let verts = if is_quad_face(cursor.line_payload()) { 6 } else { 3 };
                bump(&mut counts.num_indices, counts.num_sub_objects, verts);
            }

            LineToken::MaterialLib => {
                counts.num_material_libs += 1;
            }

            LineToken::UseMaterial => {
                counts.claim_sub_object();
                bump(&mut counts.num_materials, counts.num_material_libs, 1);
            }
        }

        cursor.next_line();
    }

    counts
}
