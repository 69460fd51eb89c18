//! wobj_core - two-pass Wavefront OBJ parsing and mesh extraction.
//!
//! This crate provides:
//!
//! - **OBJ parsing**: a counting pass that pre-computes exact element counts
//!   followed by a materializing pass into exactly-sized containers
//! - **Mesh extraction**: deduplication of independently-indexed face data
//!   into a single indexed vertex buffer suitable for rendering
//!
//! # Example
//!
//! ```ignore
//! use wobj_core::load_obj;
//!
//! let model = load_obj("model.obj")?;
//! for sub in &model.sub_objects {
//!     let mesh = sub.extract_mesh()?;
//!     println!("{}: {} vertices, {} triangles",
//!         sub.name,
//!         mesh.vertex_count(),
//!         mesh.triangle_count());
//! }
//! ```

pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use mesh::{extract_mesh_data, MeshData, MeshError, Vertex};
pub use obj::{
    load_obj, load_obj_with, parse_obj, parse_obj_with, scan_counts, ErrorMode, FaceIndex,
    LoadError, LoadResult, ObjCounts, ObjModel, ParseError, ParseOptions, ParseResult,
    ParseWarning, ParsedObj, SubObject,
};
