//! Materializing pass.
//!
//! Re-runs the tokenizer over the same buffer the counting pass consumed and
//! fills containers pre-sized from its counts: sub-objects are created on
//! `o`/`g` lines, vertex attributes appended, faces triangulated (a quad
//! splits on the 0-2 diagonal), and material references recorded.

use thiserror::Error;

use super::cursor::{is_quad_face, Cursor, LineToken};
use super::scan::scan_counts;
use super::types::{FaceIndex, ObjModel, SubObject};

/// Errors from the in-memory parsing passes.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("parse error at line {line}: {message}")]
    MalformedLine { line: usize, message: String },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// How malformed payloads of recognized directives are handled.
///
/// Unrecognized directives are skipped in both modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorMode {
    /// Skip the line, record a [`ParseWarning`], keep parsing.
    #[default]
    Lenient,

    /// Fail the parse on the first malformed line.
    Strict,
}

/// Parsing configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOptions {
    pub mode: ErrorMode,
}

/// A recoverable malformation recorded in lenient mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

/// Parse result carrying the warnings accumulated in lenient mode.
#[derive(Clone, Debug, Default)]
pub struct ParsedObj {
    pub model: ObjModel,
    pub warnings: Vec<ParseWarning>,
}

/// Parse an in-memory OBJ buffer leniently.
///
/// Warnings for malformed lines go to the log; use [`parse_obj_with`] to
/// collect them instead.
pub fn parse_obj(content: &str) -> ParseResult<ObjModel> {
    let parsed = parse_obj_with(content, &ParseOptions::default())?;
    for warning in &parsed.warnings {
        log::warn!("obj line {}: {}", warning.line, warning.message);
    }
    Ok(parsed.model)
}

/// Parse an in-memory OBJ buffer with explicit options.
///
/// Runs the counting pass first, then materializes into exactly-sized
/// containers. An attribute or face line arriving before any `o`/`g` marker
/// goes to an implicit sub-object with an empty name.
pub fn parse_obj_with(content: &str, options: &ParseOptions) -> ParseResult<ParsedObj> {
    let counts = scan_counts(content);

    let sub_objects = (0..counts.num_sub_objects)
        .map(|i| {
            SubObject::with_capacity(
                counts.num_positions.get(i).copied().unwrap_or(0),
                counts.num_normals.get(i).copied().unwrap_or(0),
                counts.num_uvs.get(i).copied().unwrap_or(0),
                counts.num_indices.get(i).copied().unwrap_or(0),
            )
        })
        .collect();

    let mut builder = Builder {
        model: ObjModel {
            sub_objects,
            material_libraries: Vec::with_capacity(counts.num_material_libs),
        },
        current: None,
        warnings: Vec::new(),
        mode: options.mode,
    };

    builder.run(content)?;

    log::debug!(
        "parsed {} sub-objects, {} material libraries, {} warnings",
        builder.model.sub_objects.len(),
        builder.model.material_libraries.len(),
        builder.warnings.len()
    );

    Ok(ParsedObj {
        model: builder.model,
        warnings: builder.warnings,
    })
}

struct Builder {
    model: ObjModel,
    /// Index of the sub-object currently receiving data; `None` until the
    /// first marker or the first implicit use.
    current: Option<usize>,
    warnings: Vec<ParseWarning>,
    mode: ErrorMode,
}

impl Builder {
    fn run(&mut self, content: &str) -> ParseResult<()> {
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
                    let index = self.current.map_or(0, |i| i + 1);
                    let name = cursor.line_payload().trim();
                    if let Some(sub) = self.model.sub_objects.get_mut(index) {
                        sub.name = name.to_string();
                    }
                    self.current = Some(index);
                }

                LineToken::Position => {
                    self.claim();
                    let line = cursor.line();
                    match parse_vec3(cursor.line_payload()) {
                        Some(v) => self.current_sub().positions.push(v),
                        None => self.malformed(line, "expected 3 numeric fields after 'v'")?,
                    }
                }

                LineToken::Normal => {
                    self.claim();
                    let line = cursor.line();
                    match parse_vec3(cursor.line_payload()) {
                        Some(v) => self.current_sub().normals.push(v),
                        None => self.malformed(line, "expected 3 numeric fields after 'vn'")?,
                    }
                }

                LineToken::TexCoord => {
                    self.claim();
                    let line = cursor.line();
                    // only the first two fields matter; a third is ignored
                    match parse_vec2(cursor.line_payload()) {
                        Some(uv) => self.current_sub().texcoords.push(uv),
                        None => self.malformed(line, "expected 2 numeric fields after 'vt'")?,
                    }
                }

                LineToken::Face => {
                    self.claim();
                    let line = cursor.line();
                    let payload = cursor.line_payload();
                    if payload.split_whitespace().count() > 4 {
                        // still materialized as a triangle of the first three
                        // references below, matching the counting pass
                        self.malformed(line, "faces with more than 4 vertex references are not supported")?;
                    }
                    match parse_face(payload) {
                        Some((refs, quad)) => {
                            let [a, b, c, d] = refs;
                            let sub = self.current_sub();
                            sub.indices.extend([a, b, c]);
                            if quad {
                                sub.indices.extend([a, c, d]);
                            }
                        }
                        None => self.malformed(line, "unparsable face vertex reference")?,
                    }
                }

                LineToken::MaterialLib => {
                    let line = cursor.line();
                    let name = cursor.line_payload().trim();
                    if name.is_empty() {
                        self.malformed(line, "mtllib without a library name")?;
                    } else {
                        self.model.material_libraries.push(name.to_string());
                    }
                }

                LineToken::UseMaterial => {
                    self.claim();
                    let line = cursor.line();
                    let name = cursor.line_payload().trim();
                    if name.is_empty() {
                        self.malformed(line, "usemtl without a material name")?;
                    } else {
                        // last assignment in a sub-object wins
                        self.current_sub().material = name.to_string();
                    }
                }
            }

            cursor.next_line();
        }

        Ok(())
    }

    /// Claim the implicit unnamed sub-object when no marker has been seen
    /// yet. Called on the same token classes the counting pass claims on
    /// (even when the payload turns out malformed), so both passes agree on
    /// the sub-object numbering.
    fn claim(&mut self) {
        self.current.get_or_insert(0);
    }

    /// The sub-object currently receiving data. The counting pass counted a
    /// slot for every sub-object the builder can reach, so the index is
    /// always in bounds.
    fn current_sub(&mut self) -> &mut SubObject {
        let index = *self.current.get_or_insert(0);
        &mut self.model.sub_objects[index]
    }

    fn malformed(&mut self, line: usize, message: &str) -> ParseResult<()> {
        match self.mode {
            ErrorMode::Strict => Err(ParseError::MalformedLine {
                line,
                message: message.to_string(),
            }),
            ErrorMode::Lenient => {
                self.warnings.push(ParseWarning {
                    line,
                    message: message.to_string(),
                });
                Ok(())
            }
        }
    }
}

fn parse_vec3(payload: &str) -> Option<glam::Vec3> {
    let mut fields = payload.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    let z = fields.next()?.parse().ok()?;
    Some(glam::Vec3::new(x, y, z))
}

fn parse_vec2(payload: &str) -> Option<glam::Vec2> {
    let mut fields = payload.split_whitespace();
    let x = fields.next()?.parse().ok()?;
    let y = fields.next()?.parse().ok()?;
    Some(glam::Vec2::new(x, y))
}

/// Parse one slash-separated face vertex reference:
/// `position[/texcoord[/normal]]`, empty texcoord field allowed (`1//3`).
fn parse_face_ref(reference: &str) -> Option<FaceIndex> {
    let mut fields = reference.split('/');

    let position = fields.next()?.parse().ok()?;
    let texcoord = match fields.next() {
        None | Some("") => 0,
        Some(field) => field.parse().ok()?,
    };
    let normal = match fields.next() {
        None | Some("") => 0,
        Some(field) => field.parse().ok()?,
    };

    Some(FaceIndex::new(position, texcoord, normal))
}

/// Parse a face payload into 3 (triangle) or 4 (quad) vertex references.
/// Returns the references `[a, b, c, d]` (d zeroed for triangles) and the
/// quad flag; the caller emits `a b c` plus `a c d` for quads. References
/// past the detected count are ignored, matching the counting pass.
fn parse_face(payload: &str) -> Option<([FaceIndex; 4], bool)> {
    let quad = is_quad_face(payload);
    let mut refs = payload.split_whitespace();

    let a = parse_face_ref(refs.next()?)?;
    let b = parse_face_ref(refs.next()?)?;
    let c = parse_face_ref(refs.next()?)?;
    let d = if quad {
        parse_face_ref(refs.next()?)?
    } else {
        FaceIndex::default()
    };

    Some(([a, b, c, d], quad))
}
