//! Face resolution
//!
//! Binds declared faces to style-table slots. Every rule naming the same
//! face ends up with the same marker and style index, which is what lets
//! `//` and `/* */` share one "comment" look.

use tracing::{debug, warn};

use super::decl::FaceDecl;
use super::rules::RuleTable;
use super::style::StyleTable;
use super::style_buffer::Marker;
use crate::error::HighlightError;

/// Assign style slots and markers to the rules of each declared face
///
/// Returns the non-fatal problems met on the way; resolution always runs
/// through the whole declaration list.
pub fn resolve_faces(
    rules: &mut RuleTable,
    styles: &mut StyleTable,
    faces: &[FaceDecl],
) -> Vec<HighlightError> {
    let mut diagnostics = Vec::new();

    for face in faces {
        if face.is_default() {
            styles.set_default(face.style);
            continue;
        }

        if rules.position_of_face(&face.name).is_none() {
            debug!(face = %face.name, "face has no rules, ignored");
            continue;
        }

        let Some(marker) = Marker::for_slot(styles.next_index()) else {
            warn!(face = %face.name, "marker alphabet exhausted");
            diagnostics.push(HighlightError::MarkerExhausted {
                face: face.name.clone(),
            });
            continue;
        };

        let index = styles.push_style(face.style);
        for rule in rules.iter_mut().filter(|r| r.face == face.name) {
            rule.marker = marker;
            rule.style_index = index;
        }
        debug!(face = %face.name, %marker, index, "face resolved");
    }

    diagnostics
}
