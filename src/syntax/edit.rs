//! Applying edits to a [`Tree`].

use tracing::debug;

use crate::base::{Edit, EditError};
use crate::parser::reparse::{Invalidation, reparse, validate_edits};

use super::tree::Tree;

/// Parse `text`, reusing `previous` where the edits did not touch it
///
/// `edits` must describe how the text of `previous` became `text`, each edit
/// in the coordinates left by the one before it. An empty list re-publishes
/// `previous` as a new generation.
pub fn parse_incremental(text: &str, previous: &Tree, edits: &[Edit]) -> Result<Tree, EditError> {
    validate_edits(previous.len(), text, edits)?;
    let Some(invalidation) = Invalidation::merge(edits) else {
        return Ok(previous.next_generation());
    };
    for offset in [invalidation.start, invalidation.new_end] {
        if !text.is_char_boundary(offset.into()) {
            return Err(EditError::NotCharBoundary {
                offset: offset.into(),
            });
        }
    }

    debug!(
        generation = previous.generation() + 1,
        old = ?invalidation.old_range(),
        new = ?invalidation.new_range(),
        "incremental parse"
    );
    let reparsed = reparse(
        previous.green(),
        previous.errors(),
        text,
        invalidation,
        previous.config(),
    );
    Ok(Tree::new(
        reparsed.green,
        reparsed.errors,
        previous.generation() + 1,
        previous.config().clone(),
    ))
}
