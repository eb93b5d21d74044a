use std::collections::BTreeSet;

use flexstr::SharedStr as FlexStr;

use crate::constants::{FIELD_DELIMITER, SENTINEL};
use crate::types::TermId;

pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == SENTINEL
}

pub fn split_field(value: &str) -> impl Iterator<Item = &str> {
    value.split(FIELD_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Split each value on the field delimiter and return the distinct parts,
/// joined again with the delimiter.  The sentinel is only kept when it is
/// the only value.  The parts are sorted so the result doesn't depend on
/// row order.
pub fn union_without_repetition<'a>(values: impl IntoIterator<Item = &'a str>) -> FlexStr {
    let mut parts: BTreeSet<&str> =
        values.into_iter().flat_map(split_field).collect();

    if parts.len() > 1 {
        parts.remove(SENTINEL);
    }

    if parts.is_empty() {
        return FlexStr::from(SENTINEL);
    }

    let delimiter = FIELD_DELIMITER.to_string();
    itertools::join(parts, &delimiter).into()
}

// "psi-mi:"MI:0018"(two hybrid)" -> "MI:0018", a bare "MI:0018" is
// returned as is
fn field_term_id(field: &str) -> Option<&str> {
    let termid =
        if field.contains('"') {
            field.split('"').nth(1)?
        } else {
            field
        };

    let termid = termid.trim();
    if is_sentinel(termid) {
        None
    } else {
        Some(termid)
    }
}

/// The term IDs of a pipe separated field like the `idm` column, in order
pub fn term_ids(field: &str) -> Vec<TermId> {
    split_field(field)
        .filter_map(field_term_id)
        .map(TermId::from)
        .collect()
}

/// The parts of an `idm` field paired with their term IDs
pub fn term_fields(field: &str) -> Vec<(&str, TermId)> {
    split_field(field)
        .filter_map(|part| field_term_id(part).map(|termid| (part, TermId::from(termid))))
        .collect()
}

pub fn first_term_id(field: &str) -> Option<TermId> {
    split_field(field)
        .filter_map(field_term_id)
        .map(TermId::from)
        .next()
}
