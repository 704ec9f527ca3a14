//! Check that every reference in every aspect resolves.
//!
//! Assess statements are checked first, then relations, aspect by aspect in
//! insertion order. The first failure ends the check.

use crate::error::{ErrorKind, ParseError, RulebookError};
use crate::models::{Aspect, Index, RelationKind};
use crate::reference::{AspectRef, ContextRef, Reference};
use crate::repository::{Artifact, Repository};
use crate::schema::FieldPath;

/// Validate every reference in `repo`.
///
/// Fails with [`RulebookError::IndexNotLoaded`] when there is no index to
/// resolve context references against.
pub fn validate_cross_refs(repo: &Repository) -> Result<(), RulebookError> {
    let index = &repo.require_index()?.value;
    for aspect in repo.aspects() {
        check_aspect(repo, index, aspect)?;
    }
    Ok(())
}

fn check_aspect(repo: &Repository, index: &Index, aspect: &Artifact<Aspect>) -> Result<(), ParseError> {
    for (level, data) in &aspect.value.assessment {
        for (i, statement) in data.statements().iter().enumerate() {
            for (obligation, target) in statement.entries() {
                let path = FieldPath::root()
                    .key("Assessment")
                    .key(level.to_string())
                    .key("Assess")
                    .index(i)
                    .key(obligation.tag());
                check_context(index, aspect, target, &path)?;
            }
        }
    }

    for (i, relation) in aspect.value.relations().iter().enumerate() {
        let kind = relation.kind();
        let path = FieldPath::root().key("Relations").index(i).key(kind.key());
        let target = relation.target();
        match kind {
            RelationKind::Scope => check_aspect_ref(repo, aspect, target, &path)?,
            RelationKind::SeeAlso => match Reference::parse(target) {
                Some(Reference::Aspect(_)) => check_aspect_ref(repo, aspect, target, &path)?,
                Some(Reference::Context(_)) => check_context(index, aspect, target, &path)?,
                Some(Reference::Url(_) | Reference::Markdown(_)) => {}
                None => {
                    return Err(aspect.error(
                        ErrorKind::CrossReference,
                        format!("`{target}` is not a valid reference"),
                        &path,
                    ));
                }
            },
            _ => check_context(index, aspect, target, &path)?,
        }
    }

    Ok(())
}

fn check_context(
    index: &Index,
    aspect: &Artifact<Aspect>,
    target: &str,
    path: &FieldPath,
) -> Result<(), ParseError> {
    let Some(reference) = ContextRef::parse(target) else {
        return Err(aspect.error(
            ErrorKind::CrossReference,
            format!("`{target}` is not a valid context reference"),
            path,
        ));
    };
    if index.resolve_context(&reference).is_none() {
        return Err(aspect.error(
            ErrorKind::CrossReference,
            format!("unknown context `{}` in `{target}`", reference.path),
            path,
        ));
    }
    Ok(())
}

fn check_aspect_ref(
    repo: &Repository,
    aspect: &Artifact<Aspect>,
    target: &str,
    path: &FieldPath,
) -> Result<(), ParseError> {
    let Some(reference) = AspectRef::parse(target) else {
        return Err(aspect.error(
            ErrorKind::CrossReference,
            format!("`{target}` is not a valid aspect reference"),
            path,
        ));
    };
    let Some(referenced) = repo.find_aspect_by_id(reference.id) else {
        return Err(aspect.error(
            ErrorKind::CrossReference,
            format!("unknown aspect `{}` in `{target}`", reference.id),
            path,
        ));
    };
    if let Some(sub_id) = reference.sub_id
        && referenced.value.level_by_id(sub_id).is_none()
    {
        return Err(aspect.error(
            ErrorKind::CrossReference,
            format!(
                "aspect `{}` has no assessment level `{sub_id}` (in `{target}`)",
                reference.id
            ),
            path,
        ));
    }
    Ok(())
}
