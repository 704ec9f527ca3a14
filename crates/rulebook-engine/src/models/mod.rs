pub mod aspect;
pub mod common;
pub mod index;

pub use aspect::{
    AssessStatement, Aspect, AssessmentLevel, Level, Obligation, Relation, RelationKind,
};
pub use common::{Author, DATE_FORMAT, Editing, Logo, OPEN_ENDED, Until, Validity};
pub use index::{ContextMap, Index};
