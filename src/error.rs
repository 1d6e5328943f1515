use crate::{ObjectKind, ObjectRef};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeminfoError {
    #[error("object {object} of kind {kind:?} has no size rule")]
    UnsupportedCategory { object: ObjectRef, kind: ObjectKind },
    #[error("object {0} is not in the heap")]
    UnknownObject(ObjectRef),
    #[error("estimated size overflows at object {0}")]
    SizeOverflow(ObjectRef),
}
