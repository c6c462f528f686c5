use crate::ir::ObjKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{primitive} needs {expected} points, got {found}")]
    Geometry {
        primitive: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("no active object for {operation}")]
    NoActiveObject { operation: &'static str },

    #[error("cannot close {kind}: no open context")]
    EmptyStack { kind: ObjKind },

    #[error("output sink already finalized")]
    SinkClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
