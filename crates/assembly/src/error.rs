use crate::model::{GroupId, PieceId};

pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Bookkeeping errors reported by [`Model`](crate::model::Model).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("piece {piece} is not a member of group {group}")]
    NotAMember { piece: PieceId, group: GroupId },

    #[error("unknown piece: {0}")]
    UnknownPiece(PieceId),

    #[error("unknown group: {0}")]
    UnknownGroup(GroupId),
}
