pub mod debug;
pub mod editor;
pub mod io;
pub mod pattern;
pub mod resource;
pub mod tree;
pub mod utils;
pub mod workspace;

// 重新导出主要结构
pub use editor::{EditAction, EditHistory, EditHistoryManager, MAX_HISTORY};
pub use pattern::{Pattern, PatternContainer, PatternFile};
pub use resource::{
    ContentValue, ResourceNode, ResourceTreeBuilder, TranslationFile, TranslationFileContent,
};
pub use tree::{EntryData, NodeId, NodeKind, NodeType, NormalizedNode, Tree, TreeStats};
pub use utils::WeaveError;
pub use workspace::Workspace;
