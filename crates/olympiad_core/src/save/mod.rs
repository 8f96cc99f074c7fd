// Save/Load System for the olympiad manager
// Flat little-endian image of both entity lists, C struct layout

pub mod error;
pub mod format;
pub mod manager;
pub mod summary;

pub use error::SaveError;
pub use format::SaveFile;
pub use manager::SaveManager;
pub use summary::SaveSummary;

/// "ENNI" read as a little-endian u32
pub const SAVE_MAGIC: u32 = 0x454E_4E49;
pub const SAVE_VERSION: u32 = 2;
