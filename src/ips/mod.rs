// IPS / IPS32 patch format.
//
// # Modules
//
// - `record`   one literal or run-length edit and its wire form
// - `patch`    ordered record list, variant and wire constants
// - `cursor`   bounds-checked big-endian field reader
// - `codec`    parse and serialize whole patches
// - `patcher`  replay a patch over a source

pub mod codec;
pub mod cursor;
pub mod patch;
pub mod patcher;
pub mod record;

// Re-export key types for convenience.
pub use codec::{parse, read_patch, serialize, write_patch};
pub use cursor::ByteCursor;
pub use patch::{
    CLASSIC_HEADER, CLASSIC_TERMINATOR, EXTENDED_HEADER, EXTENDED_TERMINATOR, MAX_RECORD_LEN,
    Patch, PatchStats, Variant,
};
pub use patcher::{apply, apply_to_vec};
pub use record::Record;
