//! Process exit codes (BSD sysexits)

/// command line usage error
pub const USAGE: i32 = 64;

/// data format error
pub const DATAERR: i32 = 65;

/// cannot open input
pub const NOINPUT: i32 = 66;

/// service unavailable
pub const UNAVAILABLE: i32 = 69;

/// input/output error
pub const IOERR: i32 = 74;

/// configuration error
pub const CONFIG: i32 = 78;
