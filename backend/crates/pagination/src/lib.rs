//! Opaque cursor and page primitives shared by ranged store queries.
//!
//! Purpose: keep the encoding of "resume after this key" tokens in one
//! place so that no caller constructs or interprets a token by hand.
//!
//! Public surface:
//! - [`CursorKey`]: trait implemented by every paginated key shape.
//! - [`Cursor`]: wraps one key and converts it to and from its token.
//! - [`CursorError`]: failures raised while encoding or decoding.
//! - [`Page`]: one page of items plus the optional continuation key.
//! - [`PageLimit`]: validated page size.

mod cursor;
mod limit;
mod page;

pub use cursor::{Cursor, CursorError, CursorKey};
pub use limit::{PageLimit, PageLimitError};
pub use page::Page;
