//! Scripture interchange formats.
//!
//! This module exports parse trees to the formats other scripture tools
//! read, and brings those formats back to USFM:
//!
//! - **USJ** - Unified Scripture JSON
//! - **USX** - Unified Scripture XML, written from and read into USJ
//! - **USFM** - written from USJ; the text of a parsed
//!   [`Tree`](crate::syntax::Tree) is already its USFM, byte for byte
//!
//! ## Usage
//!
//! ```
//! use usfm3::interchange::{to_usj, to_usx, usj_to_usfm, usx_to_usj};
//!
//! let tree = usfm3::parse("\\id GEN\n\\c 1\n\\p \\v 1 In the beginning\n");
//! let usj = to_usj(&tree);
//! assert_eq!(usj["content"][1]["sid"], "GEN 1");
//! let usx = to_usx(&tree).unwrap();
//! assert!(usx.contains("<verse style=\"v\""));
//! assert_eq!(usx_to_usj(&usx).unwrap(), usj);
//! assert_eq!(usj_to_usfm(&usj).unwrap(), "\\id GEN\n\\c 1\n\\p\n\\v 1 In the beginning\n");
//! ```

mod error;
mod usfm;
mod usj;
mod usx;

pub use error::InterchangeError;
pub use usfm::{usj_to_usfm, usj_to_usfm_with, usx_to_usfm};
pub use usj::{USJ_VERSION, to_usj, to_usj_string};
pub use usx::{to_usx, usj_to_usx, usx_to_usj};
