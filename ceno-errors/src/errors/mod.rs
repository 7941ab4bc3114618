//! Error catalog and classification for the CENO client
//!
//! # Error Code Ranges
//!
//! | Range      | Origin       | Description                              |
//! |------------|--------------|------------------------------------------|
//! | 1100-1106  | CC           | Config, URL, view, and file errors       |
//! | 1200-1204  | CC           | Talking to the LCS and RS                |
//! | 2110-2140  | LCS          | Errors the LCS reports about a request   |
//! | 2300-2301  | LCS          | LCS waiting on the network layer         |
//! | 100        | Unclassified | Invalid/unrecognized error code          |

pub mod catalog;

pub use catalog::{
    CONTACT_INFO, ErrorCode, ErrorEntry, ErrorKind, ErrorOrigin, is_cache_server_error,
    is_client_error,
};
