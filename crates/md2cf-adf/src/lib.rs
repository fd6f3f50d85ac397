//! Atlassian Document Format (ADF) tree types.
//!
//! This crate provides the document model shared by the md2cf converters:
//! - [`AdfDocument`]: the root `doc` node (`version` is always 1)
//! - [`AdfNode`]: a block or inline node with optional attributes, children,
//!   marks and text
//! - [`AdfMark`]: inline formatting (strong, em, code, strike, link)
//! - [`PanelType`] / [`AlertKind`]: the Confluence panel colors and the GFM
//!   alert types they round-trip through
//!
//! Nodes are plain values. Transformation passes never mutate a document in
//! place; they build a new top-level `content` vector with
//! [`AdfDocument::replace_blocks`].
//!
//! # Example
//!
//! ```
//! use md2cf_adf::{AdfDocument, AdfNode};
//!
//! let doc = AdfDocument::new(vec![AdfNode::paragraph(vec![AdfNode::text("Hello")])]);
//! let json = doc.to_json().unwrap();
//! assert!(json.contains(r#""type":"doc""#));
//!
//! let parsed = AdfDocument::from_json(&json).unwrap();
//! assert_eq!(parsed, doc);
//! ```

mod error;
mod node;
mod panel;

pub use error::AdfError;
pub use node::{AdfDocument, AdfMark, AdfNode, Attrs};
pub use panel::{AlertKind, PanelType};
