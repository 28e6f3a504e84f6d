#![doc(html_root_url = "https://docs.rs/block-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! An incremental fragment patcher.
//!
//! Renderable content is a tree of [`Fragment`]s: text and markup leaves, pre-shaped [`Block`]s instantiated from a compiled
//! [`Template`](`template::Template`), fixed-arity [`Multi`]s and keyed [`List`]s, plus [`Toggler`] and [`Dispatch`] wrappers where the
//! kind of content can change.
//!
//! A tree is mounted once and then patched in place with each new render's tree, writing to the [`Host`] only where something changed.
//! [`List`] reconciliation keeps each key's live nodes, moving rather than recreating them.
//!
//! [`DomHost`](`dom::DomHost`) writes to a browser document. [`MemoryHost`](`memory::MemoryHost`) is an arena document that journals
//! every write, for tests and for running the engine natively.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
pub mod block;
pub mod dom;
pub mod error;
pub mod fragment;
pub mod host;
pub mod html;
pub mod list;
pub mod memory;
pub mod multi;
pub mod root;
pub mod teardown;
pub mod template;
pub mod text;
pub mod toggler;
pub mod value;

pub use block::Block;
pub use error::Error;
pub use fragment::{AnyFragment, Fragment};
pub use host::Host;
pub use html::Html;
pub use list::{prepare_list, List};
pub use multi::Multi;
pub use root::Root;
pub use teardown::Teardown;
pub use text::{Comment, Text};
pub use toggler::{Dispatch, Toggler};
pub use value::{Handler, Key, Value};
