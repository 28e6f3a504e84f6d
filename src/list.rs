//! Keyed collections.
//!
//! [`List::patch`] reconciles the mounted items against the next render's items by [`Key`].
//! Items whose key survives are patched in place and moved if necessary, never recreated,
//! so their host nodes (and whatever state those carry, like focus) are preserved.
//!
//! The algorithm walks both sequences from both ends at once:
//!
//! 1. Matching keys at the start or at the end are patched in place.
//! 2. An old start item that became the new end item is moved right, before the item following the new window.
//! 3. An old end item that became the new start item is moved left, before the current old start item.
//! 4. Otherwise, the new start key is looked up in a map of the remaining old window (built once, on first use).
//!    A hit is moved before the current old start item and its old slot is tombstoned; a miss is mounted there.
//!
//! Once one side runs out, the rest of the new window is mounted, or the rest of the old window is removed.

use crate::{
	error::Error,
	fragment::{AnyFragment, Fragment},
	host::Host,
	value::{Key, Value},
};
use core::{iter, mem, ops::Range};
use hashbrown::HashMap;
use tracing::{instrument, trace, trace_span};

/// An ordered collection of fragments, each identified by a [`Key`] that is unique within the collection.
///
/// The item type `F` is usually [`AnyFragment`], but can be any [`Fragment`] if the item shape is known statically.
///
/// Duplicate keys are not supported. Debug builds panic on them, release builds leave the result unspecified.
#[derive(Debug)]
pub struct List<H: Host, F: Fragment<H> = AnyFragment<H>> {
	keys: Vec<Key>,
	items: Vec<F>,
	with_before_remove: bool,
	sole_content: bool,
	anchor: Option<H::Node>,
	parent: Option<H::Node>,
}

impl<H: Host, F: Fragment<H>> List<H, F> {
	#[must_use]
	pub fn new(items: impl IntoIterator<Item = (Key, F)>) -> Self {
		let (keys, items): (Vec<_>, Vec<_>) = items.into_iter().unzip();
		debug_assert_eq!(
			keys.len(),
			keys.iter().collect::<hashbrown::HashSet<_>>().len(),
			"block-dom: Duplicate `List` key encountered"
		);
		Self {
			keys,
			items,
			with_before_remove: false,
			sole_content: false,
			anchor: None,
			parent: None,
		}
	}

	/// Whether removed items must be notified through [`Fragment::before_remove`] before they are detached.
	///
	/// Only needed if items can contain fragments with removal hooks, like [`Teardown`](`crate::Teardown`).
	#[must_use]
	pub fn with_before_remove(mut self, with_before_remove: bool) -> Self {
		self.with_before_remove = with_before_remove;
		self
	}

	/// Marks this list as the only content of its container, which allows clearing the container wholesale.
	#[must_use]
	pub fn sole_content(mut self, sole_content: bool) -> Self {
		self.sole_content = sole_content;
		self
	}

	#[must_use]
	pub fn keys(&self) -> &[Key] {
		&self.keys
	}

	#[must_use]
	pub fn items(&self) -> &[F] {
		&self.items
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn mounted(&self) -> (H::Node, H::Node) {
		match (&self.parent, &self.anchor) {
			(Some(parent), Some(anchor)) => (parent.clone(), anchor.clone()),
			_ => panic!("block-dom: `List` used before mount"),
		}
	}

	fn clear(&mut self, host: &mut H, parent: &H::Node, anchor: &H::Node, old: Vec<F>) {
		let span = trace_span!("Clearing sole-content list", len = old.len());
		let _enter = span.enter();
		if self.with_before_remove {
			for mut item in old {
				item.before_remove();
			}
		}
		host.clear(parent);
		host.insert_before(parent, anchor, None);
	}

	/// The first node of `item`, or `fallback` if there is no such item or it has no nodes.
	fn first_node_or(item: Option<&Option<F>>, fallback: &H::Node) -> H::Node {
		item.and_then(Option::as_ref).and_then(|item| item.first_node()).unwrap_or(fallback).clone()
	}
}

/// Looks up where old keys in `window` are, by key.
fn index_window(keys: &[Key], window: Range<usize>) -> HashMap<&Key, usize> {
	window.map(|i| (&keys[i], i)).collect()
}

fn take<F>(slot: &mut Option<F>) -> F {
	slot.take().expect("block-dom bug: `List` slot consumed twice")
}

impl<H: Host, F: Fragment<H>> Fragment<H> for List<H, F> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.parent.is_none(), "block-dom: `List` mounted twice");
		let anchor = host.create_text("");
		host.insert_before(parent, &anchor, before);
		for item in &mut self.items {
			item.mount(host, parent, Some(&anchor));
		}
		self.anchor = Some(anchor);
		self.parent = Some(parent.clone());
	}

	#[allow(clippy::too_many_lines)]
	#[instrument(skip_all, fields(old = self.items.len(), new = next.items.len()))]
	fn patch(&mut self, host: &mut H, next: Self) {
		let List { keys: new_keys, items: new_items, .. } = next;
		if new_items.is_empty() && self.items.is_empty() {
			self.keys = new_keys;
			return;
		}
		let (parent, anchor) = self.mounted();

		if new_items.is_empty() && self.sole_content {
			let old = mem::take(&mut self.items);
			self.clear(host, &parent, &anchor, old);
			self.keys = new_keys;
			return;
		}

		let old_keys = mem::take(&mut self.keys);
		let mut old: Vec<Option<F>> = mem::take(&mut self.items).into_iter().map(Some).collect();
		let mut pending: Vec<Option<F>> = new_items.into_iter().map(Some).collect();
		let mut live: Vec<Option<F>> = iter::repeat_with(|| None).take(pending.len()).collect();

		// Windows are half-open: `old_start..old_end` and `new_start..new_end`.
		let (mut old_start, mut old_end) = (0, old.len());
		let (mut new_start, mut new_end) = (0, pending.len());
		let mut mapping: Option<HashMap<&Key, usize>> = None;

		while old_start < old_end && new_start < new_end {
			if old[old_start].is_none() {
				old_start += 1;
				continue;
			}
			if old[old_end - 1].is_none() {
				old_end -= 1;
				continue;
			}

			if old_keys[old_start] == new_keys[new_start] {
				trace!(key = %new_keys[new_start], "Same start");
				let mut item = take(&mut old[old_start]);
				item.patch(host, take(&mut pending[new_start]));
				live[new_start] = Some(item);
				old_start += 1;
				new_start += 1;
				continue;
			}

			if old_keys[old_end - 1] == new_keys[new_end - 1] {
				trace!(key = %new_keys[new_end - 1], "Same end");
				let mut item = take(&mut old[old_end - 1]);
				item.patch(host, take(&mut pending[new_end - 1]));
				live[new_end - 1] = Some(item);
				old_end -= 1;
				new_end -= 1;
				continue;
			}

			if old_keys[old_start] == new_keys[new_end - 1] {
				trace!(key = %new_keys[new_end - 1], "Moved right");
				let mut item = take(&mut old[old_start]);
				item.patch(host, take(&mut pending[new_end - 1]));
				let before = Self::first_node_or(live.get(new_end), &anchor);
				item.move_before(host, Some(&before));
				live[new_end - 1] = Some(item);
				old_start += 1;
				new_end -= 1;
				continue;
			}

			if old_keys[old_end - 1] == new_keys[new_start] {
				trace!(key = %new_keys[new_start], "Moved left");
				let mut item = take(&mut old[old_end - 1]);
				item.patch(host, take(&mut pending[new_start]));
				let before = Self::first_node_or(old.get(old_start), &anchor);
				item.move_before(host, Some(&before));
				live[new_start] = Some(item);
				old_end -= 1;
				new_start += 1;
				continue;
			}

			let mapping = mapping.get_or_insert_with(|| index_window(&old_keys, old_start..old_end));
			let before = Self::first_node_or(old.get(old_start), &anchor);
			match mapping.get(&new_keys[new_start]).copied().filter(|&j| old[j].is_some()) {
				None => {
					trace!(key = %new_keys[new_start], "Inserted");
					let mut item = take(&mut pending[new_start]);
					item.mount(host, &parent, Some(&before));
					live[new_start] = Some(item);
				}
				Some(j) => {
					trace!(key = %new_keys[new_start], from = j, "Moved by key");
					let mut item = take(&mut old[j]);
					item.move_before(host, Some(&before));
					item.patch(host, take(&mut pending[new_start]));
					live[new_start] = Some(item);
				}
			}
			new_start += 1;
		}

		if old_start >= old_end {
			if new_start < new_end {
				let before = Self::first_node_or(live.get(new_end), &anchor);
				trace!(count = new_end - new_start, "Appending remainder");
				for i in new_start..new_end {
					let mut item = take(&mut pending[i]);
					item.mount(host, &parent, Some(&before));
					live[i] = Some(item);
				}
			}
		} else {
			let mut removed: Vec<F> = old.drain(old_start..old_end).flatten().collect();
			trace!(count = removed.len(), "Removing remainder");
			if self.with_before_remove {
				for item in &mut removed {
					item.before_remove();
				}
			}
			for mut item in removed {
				item.remove(host);
			}
		}

		debug_assert!(old.iter().all(Option::is_none), "block-dom bug: `List` leaked an old item");
		self.items = live.into_iter().map(|item| item.expect("block-dom bug: `List` lost an item")).collect();
		self.keys = new_keys;
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let (parent, anchor) = self.mounted();
		for item in &mut self.items {
			item.move_before(host, before);
		}
		host.insert_before(&parent, &anchor, before);
	}

	fn before_remove(&mut self) {
		for item in &mut self.items {
			item.before_remove();
		}
	}

	fn remove(&mut self, host: &mut H) {
		let (parent, anchor) = self.mounted();
		if self.sole_content {
			host.clear(&parent);
		} else {
			for item in &mut self.items {
				item.remove(host);
			}
			host.remove_child(&parent, &anchor);
		}
		self.parent = None;
		self.anchor = None;
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.items.first().and_then(|item| item.first_node()).or_else(|| self.anchor.as_ref())
	}

	fn set_sole_content(&mut self) {
		self.sole_content = true;
	}
}

/// The `(keys, values)` a loop over `source` iterates.
///
/// A [`Value::List`] is its own keys and values.
/// For a [`Value::Map`], the entry names are the values and the entry values are the keys.
///
/// # Errors
///
/// Iff `source` is neither a list nor a map.
pub fn prepare_list(source: &Value) -> Result<(Vec<Value>, Vec<Value>), Error> {
	match source {
		Value::List(items) => Ok((items.clone(), items.clone())),
		Value::Map(entries) => Ok(entries.iter().map(|(name, value)| (value.clone(), Value::Str(name.clone()))).unzip()),
		other => Err(Error::InvalidCollection { found: other.shape() }),
	}
}
