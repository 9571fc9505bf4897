//! Namespaces: the binding tree and its name-resolution algorithm.
//!
//! A namespace maps identifiers to values and carries one backward
//! `search_link` used only for resolution. Links are not ownership: a
//! namespace is kept alive by whoever holds a handle to it (a binding in
//! another namespace, the interpreter's current-frame pointer, or a link).
//!
//! # Invariant
//!
//! The graph of search links is a forest. Two mechanisms keep it so:
//!
//! - [`Namespace::bind`] clears the link of any namespace being bound, so
//!   inserting the same namespace in many places cannot splice chains
//!   together.
//! - [`Namespace::link_to`] is the only way to set a link on an existing
//!   namespace, and it refuses any link that would close a cycle.
//!
//! # Resolution
//!
//! Resolving `a:b:c` first searches *up* the link chain for the nearest
//! namespace binding `a`, then searches *down* from there through `a`,
//! `b`, `c`. Both phases are loops, so deep chains cost heap, not stack.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::errors::{self, EvalResult};
use crate::reference::{Name, Reference};
use crate::value::Value;

/// Marks a namespace as an active call frame.
///
/// Frames see a window onto the interpreter's single data stack: every
/// slot at or above `base`. The window starts out holding exactly the
/// arguments passed by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameWindow {
    pub base: usize,
}

#[derive(Default)]
struct NamespaceData {
    bindings: FxHashMap<Name, Value>,
    search_link: Option<Namespace>,
    frame: Option<FrameWindow>,
}

// Long frame chains are released in a loop rather than by recursive drops.
impl Drop for NamespaceData {
    fn drop(&mut self) {
        let mut next = self.search_link.take();
        while let Some(Namespace(rc)) = next {
            next = match Rc::try_unwrap(rc) {
                Ok(cell) => cell.into_inner().search_link.take(),
                Err(_) => None,
            };
        }
    }
}

/// Shared handle to a namespace node.
///
/// Cloning the handle aliases the same node.
#[derive(Clone, Default)]
pub struct Namespace(Rc<RefCell<NamespaceData>>);

/// Non-owning handle to a namespace node.
#[derive(Clone, Debug, Default)]
pub struct WeakNamespace(Weak<RefCell<NamespaceData>>);

impl WeakNamespace {
    /// The namespace, if anything still holds it.
    pub fn upgrade(&self) -> Option<Namespace> {
        self.0.upgrade().map(Namespace)
    }
}

impl Namespace {
    /// A fresh, empty, unlinked namespace.
    pub fn new() -> Self {
        Namespace::default()
    }

    /// A fresh call-frame namespace linked to `link`.
    ///
    /// A new node cannot be part of any chain yet, so setting the link
    /// directly cannot create a cycle.
    pub fn new_frame(link: Option<Namespace>, base: usize) -> Self {
        Namespace(Rc::new(RefCell::new(NamespaceData {
            bindings: FxHashMap::default(),
            search_link: link,
            frame: Some(FrameWindow { base }),
        })))
    }

    /// Returns `true` if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNamespace {
        WeakNamespace(Rc::downgrade(&self.0))
    }

    /// This namespace's own frame marker, if it is a call frame.
    pub fn frame(&self) -> Option<FrameWindow> {
        self.0.borrow().frame
    }

    /// Frame marker of the nearest frame-bearing namespace on the link
    /// chain, starting with this one.
    pub fn nearest_frame(&self) -> Option<FrameWindow> {
        let mut cursor = self.clone();
        loop {
            if let Some(frame) = cursor.frame() {
                return Some(frame);
            }
            cursor = cursor.search_link()?;
        }
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().bindings.is_empty()
    }

    /// Locally bound names, sorted.
    pub fn names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.0.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().bindings.contains_key(name)
    }

    /// Look up `name` in this namespace only.
    #[inline]
    pub fn lookup_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Bind `value` under `name`, replacing any previous binding.
    ///
    /// If `value` is a namespace, its search link is cleared first. This is
    /// the single entry point for insertion, which is what keeps the link
    /// graph acyclic.
    pub fn bind(&self, name: impl Into<Name>, value: Value) {
        if let Value::Namespace(ns) = &value {
            ns.clear_search_link();
        }
        let name = name.into();
        tracing::debug!(name = %name, kind = value.type_name(), "bind");
        let _previous = self.0.borrow_mut().bindings.insert(name, value);
    }

    /// Remove and return the local binding for `name`.
    pub fn unbind(&self, name: &str) -> Option<Value> {
        let removed = self.0.borrow_mut().bindings.remove(name);
        if removed.is_some() {
            tracing::debug!(name, "unbind");
        }
        removed
    }

    pub fn search_link(&self) -> Option<Namespace> {
        self.0.borrow().search_link.clone()
    }

    pub fn clear_search_link(&self) {
        let _previous = self.0.borrow_mut().search_link.take();
    }

    /// Point this namespace's search link at `target`.
    ///
    /// Returns `false`, leaving the link unchanged, if `target` already
    /// reaches this namespace (the new link would close a cycle).
    pub fn link_to(&self, target: &Namespace) -> bool {
        if target.reaches(self) {
            tracing::debug!("refused search link that would form a cycle");
            return false;
        }
        let _previous = self.0.borrow_mut().search_link.replace(target.clone());
        true
    }

    /// Returns `true` if `other` is reachable from this namespace by
    /// following zero or more search links.
    pub fn reaches(&self, other: &Namespace) -> bool {
        let mut cursor = Some(self.clone());
        while let Some(ns) = cursor {
            if ns.ptr_eq(other) {
                return true;
            }
            cursor = ns.search_link();
        }
        false
    }

    /// Walk the search links outward from this namespace and return the
    /// first namespace that binds `first` locally.
    pub fn search_up(&self, first: &str) -> EvalResult<Namespace> {
        let mut cursor = self.clone();
        loop {
            if cursor.contains(first) {
                return Ok(cursor);
            }
            match cursor.search_link() {
                Some(next) => cursor = next,
                None => return Err(errors::name_not_found(first, first)),
            }
        }
    }

    /// Descend from this namespace through `segments`, one local lookup per
    /// segment, and return the value at the end of the path.
    ///
    /// Every value passed through on the way must be a namespace.
    pub fn search_down(&self, segments: &[Name]) -> EvalResult<Value> {
        let mut current = Value::Namespace(self.clone());
        for segment in segments {
            let next = match &current {
                Value::Namespace(ns) => ns.lookup_local(segment),
                _ => None,
            };
            current = next.ok_or_else(|| errors::name_not_found(&**segment, &**segment))?;
        }
        Ok(current)
    }

    /// Resolve `reference` starting from this namespace.
    ///
    /// The empty reference resolves to this namespace itself. An anchored
    /// reference skips the upward search. Code found through a reference
    /// is tagged with a copy of it.
    pub fn resolve(&self, reference: &Reference) -> EvalResult<Value> {
        let Some(first) = reference.first() else {
            return Ok(Value::Namespace(self.clone()));
        };
        let origin = self
            .origin(reference, first)
            .map_err(|err| err.for_reference(reference))?;
        let value = origin
            .search_down(reference.segments())
            .map_err(|err| err.for_reference(reference))?;
        Ok(value.named(reference))
    }

    /// Where resolution of `reference` (whose first segment is `first`)
    /// starts descending.
    pub fn origin(&self, reference: &Reference, first: &str) -> EvalResult<Namespace> {
        if reference.is_anchored() {
            Ok(self.clone())
        } else {
            self.search_up(first)
        }
    }

    /// Resolve the namespace denoted by all but the last segment of
    /// `reference`.
    fn resolve_parent(&self, reference: &Reference) -> EvalResult<(Namespace, Name)> {
        let Some(last) = reference.segments().last() else {
            return Err(errors::name_not_found("", ""));
        };
        match self.resolve(&reference.previous())? {
            Value::Namespace(ns) => Ok((ns, Name::clone(last))),
            other => Err(errors::type_mismatch("namespace", other.type_name())),
        }
    }

    /// Bind `value` at a qualified location: in the namespace named by the
    /// reference's prefix, under its last segment.
    pub fn bind_at(&self, reference: &Reference, value: Value) -> EvalResult<()> {
        let (target, name) = self.resolve_parent(reference)?;
        target.bind(name, value);
        Ok(())
    }

    /// Remove the binding at a qualified location, returning it.
    pub fn unbind_at(&self, reference: &Reference) -> EvalResult<Value> {
        let (target, name) = self.resolve_parent(reference)?;
        target
            .unbind(&name)
            .ok_or_else(|| errors::name_not_found(reference.to_string(), &*name))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings may contain this namespace again; print names only.
        let data = self.0.borrow();
        f.debug_struct("Namespace")
            .field("names", &data.bindings.len())
            .field("linked", &data.search_link.is_some())
            .field("frame", &data.frame)
            .finish()
    }
}
