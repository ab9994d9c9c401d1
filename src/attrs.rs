//! Side table for free-form per-cell, per-line and per-column overrides.
//!
//! Values are kept as the toolkit's attribute strings. Presence is tracked
//! separately by [`AttrFlags`](crate::types::AttrFlags) bits so the resolver
//! only hashes when an override actually exists.

use std::collections::HashMap;

use crate::types::{Axis, CellAttr};

/// What an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// One cell, `L:C`
    Cell(usize, usize),
    /// A whole line, `L:*`
    Line(usize),
    /// A whole column, `*:C`
    Column(usize),
}

impl Target {
    /// Parse the `L:C`, `L:*` or `*:C` suffix of an attribute name.
    pub fn parse(s: &str) -> Option<Self> {
        let (lin, col) = s.split_once(':')?;
        match (lin.trim(), col.trim()) {
            ("*", "*") => None,
            ("*", c) => c.parse().ok().map(Target::Column),
            (l, "*") => l.parse().ok().map(Target::Line),
            (l, c) => Some(Target::Cell(l.parse().ok()?, c.parse().ok()?)),
        }
    }

    /// Index of the target along `axis`, if it has one.
    fn index(self, axis: Axis) -> Option<usize> {
        match (self, axis) {
            (Target::Cell(l, _), Axis::Lin) | (Target::Line(l), Axis::Lin) => Some(l),
            (Target::Cell(_, c), Axis::Col) | (Target::Column(c), Axis::Col) => Some(c),
            _ => None,
        }
    }

    fn with_index(self, axis: Axis, index: usize) -> Self {
        match (self, axis) {
            (Target::Cell(_, c), Axis::Lin) => Target::Cell(index, c),
            (Target::Cell(l, _), Axis::Col) => Target::Cell(l, index),
            (Target::Line(_), Axis::Lin) => Target::Line(index),
            (Target::Column(_), Axis::Col) => Target::Column(index),
            (other, _) => other,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttrTable {
    map: HashMap<(CellAttr, Target), String>,
}

impl AttrTable {
    pub fn get(&self, attr: CellAttr, target: Target) -> Option<&str> {
        self.map.get(&(attr, target)).map(String::as_str)
    }

    /// Store or, with `None`, remove an override.
    pub fn set(&mut self, attr: CellAttr, target: Target, value: Option<&str>) {
        match value {
            Some(v) => {
                self.map.insert((attr, target), v.to_string());
            }
            None => {
                self.map.remove(&(attr, target));
            }
        }
    }

    /// Remove every override of `target`.
    pub fn clear_target(&mut self, target: Target) {
        self.map.retain(|(_, t), _| *t != target);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(CellAttr, Target) -> bool) {
        self.map.retain(|(a, t), _| keep(*a, *t));
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn rekey(&mut self, axis: Axis, map: impl Fn(usize) -> Option<usize>) {
        self.map = self
            .map
            .drain()
            .filter_map(|((attr, target), value)| match target.index(axis) {
                None => Some(((attr, target), value)),
                Some(i) => map(i).map(|ni| ((attr, target.with_index(axis, ni)), value)),
            })
            .collect();
    }

    /// Shift keys for `n` indices opened at `base`.
    pub fn insert(&mut self, axis: Axis, base: usize, n: usize) {
        self.rekey(axis, |i| Some(if i >= base { i + n } else { i }));
    }

    /// Drop keys in `[base, base + n)` and shift the rest back.
    pub fn remove(&mut self, axis: Axis, base: usize, n: usize) {
        self.rekey(axis, |i| {
            if i < base {
                Some(i)
            } else if i >= base + n {
                Some(i - n)
            } else {
                None
            }
        });
    }
}
