//! Table expansion utilities for handling repeated cells and rows.
//!
//! ODF files store rows of a table and cells of a row as *runs*: a single
//! element carrying `table:number-rows-repeated` or
//! `table:number-columns-repeated` stands for that many identical
//! consecutive rows or cells. The helpers here locate the run covering a
//! 1-based index and split, pad or expand runs so that an index gets an
//! element of its own.
//!
//! All functions take the repeat attribute's qualified name, so they work
//! for rows and cells alike, under whatever prefix the document binds.

use super::element::{Element, ElementBase, Node};
use crate::common::{Error, Result};

/// One element of a run sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Position of the element among its parent's children
    pub position: usize,
    /// First index (1-based) covered by the run
    pub start: usize,
    /// Number of indices covered
    pub repeat: usize,
}

impl Run {
    /// Last index covered by the run
    #[inline]
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.repeat - 1)
    }

    /// Check whether the run covers `index`
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end()).contains(&index)
    }
}

/// Repeat count of `element`; a missing, malformed or zero count is 1.
pub fn repeat_count(element: &Element, attribute: &str) -> usize {
    element
        .get_int_attribute(attribute)
        .and_then(|count| usize::try_from(count).ok())
        .filter(|&count| count > 0)
        .unwrap_or(1)
}

fn set_repeat_count(element: &mut Element, attribute: &str, count: usize) {
    if count > 1 {
        let mut buffer = itoa::Buffer::new();
        element.set_attribute(attribute, buffer.format(count));
    } else {
        element.remove_attribute(attribute);
    }
}

/// Child element at `position`, if that child is an element
pub fn element_at(children: &[Node], position: usize) -> Option<&Element> {
    match children.get(position)? {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    }
}

/// Mutable child element at `position`, if that child is an element
pub fn element_at_mut(children: &mut [Node], position: usize) -> Option<&mut Element> {
    match children.get_mut(position)? {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    }
}

/// Runs among `children` selected by `is_run`, in document order.
pub fn runs<'a, F>(children: &'a [Node], attribute: &'a str, is_run: F) -> impl Iterator<Item = Run> + 'a
where
    F: Fn(&Element) -> bool + 'a,
{
    let mut start = 1usize;
    children
        .iter()
        .enumerate()
        .filter_map(move |(position, node)| match node {
            Node::Element(element) if is_run(element) => {
                let repeat = repeat_count(element, attribute);
                let run = Run {
                    position,
                    start,
                    repeat,
                };
                start = start.saturating_add(repeat);
                Some(run)
            },
            _ => None,
        })
}

/// Number of indices covered by all runs together
pub fn extent<F>(children: &[Node], attribute: &str, is_run: F) -> usize
where
    F: Fn(&Element) -> bool,
{
    runs(children, attribute, is_run).last().map_or(0, |run| run.end())
}

/// The run covering `index`, if any
pub fn locate<F>(children: &[Node], attribute: &str, is_run: F, index: usize) -> Option<Run>
where
    F: Fn(&Element) -> bool,
{
    runs(children, attribute, is_run)
        .take_while(|run| run.start <= index)
        .find(|run| run.contains(index))
}

/// Split `run` so that `index` is covered by an element of its own.
///
/// The run is replaced by at most three elements: the part before `index`,
/// the element for `index` and the part after it. Returns the position of
/// the element for `index`. A run of one is left untouched.
pub fn split_run(children: &mut Vec<Node>, run: Run, attribute: &str, index: usize) -> Result<usize> {
    if !run.contains(index) {
        return Err(Error::InvalidCoordinates(format!(
            "Index {} is outside the run {}..={}",
            index,
            run.start,
            run.end()
        )));
    }
    if run.repeat == 1 {
        return Ok(run.position);
    }

    let element = element_at(children, run.position)
        .cloned()
        .ok_or_else(|| Error::InvalidFormat(format!("No run element at position {}", run.position)))?;
    let before = index - run.start;
    let after = run.end() - index;

    let mut pieces = Vec::with_capacity(3);
    for count in [before, 1, after] {
        if count > 0 {
            let mut piece = element.clone();
            set_repeat_count(&mut piece, attribute, count);
            pieces.push(Node::Element(piece));
        }
    }
    children.splice(run.position..=run.position, pieces);

    Ok(run.position + usize::from(before > 0))
}

/// Insert `count` copies of `blank` as a single run after the last run.
///
/// Returns the inserted run.
pub fn pad<F>(children: &mut Vec<Node>, attribute: &str, is_run: F, mut blank: Element, count: usize) -> Run
where
    F: Fn(&Element) -> bool,
{
    let (position, start) = match runs(children, attribute, is_run).last() {
        Some(last) => (last.position + 1, last.end() + 1),
        None => (children.len(), 1),
    };
    set_repeat_count(&mut blank, attribute, count);
    children.insert(position, Node::Element(blank));
    Run {
        position,
        start,
        repeat: count,
    }
}

/// Expand every run among `children` into individual elements.
///
/// Returns whether anything changed. Fails with [`Error::Unsupported`],
/// leaving `children` untouched, when the runs cover more than `limit`
/// indices.
pub fn expand_all<F>(children: &mut Vec<Node>, attribute: &str, is_run: F, limit: usize) -> Result<bool>
where
    F: Fn(&Element) -> bool,
{
    let total = extent(children, attribute, &is_run);
    if total > limit {
        return Err(Error::Unsupported(format!(
            "Expanding {} repeated elements exceeds the limit of {}",
            total, limit
        )));
    }
    if runs(children, attribute, &is_run).all(|run| run.repeat == 1) {
        return Ok(false);
    }

    let mut expanded = Vec::with_capacity(children.len().max(total));
    for node in children.drain(..) {
        match node {
            Node::Element(mut element) if is_run(&element) => {
                let count = repeat_count(&element, attribute);
                set_repeat_count(&mut element, attribute, 1);
                expanded.extend(std::iter::repeat_n(Node::Element(element), count));
            },
            other => expanded.push(other),
        }
    }
    *children = expanded;

    Ok(true)
}
