//! One-way value propagation between cooperating doodles.
//!
//! A source doodle declares `LinkLink`s; whenever one of its linked
//! parameters changes, the value is copied verbatim into the named field of
//! the last doodle of the target class. The copy skips validation: it is a
//! cache for the target, not user input. A missing target is normal.

use crate::doodle::Doodle;
use crate::param::Param;
use smallvec::SmallVec;

/// `source` on this doodle feeds `target` on the `target_class` doodle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLink {
    pub source: Param,
    pub target_class: &'static str,
    pub target: Param,
}

/// Push `changed` from `doodles[source]` through its links.
///
/// Returns the indices of the doodles that were written.
pub fn propagate(doodles: &mut [Doodle], source: usize, changed: Param) -> SmallVec<[usize; 2]> {
    let mut written = SmallVec::new();
    let Some(doodle) = doodles.get(source) else {
        return written;
    };
    let links = doodle.links();
    let Some(value) = doodle.base.value(changed).cloned() else {
        return written;
    };

    for link in links.iter().filter(|l| l.source == changed) {
        let target = doodles
            .iter()
            .rposition(|d| d.class_name() == link.target_class);
        if let Some(idx) = target.filter(|&i| i != source) {
            doodles[idx]
                .base
                .set_unvalidated(link.target, value.clone());
            if !written.contains(&idx) {
                written.push(idx);
            }
        }
    }
    written
}
