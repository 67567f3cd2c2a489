use classvfs_api::{LineEnding, Resource, ResourceName, ResourcePath};
use std::borrow::Borrow;

/// Builds the synthetic listing for `dir` out of `candidates`: the name of every
/// candidate whose parent is `dir`, one per line, each line terminated.
///
/// Returns `None` when no candidate lives directly under `dir`.
pub(crate) fn synthesize<I, P>(dir: &ResourcePath, candidates: I, line_ending: LineEnding) -> Option<Resource>
where
    I: IntoIterator<Item = P>,
    P: Borrow<ResourcePath>,
{
    let names = candidates.into_iter().filter_map(|candidate| {
        let candidate = candidate.borrow();
        (candidate.parent() == Some(dir)).then(|| candidate.name().clone())
    });
    render(names, line_ending)
}

/// Renders already collected child names.
pub(crate) fn render<I>(names: I, line_ending: LineEnding) -> Option<Resource>
where
    I: IntoIterator<Item = ResourceName>,
{
    let eol = line_ending.as_str();
    let mut listing = String::new();
    for name in names {
        listing.push_str(name.as_str());
        listing.push_str(eol);
    }

    if listing.is_empty() {
        None
    } else {
        Some(Resource::from(listing.into_bytes()))
    }
}
