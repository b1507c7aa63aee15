use crate::media::classify::{infer_kind, is_priority_url};
use crate::media::record::{CaptureRecord, MediaKind, MediaResult};
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Deduplicate, classify and order raw capture records.
///
/// Records with a blank URL are dropped. Results are unique by `(url, kind)`;
/// the first record for a pair decides `source`, `content_type` and `title`.
/// URLs on a priority domain come first, and discovery order is kept inside
/// each of the two groups.
pub fn normalize<I>(records: I) -> Vec<MediaResult>
where
    I: IntoIterator<Item = CaptureRecord>,
{
    let mut unique: IndexMap<(String, MediaKind), MediaResult> = IndexMap::new();

    for record in records {
        if record.url.trim().is_empty() {
            continue;
        }

        let kind = infer_kind(
            &record.url,
            record.kind_hint.as_deref(),
            record.content_type.as_deref(),
        );

        if let Entry::Vacant(slot) = unique.entry((record.url.clone(), kind)) {
            slot.insert(MediaResult {
                url: record.url,
                kind,
                source: record.source,
                content_type: record.content_type,
                title: record.title,
            });
        }
    }

    let (priority, normal): (Vec<_>, Vec<_>) = unique
        .into_values()
        .partition(|result| is_priority_url(&result.url));

    priority.into_iter().chain(normal).collect()
}

/// Set the page title on every result
pub fn stamp_title(results: &mut [MediaResult], title: &str) {
    for result in results.iter_mut() {
        result.title = Some(title.to_string());
    }
}
