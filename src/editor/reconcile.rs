use crate::http::headers::{HeaderList, HeaderPair};
use crate::model::{HeaderRecord, HeaderValue, ViewModel};

/// Serializes the model to a headers blob.
///
/// When `disable_allowed` is set, disabled records are left out. Records
/// with an empty value are still emitted.
pub fn model_to_value(model: &[HeaderRecord], disable_allowed: bool) -> String {
    model
        .iter()
        .filter(|r| !(disable_allowed && !r.schema.enabled))
        .map(HeaderRecord::to_pair)
        .collect::<HeaderList>()
        .stringify()
}

/// Merges parsed `pairs` into `model`.
///
/// - A pair matching a record (first case-insensitive match) overwrites its
///   value and re-enables it.
/// - A pair with no match becomes a custom record built by `make_custom`.
///   New records are appended after the existing ones and never matched by
///   later pairs.
/// - A record no pair matched is removed when custom, disabled when
///   `disable_allowed`, and cleared otherwise.
pub fn merge<F>(model: &mut ViewModel, pairs: &HeaderList, disable_allowed: bool, mut make_custom: F)
where
    F: FnMut(&HeaderPair) -> HeaderRecord,
{
    let mut seen = vec![false; model.len()];
    let mut staged: Vec<HeaderRecord> = Vec::new();

    for pair in pairs {
        let Some(index) = model.iter().position(|r| r.matches(&pair.name)) else {
            staged.push(make_custom(pair));
            continue;
        };

        seen[index] = true;
        let record = &mut model[index];
        if record.value.to_text() != pair.value {
            record.value = HeaderValue::from_text(&pair.value, record.schema.is_array);
        }
        if !record.schema.enabled {
            record.schema.enabled = true;
        }
    }

    for index in (0..model.len()).rev() {
        if seen[index] {
            continue;
        }
        if model[index].schema.is_custom {
            model.remove(index);
            continue;
        }
        let record = &mut model[index];
        if disable_allowed {
            record.schema.enabled = false;
        } else {
            record.value = HeaderValue::empty(record.schema.is_array);
        }
    }

    if staged.is_empty() {
        return;
    }
    log::debug!("appending {} custom header(s)", staged.len());
    model.append(&mut staged);
}
