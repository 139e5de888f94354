use crate::http::headers::{HeaderList, HeaderPair};
use crate::http::validator::Validator;

/// Parses a headers blob into an ordered list of pairs.
///
/// Every line is `name: value`. A line that starts with a space or a tab
/// continues the value of the previous header. A line without a separator
/// is kept as a name with an empty value so that [`filter`] can decide what
/// to do with it.
pub fn parse(text: &str) -> HeaderList {
    let mut pairs: Vec<HeaderPair> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        // obs-fold: continuation of the previous value
        if line.starts_with([' ', '\t']) {
            if let Some(last) = pairs.last_mut() {
                let cont = line.trim();
                if !cont.is_empty() {
                    if !last.value.is_empty() {
                        last.value.push(' ');
                    }
                    last.value.push_str(cont);
                }
                continue;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let pair = match line.split_once(':') {
            Some((name, value)) => HeaderPair::new(name.trim(), value.trim()),
            None => HeaderPair::new(line, ""),
        };
        pairs.push(pair);
    }

    pairs.into()
}

/// Drops structurally invalid pairs (empty names or names with characters
/// outside the token set).
pub fn filter(list: HeaderList) -> HeaderList {
    list.into_vec()
        .into_iter()
        .filter(|h| {
            let ok = Validator::validate_name(&h.name).is_ok();
            if !ok {
                log::debug!("dropping malformed header line {:?}", h.name);
            }
            ok
        })
        .collect()
}

/// [`parse`] followed by [`filter`].
pub fn parse_valid(text: &str) -> HeaderList {
    filter(parse(text))
}
