use regex::Regex;

/// Extracts artist IDs from a playlist description carrying an
/// `[Auto-update: id1,id2,id3]` marker.
///
/// A description without the marker (or no description at all) returns an
/// empty list; such a playlist is simply not auto-managed. The extracted
/// pieces are trimmed and empty pieces dropped, but not validated —
/// a malformed ID surfaces later as a per-artist aggregation failure,
/// which the fill tolerates.
pub fn parse_artist_ids_from_description(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return Vec::new();
    };

    let marker = Regex::new(r"\[Auto-update:\s*([^\]]+)\]").unwrap();
    let Some(captures) = marker.captures(description) else {
        return Vec::new();
    };

    captures[1]
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}
