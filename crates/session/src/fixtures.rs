//! Catalog pages for tests, shaped like the real thing.

/// Search results page listing `ids`, with a pager pointing at `last_page`.
pub(crate) fn search_page(ids: &[&str], last_page: Option<u32>) -> String {
    let rows: String = ids
        .iter()
        .map(|id| format!(r#"<div class="views-row"><span class="art-preview-title"><a href="/content/{id}">{id}</a></span></div>"#))
        .collect();
    let results = match ids.is_empty() {
        true => String::from("<p>Your search yielded no results</p>"),
        false => format!(r#"<div class="view view-art-search view-display-id-search_art_advanced">{rows}</div>"#),
    };
    let pager = match last_page {
        Some(n) => format!(r#"<ul class="pager"><li class="pager-last last"><a href="/art-search-advanced?keys=x&amp;page={n}">last »</a></li></ul>"#),
        None => String::new(),
    };
    format!("<html><body>{results}{pager}</body></html>")
}

/// Detail page of a music asset referencing `files`.
pub(crate) fn asset_page(files: &[&str]) -> String {
    let files: String = files
        .iter()
        .map(|file| format!(r#"<span class="file"><a href="https://opengameart.org/sites/default/files/{file}">{file}</a></span>"#))
        .collect();
    format!(
        r#"<html><body>
        <div property="dc:title"><h2>Imminent Threat</h2></div>
        <div class="left-column">
            <div class="field field-name-author-submitter"><a href="/users/matthew-pablo">Matthew Pablo</a></div>
            <div class="field field-name-field-art-type"><a href="/art-search-advanced?field_art_type_tid%5B%5D=12">Music</a></div>
            <div class="field field-name-field-art-licenses"><div class="license-name">CC-BY 3.0</div></div>
            <div class="field field-name-field-art-tags"><a href="/art-search-advanced?field_art_tags_tid=battle">battle</a><a href="/art-search-advanced?field_art_tags_tid=epic">epic</a><a href="/art-search-advanced?field_art_tags_tid=orchestral">orchestral</a></div>
            <div class="field field-name-favorites"><div class="field-item">241</div></div>
        </div>
        <div class="right-column">
            <div class="field field-name-field-art-files">{files}</div>
        </div>
        </body></html>"#
    )
}
