/// Clean authored quiz text using the ammonia library.
///
/// Whitelist-based: harmless formatting tags (like <b>, <p>) survive, while
/// <script> (including its content), event-handler attributes and similar are
/// stripped. Quiz text is rendered by clients, so it is cleaned once at write time.
///
/// Text without a `<` cannot open a tag and is returned as written, so plain
/// `&` or `>` are not entity-escaped.
pub fn clean_html(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }
    ammonia::clean(input)
}
