use html_escape::{encode_double_quoted_attribute, encode_text};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const PLAYER_SLOT: &str = "{{audio_player}}";

/// Render the landing page, with a player when `audio_file` is set.
pub fn render_index(audio_file: Option<&str>) -> String {
    let player = match audio_file {
        Some(file) => {
            let src = format!("/audio/{}", file);
            let src = encode_double_quoted_attribute(&src);
            format!(
                r#"<div class="player">
    <audio controls src="{src}"></audio>
    <p><a href="{src}" download>Download {name}</a></p>
  </div>"#,
                src = src,
                name = encode_text(file),
            )
        }
        None => String::new(),
    };

    INDEX_TEMPLATE.replace(PLAYER_SLOT, &player)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_audio() {
        let html = render_index(None);
        assert!(!html.contains("<audio controls src="));
        assert!(!html.contains(PLAYER_SLOT));
        assert!(html.contains(r#"action="/convert-pdf""#));
    }

    #[test]
    fn test_with_audio() {
        let html = render_index(Some("abc.mp3"));
        assert!(html.contains(r#"<audio controls src="/audio/abc.mp3">"#));
    }

    #[test]
    fn test_escapes_filename() {
        let html = render_index(Some(r#""><script>x</script>"#));
        assert!(!html.contains(r#""><script>"#));
    }
}
