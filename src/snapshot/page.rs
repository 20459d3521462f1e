const PAGE_TITLE: &str = "Life in Weeks - Shared Visualization";
const OG_TITLE: &str = "Life in Weeks Visualization";
const OG_DESCRIPTION: &str = "View my life journey visualization";
const IMAGE_ALT: &str = "Life in Weeks Visualization";

/// Render the share page for a stored image.
///
/// The payload goes into both `og:image` (read by link-preview bots) and a
/// visible `<img>`; the page runs no script.
pub fn render_share_page(payload: &str) -> String {
    let image = escape_attr(payload);
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>{PAGE_TITLE}</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta property="og:title" content="{OG_TITLE}" />
    <meta property="og:description" content="{OG_DESCRIPTION}" />
    <meta property="og:image" content="{image}" />
    <style>
      body {{
        margin: 0;
        padding: 20px;
        display: flex;
        justify-content: center;
        align-items: center;
        min-height: 100vh;
        background: #f5f5f5;
        font-family: system-ui, -apple-system, sans-serif;
      }}
      .container {{
        max-width: 1000px;
        width: 100%;
      }}
      img {{
        width: 100%;
        height: auto;
        border-radius: 12px;
        box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
      }}
    </style>
  </head>
  <body>
    <div class="container">
      <img src="{image}" alt="{IMAGE_ALT}" />
    </div>
  </body>
</html>
"#
    )
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_embedded_twice() {
        let payload = "data:image/png;base64,iVBORw0KGgo=";
        let html = render_share_page(payload);
        assert!(html.contains(&format!(r#"<meta property="og:image" content="{payload}" />"#)));
        assert!(html.contains(&format!(r#"<img src="{payload}""#)));
        assert!(html.contains("<title>Life in Weeks - Shared Visualization</title>"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_payload_cannot_break_out_of_attribute() {
        let html = render_share_page(r#"x" onerror="alert(1)"><script>"#);
        assert!(!html.contains("<script>"));
        assert!(!html.contains(r#"" onerror=""#));
        assert!(html.contains("x&quot; onerror=&quot;alert(1)&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a&b"), "a&amp;b");
        assert_eq!(escape_attr("it's"), "it&#39;s");
        assert_eq!(escape_attr("plain+/="), "plain+/=");
    }
}
